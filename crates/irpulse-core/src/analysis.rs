//! Raw-capture analysis helpers.
//!
//! Aggregation only: rendering the result belongs to the diagnostics
//! collaborator, never to this crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One aggregated duration bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub duration: u32,
    pub count: u32,
}

/// Counts the distinct durations in a capture, ascending by duration.
///
/// The lead space at index 0 is framing, not signal, and is skipped. Useful
/// for eyeballing the mark/space widths of an unknown remote before adding
/// its timings to a catalog.
///
/// # Examples
/// ```
/// use irpulse_core::histogram;
///
/// let bins = histogram(&[0, 9000, 4500, 560, 600, 560]);
/// assert_eq!(bins.len(), 4);
/// assert_eq!(bins[0].duration, 560);
/// assert_eq!(bins[0].count, 2);
/// ```
pub fn histogram(raw: &[u32]) -> Vec<HistogramBin> {
    let mut bins: BTreeMap<u32, u32> = BTreeMap::new();
    for &duration in raw.iter().skip(1) {
        *bins.entry(duration).or_insert(0) += 1;
    }
    bins.into_iter()
        .map(|(duration, count)| HistogramBin { duration, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::histogram;

    #[test]
    fn skips_the_lead_space() {
        let bins = histogram(&[123, 9000, 9000]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].duration, 9000);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn bins_are_sorted_by_duration() {
        let bins = histogram(&[0, 1690, 560, 600, 560, 1690, 560]);
        let durations: Vec<u32> = bins.iter().map(|bin| bin.duration).collect();
        assert_eq!(durations, vec![560, 600, 1690]);
        let counts: Vec<u32> = bins.iter().map(|bin| bin.count).collect();
        assert_eq!(counts, vec![3, 1, 2]);
    }

    #[test]
    fn empty_and_lead_only_captures_yield_nothing() {
        assert!(histogram(&[]).is_empty());
        assert!(histogram(&[42]).is_empty());
    }
}

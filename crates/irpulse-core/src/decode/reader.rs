use super::error::DecodeError;

/// Access to a raw capture plus its framing conventions.
///
/// Index 0 is a lead space the receiver records before the packet proper;
/// durations then alternate mark/space starting with a mark at index 1, and
/// the sequence terminates with a lone closing mark that has no matching
/// space.
pub(crate) struct RawReader<'a> {
    raw: &'a [u32],
}

impl<'a> RawReader<'a> {
    pub(crate) fn new(raw: &'a [u32]) -> Self {
        Self { raw }
    }

    pub(crate) fn len(&self) -> usize {
        self.raw.len()
    }

    /// Minimum viable capture: lead space, header pair, one bit pair,
    /// closing mark.
    pub(crate) fn require_min_len(&self) -> Result<(), DecodeError> {
        if self.raw.len() < 5 {
            return Err(DecodeError::NotEnoughData {
                len: self.raw.len(),
            });
        }
        Ok(())
    }

    /// Duration at `offset`. Out-of-range reads yield 0, which no nonzero
    /// expectation matches, so a cursor defect surfaces as a mismatch
    /// result rather than a panic.
    pub(crate) fn at(&self, offset: usize) -> u32 {
        self.raw.get(offset).copied().unwrap_or(0)
    }

    /// Upper bound on the mark/space pairs the capture can carry, ignoring
    /// the lead space, header pair, and closing mark.
    pub(crate) fn derived_bit_count(&self) -> usize {
        (self.raw.len() - 4) / 2
    }

    /// True when the pair whose mark sits at `mark_offset` is the last one:
    /// its space is the second-to-last element, with only the closing (or
    /// trailer-confirming) mark after it. Trailer validation hinges on this
    /// position, never on hard-coded end offsets.
    pub(crate) fn is_final_pair(&self, mark_offset: usize) -> bool {
        mark_offset + 3 == self.raw.len()
    }
}

#[cfg(test)]
mod tests {
    use super::RawReader;
    use crate::decode::error::DecodeError;

    #[test]
    fn min_len_guard() {
        let reader = RawReader::new(&[0, 9000, 4500, 560]);
        assert!(matches!(
            reader.require_min_len(),
            Err(DecodeError::NotEnoughData { len: 4 })
        ));

        let reader = RawReader::new(&[0, 9000, 4500, 560, 560]);
        assert!(reader.require_min_len().is_ok());
    }

    #[test]
    fn out_of_range_reads_are_zero() {
        let reader = RawReader::new(&[0, 9000]);
        assert_eq!(reader.at(1), 9000);
        assert_eq!(reader.at(2), 0);
    }

    #[test]
    fn derived_bit_count_ignores_framing() {
        // Lead, header pair, two bit pairs, closing mark.
        let reader = RawReader::new(&[0, 9000, 4500, 560, 600, 560, 1690, 560]);
        assert_eq!(reader.derived_bit_count(), 2);
        // A trailer adds one extra element pair past the closing mark.
        let reader = RawReader::new(&[0, 4400, 4400, 500, 600, 500, 5900, 500]);
        assert_eq!(reader.derived_bit_count(), 2);
    }

    #[test]
    fn final_pair_is_position_derived() {
        // One bit pair at mark offset 3, closing mark at 5: final.
        let reader = RawReader::new(&[0, 9000, 4500, 560, 600, 560]);
        assert!(reader.is_final_pair(3));
        // Two bit pairs: offset 3 is mid-stream, offset 5 is final.
        let reader = RawReader::new(&[0, 9000, 4500, 560, 600, 560, 1690, 560]);
        assert!(!reader.is_final_pair(3));
        assert!(reader.is_final_pair(5));
    }
}

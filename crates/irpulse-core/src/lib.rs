//! Core library for decoding and encoding infrared remote captures.
//!
//! A capture is a sequence of alternating mark (emitter on) and space
//! (emitter off) durations. The decoder matches a capture against an
//! ordered catalog of protocol timing specifications within a relative
//! tolerance window and reconstructs the MSB-first bit payload; the encoder
//! produces the pulse sequence a transmitter must emit to reproduce a
//! packet. Hardware capture and transmission are collaborators, not part of
//! this crate.
//!
//! Invariants:
//! - Decode and encode are pure functions over their inputs; no I/O, no
//!   console writes, no shared mutable state beyond the read-only catalog.
//! - Catalog order is the decode try-order; the first match wins.
//! - Decode failures are ordinary result values, expected during probing;
//!   `try_decode` never panics on malformed timing data.
//! - Report output is deterministic for a given capture and catalog.
//!
//! # Examples
//! ```
//! use irpulse_core::{Catalog, ProtocolId, Tolerance, decode, encode};
//!
//! let catalog = Catalog::standard();
//! let raw = [0, 9000, 4500, 560, 600, 560, 1690, 560];
//! let packet = decode(&raw, &catalog, Tolerance::default()).expect("known frame");
//! assert_eq!(packet.protocol, Some(ProtocolId::Junco));
//!
//! let pulses = encode(&packet, &catalog).expect("valid packet");
//! assert!(pulses[0].is_mark());
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod decode;
pub mod encode;
mod packet;
mod protocol;
mod tolerance;

pub use analysis::{HistogramBin, histogram};
pub use decode::{Attempt, DecodeError, DecodeOutcome, decode, decode_traced, try_decode};
pub use encode::{EncodeError, Pulse, encode};
pub use packet::{MAX_BITS, MAX_PAYLOAD_BYTES, Packet, PacketError};
pub use protocol::{Catalog, CatalogError, Protocol, ProtocolId};
pub use tolerance::Tolerance;

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Decode-trace report handed to the diagnostics collaborator.
///
/// # Examples
/// ```
/// use irpulse_core::{Catalog, Tolerance, build_report, decode_traced};
///
/// let catalog = Catalog::standard();
/// let raw = [0, 9000, 4500, 560, 1690, 560];
/// let outcome = decode_traced(&raw, &catalog, Tolerance::default());
/// let report = build_report(&raw, &outcome, Tolerance::default());
/// assert_eq!(report.report_version, irpulse_core::REPORT_VERSION);
/// assert!(report.packet.is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Report schema version (not the crate version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Tolerance percentage the probe ran with.
    pub tolerance_percent: u32,
    /// Number of durations in the capture, lead space included.
    pub raw_len: usize,
    /// The decoded packet, absent when no protocol matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet: Option<PacketSummary>,
    /// One entry per probed protocol, in catalog order.
    pub attempts: Vec<AttemptSummary>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Diagnostics-friendly view of a decoded packet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketSummary {
    /// Protocol name (e.g., "Junco").
    pub protocol: String,
    /// Decoded bit count.
    pub bits: u8,
    /// Payload bytes as lowercase hex, MSB-first packing.
    pub payload_hex: String,
    /// True when the capture ended at a mid-stream repeat marker.
    pub repeated: bool,
}

/// One probed protocol: where the attempt stopped and why it failed, if it
/// did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSummary {
    /// Protocol name.
    pub protocol: String,
    /// Raw-sequence offset at which the attempt stopped.
    pub stopped_at: usize,
    /// Failure description; absent for the matching protocol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Assembles the report for one traced decode.
pub fn build_report(raw: &[u32], outcome: &DecodeOutcome, tolerance: Tolerance) -> DecodeReport {
    let packet = outcome.packet.as_ref().map(|packet| PacketSummary {
        protocol: packet
            .protocol
            .map(|id| id.name().to_string())
            .unwrap_or_default(),
        bits: packet.bit_count,
        payload_hex: to_hex(packet.payload()),
        repeated: packet.is_repeated,
    });
    let attempts = outcome
        .attempts
        .iter()
        .map(|attempt| AttemptSummary {
            protocol: attempt.protocol.name().to_string(),
            stopped_at: attempt.stopped_at,
            error: attempt.error.map(|error| error.to_string()),
        })
        .collect();
    DecodeReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "irpulse".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        tolerance_percent: tolerance.percent(),
        raw_len: raw.len(),
        packet,
        attempts,
    }
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

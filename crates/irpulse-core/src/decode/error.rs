use serde::Serialize;
use thiserror::Error;

/// Why a single-protocol decode attempt stopped.
///
/// These are ordinary values, not faults: during multi-protocol probing
/// every non-matching protocol is expected to fail with one of them.
/// `try_decode` never panics on malformed timing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum DecodeError {
    #[error("raw sequence of {len} durations is too short to hold a packet")]
    NotEnoughData { len: usize },
    #[error("header pulse at offset {offset} ({observed} us) outside tolerance")]
    HeaderMismatch { offset: usize, observed: u32 },
    #[error("derived bit count {bits} exceeds payload capacity")]
    DataOverflow { bits: usize },
    #[error("bit mark at offset {offset} ({observed} us) outside tolerance")]
    MarkMismatch { offset: usize, observed: u32 },
    #[error("space at offset {offset} ({observed} us) matches no bit, trailer, or repeat timing")]
    SpaceMismatch { offset: usize, observed: u32 },
    #[error("trailer pulse at offset {offset} ({observed} us) outside tolerance")]
    TrailMismatch { offset: usize, observed: u32 },
}

impl DecodeError {
    /// The raw-sequence offset the failure points at, when it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::HeaderMismatch { offset, .. }
            | DecodeError::MarkMismatch { offset, .. }
            | DecodeError::SpaceMismatch { offset, .. }
            | DecodeError::TrailMismatch { offset, .. } => Some(*offset),
            DecodeError::NotEnoughData { .. } | DecodeError::DataOverflow { .. } => None,
        }
    }
}

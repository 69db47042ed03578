//! Tolerance-based decoding of raw mark/space captures.
//!
//! Layered like the rest of the crate:
//! - `error`: the decode failure taxonomy (ordinary probe outcomes)
//! - `reader`: raw-sequence framing conventions and safe access
//! - `parser`: the per-protocol state machine and the catalog drivers
//!
//! Decoding is pure: no I/O, no shared mutable state, and `try_decode`
//! never panics on malformed timing data. A failed attempt against one
//! protocol is final for that protocol; the driver simply proceeds to the
//! next catalog entry.

pub mod error;
pub mod parser;
mod reader;

pub use error::DecodeError;
pub use parser::{Attempt, DecodeOutcome, decode, decode_traced, try_decode};

use serde::Serialize;

use super::error::DecodeError;
use super::reader::RawReader;
use crate::packet::{MAX_BITS, MAX_PAYLOAD_BYTES, Packet};
use crate::protocol::{Catalog, Protocol, ProtocolId};
use crate::tolerance::Tolerance;

/// One per-protocol probe: where the attempt stopped, and why it failed if
/// it did. Recorded for diagnostics; failures here are expected outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub protocol: ProtocolId,
    pub stopped_at: usize,
    pub error: Option<DecodeError>,
}

/// Result of probing the whole catalog against one capture.
#[derive(Debug, Clone)]
pub struct DecodeOutcome {
    pub packet: Option<Packet>,
    pub attempts: Vec<Attempt>,
}

/// Attempts to reconstruct a bit payload from `raw` using one protocol's
/// timings.
///
/// The capture must follow the receiver framing: ignored lead space at
/// index 0, then alternating mark/space durations ending with a lone
/// closing mark. All failures are ordinary [`DecodeError`] values.
///
/// # Examples
/// ```
/// use irpulse_core::{Catalog, ProtocolId, Tolerance, try_decode};
///
/// let catalog = Catalog::standard();
/// let junco = catalog.get(ProtocolId::Junco).unwrap();
/// let raw = [0, 9000, 4500, 560, 1690, 560];
/// let packet = try_decode(&raw, junco, Tolerance::default()).unwrap();
/// assert_eq!(packet.bit_count, 1);
/// assert!(packet.bit(0));
/// ```
pub fn try_decode(
    raw: &[u32],
    protocol: &Protocol,
    tolerance: Tolerance,
) -> Result<Packet, DecodeError> {
    BitParser::new(raw, protocol, tolerance).run()
}

/// Tries each catalog protocol in order and returns the first match.
///
/// "No protocol matched" is an expected outcome, not a fault, hence
/// `Option` rather than `Result`.
///
/// # Examples
/// ```
/// use irpulse_core::{Catalog, ProtocolId, Tolerance, decode};
///
/// let catalog = Catalog::standard();
/// let raw = [0, 9000, 4500, 560, 600, 560, 1690, 560];
/// let packet = decode(&raw, &catalog, Tolerance::default()).expect("junco frame");
/// assert_eq!(packet.protocol, Some(ProtocolId::Junco));
/// assert_eq!(packet.bit_count, 2);
/// ```
pub fn decode(raw: &[u32], catalog: &Catalog, tolerance: Tolerance) -> Option<Packet> {
    catalog
        .iter()
        .find_map(|protocol| try_decode(raw, protocol, tolerance).ok())
}

/// Like [`decode`], but records one [`Attempt`] per probed protocol for the
/// diagnostics collaborator. Probing still short-circuits on the first
/// success.
pub fn decode_traced(raw: &[u32], catalog: &Catalog, tolerance: Tolerance) -> DecodeOutcome {
    let mut attempts = Vec::with_capacity(catalog.len());
    for protocol in catalog.iter() {
        let mut parser = BitParser::new(raw, protocol, tolerance);
        match parser.run() {
            Ok(packet) => {
                attempts.push(Attempt {
                    protocol: protocol.id,
                    stopped_at: parser.offset,
                    error: None,
                });
                return DecodeOutcome {
                    packet: Some(packet),
                    attempts,
                };
            }
            Err(error) => {
                attempts.push(Attempt {
                    protocol: protocol.id,
                    stopped_at: error.offset().unwrap_or(parser.offset),
                    error: Some(error),
                });
            }
        }
    }
    DecodeOutcome {
        packet: None,
        attempts,
    }
}

/// Per-attempt state machine: header mark, header space, then bit pairs
/// until the derived count is exhausted or a trailer/repeat marker ends the
/// stream early.
struct BitParser<'a> {
    reader: RawReader<'a>,
    protocol: &'a Protocol,
    tolerance: Tolerance,
    offset: usize,
}

impl<'a> BitParser<'a> {
    fn new(raw: &'a [u32], protocol: &'a Protocol, tolerance: Tolerance) -> Self {
        Self {
            reader: RawReader::new(raw),
            protocol,
            tolerance,
            // Skip the lead space.
            offset: 1,
        }
    }

    fn run(&mut self) -> Result<Packet, DecodeError> {
        self.reader.require_min_len()?;

        self.expect_header(self.protocol.header_mark)?;
        self.expect_header(self.protocol.header_space)?;

        let derived = self.reader.derived_bit_count();
        if derived > MAX_BITS as usize {
            return Err(DecodeError::DataOverflow { bits: derived });
        }

        let mut data = [0u8; MAX_PAYLOAD_BYTES];
        let mut bit_count = 0usize;
        let mut repeated = false;

        for _ in 0..derived {
            let mark = self.reader.at(self.offset);
            if !self.tolerance.matches(mark, self.protocol.bit_mark) {
                return Err(DecodeError::MarkMismatch {
                    offset: self.offset,
                    observed: mark,
                });
            }

            let space_offset = self.offset + 1;
            let space = self.reader.at(space_offset);

            if self.tolerance.matches(space, self.protocol.one_space) {
                set_bit(&mut data, bit_count);
                bit_count += 1;
                self.offset += 2;
            } else if self.tolerance.matches(space, self.protocol.zero_space) {
                bit_count += 1;
                self.offset += 2;
            } else if self.protocol.has_trailer() && self.reader.is_final_pair(self.offset) {
                // The mark that opened this pair was the closing mark; what
                // follows must be the trailer pair.
                self.expect_trailer(space_offset, space)?;
                break;
            } else if self.tolerance.matches(space, self.protocol.repeat_space) {
                repeated = true;
                self.offset += 2;
                break;
            } else {
                return Err(DecodeError::SpaceMismatch {
                    offset: space_offset,
                    observed: space,
                });
            }
        }

        // Bits were placed MSB-first at their final positions, so a partial
        // last byte is already left-aligned with zeroed low-order bits.
        Ok(Packet {
            protocol: Some(self.protocol.id),
            bit_count: bit_count as u8,
            data,
            is_valid: true,
            is_repeated: repeated,
        })
    }

    fn expect_header(&mut self, expected: u32) -> Result<(), DecodeError> {
        let observed = self.reader.at(self.offset);
        if !self.tolerance.matches(observed, expected) {
            return Err(DecodeError::HeaderMismatch {
                offset: self.offset,
                observed,
            });
        }
        self.offset += 1;
        Ok(())
    }

    fn expect_trailer(&mut self, space_offset: usize, space: u32) -> Result<(), DecodeError> {
        if !self.tolerance.matches(space, self.protocol.trail_space) {
            return Err(DecodeError::TrailMismatch {
                offset: space_offset,
                observed: space,
            });
        }
        let mark_offset = space_offset + 1;
        let mark = self.reader.at(mark_offset);
        if !self.tolerance.matches(mark, self.protocol.trail_mark) {
            return Err(DecodeError::TrailMismatch {
                offset: mark_offset,
                observed: mark,
            });
        }
        self.offset = mark_offset + 1;
        Ok(())
    }
}

fn set_bit(data: &mut [u8; MAX_PAYLOAD_BYTES], index: usize) {
    data[index / 8] |= 1 << (7 - index % 8);
}

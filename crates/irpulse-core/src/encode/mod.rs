//! Turning packets back into transmitter pulse instructions.
//!
//! The emitted sequence mirrors the decoder's framing by construction:
//! header pair, one mark/space pair per bit (MSB-first), a closing mark,
//! the trailer pair when the protocol has one, a full block repetition
//! after the repeat space when the packet is flagged repeated, and a
//! terminal idle space so the transmitter returns to the off state.

pub mod error;

pub use error::EncodeError;

use serde::{Deserialize, Serialize};

use crate::packet::Packet;
use crate::protocol::{Catalog, Protocol};

/// One transmitter instruction: carrier on (`Mark`) or off (`Space`),
/// duration in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pulse {
    Mark(u32),
    Space(u32),
}

impl Pulse {
    pub fn duration(&self) -> u32 {
        match self {
            Pulse::Mark(duration) | Pulse::Space(duration) => *duration,
        }
    }

    pub fn is_mark(&self) -> bool {
        matches!(self, Pulse::Mark(_))
    }
}

/// Produces the pulse sequence a transmitter must emit to reproduce
/// `packet`.
///
/// Fails only on caller programming errors: an invalid or protocol-less
/// packet, a protocol id missing from `catalog`, or a repeat flag on a
/// protocol without a repeat marker.
///
/// # Examples
/// ```
/// use irpulse_core::{Catalog, Packet, ProtocolId, Pulse, encode};
///
/// let catalog = Catalog::standard();
/// let packet = Packet::assemble(ProtocolId::Junco, 1, &[0b1000_0000]).unwrap();
/// let pulses = encode(&packet, &catalog).unwrap();
/// assert_eq!(pulses[0], Pulse::Mark(9000));
/// assert_eq!(*pulses.last().unwrap(), Pulse::Space(0));
/// ```
pub fn encode(packet: &Packet, catalog: &Catalog) -> Result<Vec<Pulse>, EncodeError> {
    let Some(id) = packet.protocol else {
        return Err(EncodeError::InvalidPacket);
    };
    if !packet.is_valid {
        return Err(EncodeError::InvalidPacket);
    }
    let protocol = catalog
        .get(id)
        .ok_or(EncodeError::UnknownProtocol { id })?;
    if packet.is_repeated && !protocol.has_repeat() {
        return Err(EncodeError::MissingRepeat { protocol: id });
    }

    let mut pulses = Vec::new();
    emit_block(&mut pulses, packet, protocol);
    if packet.is_repeated {
        pulses.push(Pulse::Space(protocol.repeat_space));
        emit_block(&mut pulses, packet, protocol);
    }
    // Idle: the transmitter must end in the off state regardless of
    // protocol.
    pulses.push(Pulse::Space(0));
    Ok(pulses)
}

fn emit_block(pulses: &mut Vec<Pulse>, packet: &Packet, protocol: &Protocol) {
    pulses.push(Pulse::Mark(protocol.header_mark));
    pulses.push(Pulse::Space(protocol.header_space));
    for index in 0..packet.bit_count {
        pulses.push(Pulse::Mark(protocol.bit_mark));
        let space = if packet.bit(index) {
            protocol.one_space
        } else {
            protocol.zero_space
        };
        pulses.push(Pulse::Space(space));
    }
    // Closing mark with no matching space.
    pulses.push(Pulse::Mark(protocol.bit_mark));
    if protocol.has_trailer() {
        pulses.push(Pulse::Space(protocol.trail_space));
        pulses.push(Pulse::Mark(protocol.trail_mark));
    }
}

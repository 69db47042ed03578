//! The decoded/encodable packet and its storage byte contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::{Catalog, ProtocolId};

/// Payload capacity in bytes.
pub const MAX_PAYLOAD_BYTES: usize = 20;
/// Payload capacity in bits.
pub const MAX_BITS: u8 = (MAX_PAYLOAD_BYTES * 8) as u8;

/// Packet construction and storage-contract failures.
#[derive(Debug, Error)]
pub enum PacketError {
    #[error("packet is not valid or carries no protocol")]
    Invalid,
    #[error("packet has no payload")]
    EmptyPayload,
    #[error("bit count {bits} exceeds payload capacity")]
    Overflow { bits: u8 },
    #[error("stored packet needs {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("unknown protocol id: {id}")]
    UnknownProtocol { id: u8 },
}

/// One decoded (or to-be-encoded) remote-control packet.
///
/// Bits are packed MSB-first: payload bit 0 occupies the most significant
/// bit of `data[0]`. When `bit_count` is not a multiple of 8 the final
/// partial byte is left-aligned, its unused low-order bits zero. While
/// `is_valid` is false the payload contents are undefined and must not be
/// consumed.
///
/// The protocol field is a non-owning reference into the catalog; the
/// catalog owns the timing records and lookups happen at use sites.
///
/// # Examples
/// ```
/// use irpulse_core::{Packet, ProtocolId};
///
/// let packet = Packet::assemble(ProtocolId::Junco, 16, &[0x20, 0xdf]).unwrap();
/// assert_eq!(packet.byte_len(), 2);
/// assert!(packet.bit(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub protocol: Option<ProtocolId>,
    pub bit_count: u8,
    pub data: [u8; MAX_PAYLOAD_BYTES],
    pub is_valid: bool,
    pub is_repeated: bool,
}

impl Default for Packet {
    /// An invalid, empty packet awaiting population by a decode.
    fn default() -> Self {
        Self {
            protocol: None,
            bit_count: 0,
            data: [0; MAX_PAYLOAD_BYTES],
            is_valid: false,
            is_repeated: false,
        }
    }
}

impl Packet {
    /// Manual construction for encoding: all fields fully specified.
    ///
    /// `payload` must hold at least `ceil(bit_count / 8)` bytes; extra bytes
    /// are ignored.
    pub fn assemble(
        protocol: ProtocolId,
        bit_count: u8,
        payload: &[u8],
    ) -> Result<Self, PacketError> {
        if bit_count > MAX_BITS {
            return Err(PacketError::Overflow { bits: bit_count });
        }
        let needed = (bit_count as usize).div_ceil(8);
        if payload.len() < needed {
            return Err(PacketError::TooShort {
                needed,
                actual: payload.len(),
            });
        }
        let mut data = [0u8; MAX_PAYLOAD_BYTES];
        data[..needed].copy_from_slice(&payload[..needed]);
        Ok(Self {
            protocol: Some(protocol),
            bit_count,
            data,
            is_valid: true,
            is_repeated: false,
        })
    }

    /// Payload length in bytes: `ceil(bit_count / 8)`.
    pub fn byte_len(&self) -> usize {
        (self.bit_count as usize).div_ceil(8)
    }

    /// The occupied payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.byte_len()]
    }

    /// Payload bit at `index`, MSB-first.
    pub fn bit(&self, index: u8) -> bool {
        let index = index as usize;
        self.data[index / 8] & (1 << (7 - index % 8)) != 0
    }

    /// Size of the stored form: payload plus the three header bytes.
    pub fn stored_len(&self) -> usize {
        self.byte_len() + 3
    }

    /// Serializes to the storage contract:
    /// `[bit_count][protocol_id][repeated_flag][payload…]`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PacketError> {
        let Some(protocol) = self.protocol else {
            return Err(PacketError::Invalid);
        };
        if !self.is_valid {
            return Err(PacketError::Invalid);
        }
        if self.byte_len() == 0 {
            return Err(PacketError::EmptyPayload);
        }
        let mut bytes = Vec::with_capacity(self.stored_len());
        bytes.push(self.bit_count);
        bytes.push(protocol as u8);
        bytes.push(u8::from(self.is_repeated));
        bytes.extend_from_slice(self.payload());
        Ok(bytes)
    }

    /// Deserializes from the storage contract, validating the bit count and
    /// that the stored protocol id exists in `catalog`.
    pub fn from_bytes(bytes: &[u8], catalog: &Catalog) -> Result<Self, PacketError> {
        if bytes.len() < 3 {
            return Err(PacketError::TooShort {
                needed: 3,
                actual: bytes.len(),
            });
        }
        let bit_count = bytes[0];
        if bit_count == 0 {
            return Err(PacketError::EmptyPayload);
        }
        if bit_count > MAX_BITS {
            return Err(PacketError::Overflow { bits: bit_count });
        }
        let raw_id = bytes[1];
        let protocol = ProtocolId::from_u8(raw_id)
            .filter(|id| catalog.get(*id).is_some())
            .ok_or(PacketError::UnknownProtocol { id: raw_id })?;
        let repeated = bytes[2] != 0;

        let needed = 3 + (bit_count as usize).div_ceil(8);
        if bytes.len() < needed {
            return Err(PacketError::TooShort {
                needed,
                actual: bytes.len(),
            });
        }
        let mut packet = Self::assemble(protocol, bit_count, &bytes[3..needed])?;
        packet.is_repeated = repeated;
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_BITS, MAX_PAYLOAD_BYTES, Packet, PacketError};
    use crate::protocol::{Catalog, ProtocolId};

    #[test]
    fn capacity_holds_at_least_one_byte() {
        assert!(MAX_PAYLOAD_BYTES >= 1);
        assert_eq!(MAX_BITS, 160);
    }

    #[test]
    fn byte_len_rounds_up() {
        let packet = Packet::assemble(ProtocolId::Junco, 5, &[0b1011_0000]).unwrap();
        assert_eq!(packet.byte_len(), 1);
        let packet = Packet::assemble(ProtocolId::Junco, 8, &[0xff]).unwrap();
        assert_eq!(packet.byte_len(), 1);
        let packet = Packet::assemble(ProtocolId::Junco, 9, &[0xff, 0x80]).unwrap();
        assert_eq!(packet.byte_len(), 2);
    }

    #[test]
    fn bit_reads_msb_first() {
        let packet = Packet::assemble(ProtocolId::Junco, 5, &[0b1011_0000]).unwrap();
        let bits: Vec<bool> = (0..5).map(|i| packet.bit(i)).collect();
        assert_eq!(bits, vec![true, false, true, true, false]);
    }

    #[test]
    fn assemble_rejects_overflow_and_short_payload() {
        let err = Packet::assemble(ProtocolId::Junco, 161, &[0; 21]).unwrap_err();
        assert!(matches!(err, PacketError::Overflow { bits: 161 }));

        let err = Packet::assemble(ProtocolId::Junco, 16, &[0xff]).unwrap_err();
        assert!(matches!(err, PacketError::TooShort { needed: 2, actual: 1 }));
    }

    #[test]
    fn default_packet_is_invalid() {
        let packet = Packet::default();
        assert!(!packet.is_valid);
        assert!(packet.protocol.is_none());
        assert!(matches!(packet.to_bytes(), Err(PacketError::Invalid)));
    }

    #[test]
    fn storage_round_trip() {
        let catalog = Catalog::standard();
        let mut packet = Packet::assemble(ProtocolId::Marl, 12, &[0xa5, 0x30]).unwrap();
        packet.is_repeated = true;

        let bytes = packet.to_bytes().unwrap();
        assert_eq!(bytes.len(), packet.stored_len());
        assert_eq!(bytes[..3], [12, 5, 1]);

        let restored = Packet::from_bytes(&bytes, &catalog).unwrap();
        assert_eq!(restored, packet);
    }

    #[test]
    fn from_bytes_rejects_unknown_protocol() {
        let catalog = Catalog::standard();
        let err = Packet::from_bytes(&[8, 99, 0, 0xff], &catalog).unwrap_err();
        assert!(matches!(err, PacketError::UnknownProtocol { id: 99 }));
    }

    #[test]
    fn from_bytes_rejects_id_missing_from_catalog() {
        let catalog = Catalog::new(vec![crate::protocol::Protocol::new(
            ProtocolId::Junco,
            9000,
            4500,
            560,
            600,
            1690,
        )])
        .unwrap();
        let err = Packet::from_bytes(&[8, ProtocolId::Marl as u8, 0, 0xff], &catalog).unwrap_err();
        assert!(matches!(err, PacketError::UnknownProtocol { id: 5 }));
    }

    #[test]
    fn from_bytes_rejects_truncation() {
        let catalog = Catalog::standard();
        let err = Packet::from_bytes(&[8, 1], &catalog).unwrap_err();
        assert!(matches!(err, PacketError::TooShort { needed: 3, actual: 2 }));

        let err = Packet::from_bytes(&[16, 1, 0, 0xff], &catalog).unwrap_err();
        assert!(matches!(err, PacketError::TooShort { needed: 5, actual: 4 }));

        let err = Packet::from_bytes(&[0, 1, 0], &catalog).unwrap_err();
        assert!(matches!(err, PacketError::EmptyPayload));
    }
}

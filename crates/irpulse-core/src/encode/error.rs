use thiserror::Error;

use crate::protocol::ProtocolId;

/// Encoder failures: caller-programming errors, reported once, never
/// retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("packet is not valid or carries no protocol")]
    InvalidPacket,
    #[error("protocol {id} is not in the catalog")]
    UnknownProtocol { id: ProtocolId },
    #[error("{protocol} has no repeat marker but the packet is flagged repeated")]
    MissingRepeat { protocol: ProtocolId },
}

use thiserror::Error;

use super::{Protocol, ProtocolId};

/// Configuration-time catalog validation failures.
///
/// These are fatal at startup, unlike decode errors, which are ordinary
/// probing outcomes.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one protocol")]
    Empty,
    #[error("duplicate protocol id: {id}")]
    DuplicateId { id: ProtocolId },
    #[error("{protocol}: bit mark must be nonzero")]
    ZeroBitMark { protocol: ProtocolId },
    #[error("{protocol}: {field} of {value} us is shorter than the bit mark")]
    ImplausibleDuration {
        protocol: ProtocolId,
        field: &'static str,
        value: u32,
    },
    #[error("{protocol}: trailer space and mark must be set together")]
    HalfTrailer { protocol: ProtocolId },
}

/// Ordered, immutable collection of protocol timing specifications.
///
/// Iteration order is the decode try-order: when a raw capture could
/// structurally match more than one protocol, the earlier catalog entry
/// wins. Lookup by id is a linear scan; catalogs are small.
///
/// # Examples
/// ```
/// use irpulse_core::{Catalog, ProtocolId};
///
/// let catalog = Catalog::standard();
/// let junco = catalog.get(ProtocolId::Junco).expect("built-in protocol");
/// assert_eq!(junco.header_mark, 9000);
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    protocols: Vec<Protocol>,
}

impl Catalog {
    /// Validates and wraps an ordered protocol list.
    pub fn new(protocols: Vec<Protocol>) -> Result<Self, CatalogError> {
        if protocols.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, protocol) in protocols.iter().enumerate() {
            if protocols[..index].iter().any(|p| p.id == protocol.id) {
                return Err(CatalogError::DuplicateId { id: protocol.id });
            }
            validate_timings(protocol)?;
        }
        Ok(Self { protocols })
    }

    /// The built-in protocol table, in decode try-order.
    ///
    /// The table is static and known-valid (a unit test pushes it through
    /// `Catalog::new`), so this constructor cannot fail.
    pub fn standard() -> Self {
        Self {
            protocols: standard_table(),
        }
    }

    pub fn get(&self, id: ProtocolId) -> Option<&Protocol> {
        self.protocols.iter().find(|protocol| protocol.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Protocol> {
        self.protocols.iter()
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}

fn validate_timings(protocol: &Protocol) -> Result<(), CatalogError> {
    if protocol.bit_mark == 0 {
        return Err(CatalogError::ZeroBitMark {
            protocol: protocol.id,
        });
    }
    // Nonzero durations below the bit mark cannot be real pulse widths for
    // a pulse-distance protocol.
    let fields = [
        ("header mark", protocol.header_mark),
        ("header space", protocol.header_space),
        ("zero space", protocol.zero_space),
        ("one space", protocol.one_space),
        ("trailer space", protocol.trail_space),
        ("trailer mark", protocol.trail_mark),
        ("repeat space", protocol.repeat_space),
    ];
    for (field, value) in fields {
        if value != 0 && value < protocol.bit_mark {
            return Err(CatalogError::ImplausibleDuration {
                protocol: protocol.id,
                field,
                value,
            });
        }
    }
    if (protocol.trail_space == 0) != (protocol.trail_mark == 0) {
        return Err(CatalogError::HalfTrailer {
            protocol: protocol.id,
        });
    }
    Ok(())
}

fn standard_table() -> Vec<Protocol> {
    vec![
        Protocol::new(ProtocolId::Junco, 9000, 4500, 560, 600, 1690),
        Protocol::new(ProtocolId::Yawl, 3400, 1650, 425, 425, 1250),
        Protocol::new(ProtocolId::Draftee, 500, 1700, 450, 650, 1700),
        Protocol::new(ProtocolId::Ampul, 4400, 4400, 500, 600, 1650).with_trailer(5900, 500),
        Protocol::new(ProtocolId::Marl, 6000, 3000, 520, 560, 1680).with_repeat(4200),
    ]
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, standard_table};
    use crate::protocol::{Protocol, ProtocolId};

    #[test]
    fn standard_table_passes_validation() {
        let catalog = Catalog::new(standard_table()).expect("standard table");
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn standard_order_is_try_order() {
        let catalog = Catalog::standard();
        let ids: Vec<_> = catalog.iter().map(|protocol| protocol.id).collect();
        assert_eq!(
            ids,
            vec![
                ProtocolId::Junco,
                ProtocolId::Yawl,
                ProtocolId::Draftee,
                ProtocolId::Ampul,
                ProtocolId::Marl,
            ]
        );
    }

    #[test]
    fn lookup_by_id() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.get(ProtocolId::Marl).map(|protocol| protocol.repeat_space),
            Some(4200)
        );
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = Catalog::new(Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = Catalog::new(vec![
            Protocol::new(ProtocolId::Junco, 9000, 4500, 560, 600, 1690),
            Protocol::new(ProtocolId::Junco, 3400, 1650, 425, 425, 1250),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id: ProtocolId::Junco }));
    }

    #[test]
    fn zero_bit_mark_is_rejected() {
        let err = Catalog::new(vec![Protocol::new(ProtocolId::Junco, 9000, 4500, 0, 600, 1690)])
            .unwrap_err();
        assert!(matches!(err, CatalogError::ZeroBitMark { .. }));
    }

    #[test]
    fn sub_bit_mark_duration_is_rejected() {
        let err = Catalog::new(vec![Protocol::new(ProtocolId::Junco, 9000, 4500, 560, 100, 1690)])
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("zero space"));
        assert!(msg.contains("shorter than the bit mark"));
    }

    #[test]
    fn half_trailer_is_rejected() {
        let protocol =
            Protocol::new(ProtocolId::Ampul, 4400, 4400, 500, 600, 1650).with_trailer(5900, 0);
        let err = Catalog::new(vec![protocol]).unwrap_err();
        assert!(matches!(err, CatalogError::HalfTrailer { .. }));
    }
}

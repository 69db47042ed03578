use irpulse_core::{
    Catalog, DecodeError, Protocol, ProtocolId, Tolerance, decode, decode_traced, try_decode,
};

#[test]
fn pulse_distance_reference_capture_decodes() {
    // Header (9000, 4500), bit mark 560, zero space 600, one space 1690:
    // the two data pairs decode to bits 0 then 1.
    let catalog = Catalog::standard();
    let raw = [0, 9000, 4500, 560, 600, 560, 1690, 560];

    let packet = decode(&raw, &catalog, Tolerance::default()).expect("reference capture");
    assert!(packet.is_valid);
    assert_eq!(packet.protocol, Some(ProtocolId::Junco));
    assert_eq!(packet.bit_count, 2);
    assert_eq!(packet.data[0], 0b0100_0000);
    assert_eq!(packet.byte_len(), 1);
    assert!(!packet.is_repeated);
}

#[test]
fn single_one_bit_capture_decodes() {
    let catalog = Catalog::standard();
    let raw = [0, 9000, 4500, 560, 1690, 560];

    let packet = decode(&raw, &catalog, Tolerance::default()).expect("one-bit capture");
    assert_eq!(packet.bit_count, 1);
    assert!(packet.bit(0));
    assert_eq!(packet.byte_len(), 1);
}

#[test]
fn catalog_order_resolves_structural_ambiguity() {
    // Two entries with identical timings: the earlier one must win, in
    // either ordering.
    let first = Protocol::new(ProtocolId::Junco, 9000, 4500, 560, 600, 1690);
    let second = Protocol::new(ProtocolId::Yawl, 9000, 4500, 560, 600, 1690);
    let raw = [0, 9000, 4500, 560, 1690, 560];

    let catalog = Catalog::new(vec![first, second]).expect("catalog");
    let packet = decode(&raw, &catalog, Tolerance::default()).expect("match");
    assert_eq!(packet.protocol, Some(ProtocolId::Junco));

    let reversed = Catalog::new(vec![second, first]).expect("catalog");
    let packet = decode(&raw, &reversed, Tolerance::default()).expect("match");
    assert_eq!(packet.protocol, Some(ProtocolId::Yawl));
}

#[test]
fn oversized_capture_is_rejected_per_protocol_and_overall() {
    // 200 perfectly-timed pairs exceed the 160-bit capacity.
    let mut raw = vec![0, 9000, 4500];
    for _ in 0..200 {
        raw.push(560);
        raw.push(600);
    }
    raw.push(560);

    let catalog = Catalog::standard();
    assert_eq!(decode(&raw, &catalog, Tolerance::default()), None);

    let outcome = decode_traced(&raw, &catalog, Tolerance::default());
    assert!(outcome.packet.is_none());
    let junco = &outcome.attempts[0];
    assert_eq!(junco.protocol, ProtocolId::Junco);
    assert_eq!(junco.error, Some(DecodeError::DataOverflow { bits: 200 }));
}

#[test]
fn unknown_timings_are_a_non_match_not_an_error() {
    let catalog = Catalog::standard();
    // Plausible-looking frame from a protocol the catalog does not carry.
    let raw = [0, 12000, 6000, 800, 800, 800, 2400, 800];
    assert_eq!(decode(&raw, &catalog, Tolerance::default()), None);

    let outcome = decode_traced(&raw, &catalog, Tolerance::default());
    assert_eq!(outcome.attempts.len(), catalog.len());
    assert!(outcome.attempts.iter().all(|attempt| attempt.error.is_some()));
}

#[test]
fn tolerance_widens_and_narrows_the_match() {
    let catalog = Catalog::standard();
    // Junco header mark off by 20%.
    let raw = [0, 10800, 4500, 560, 1690, 560];

    assert!(decode(&raw, &catalog, Tolerance::default()).is_some());
    assert_eq!(decode(&raw, &catalog, Tolerance::new(10)), None);
}

#[test]
fn stop_offsets_point_at_the_failure() {
    let junco = Protocol::new(ProtocolId::Junco, 9000, 4500, 560, 600, 1690);
    // Space at offset 4 matches nothing.
    let raw = [0, 9000, 4500, 560, 3000, 560, 600, 560];
    let err = try_decode(&raw, &junco, Tolerance::default()).unwrap_err();
    assert_eq!(
        err,
        DecodeError::SpaceMismatch {
            offset: 4,
            observed: 3000
        }
    );
    assert_eq!(err.offset(), Some(4));

    let catalog = Catalog::new(vec![junco]).expect("catalog");
    let outcome = decode_traced(&raw, &catalog, Tolerance::default());
    assert_eq!(outcome.attempts[0].stopped_at, 4);
}

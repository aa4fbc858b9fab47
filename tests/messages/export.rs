//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::LazyLock as Lazy;

use ipfix::error::EncodeError;
use ipfix::{assert_eq_hex, registry};

use super::{
    exporter, flow_record, flow_template, header_sequence, init_infomodel,
};

// One message of observation domain 8304: template set for template 256
// followed by a single-record data set.
static FLOW_MESSAGE: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        // Message header.
        0x00, 0x0a, 0x00, 0x44, 0x51, 0xc4, 0x5c, 0x60, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x20, 0x70,
        // Template set.
        0x00, 0x02, 0x00, 0x18, 0x01, 0x00, 0x00, 0x04, 0x00, 0x98, 0x00,
        0x08, 0x00, 0x08, 0x00, 0x04, 0x00, 0x0c, 0x00, 0x04, 0x00, 0x02,
        0x00, 0x08,
        // Data set.
        0x01, 0x00, 0x00, 0x1c, 0x00, 0x00, 0x01, 0x3f, 0x67, 0x08, 0xd7,
        0x00, 0x0a, 0x01, 0x02, 0x03, 0x0a, 0x05, 0x06, 0x07, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x1b,
    ]
});

#[test]
fn test_encode_flow_message() {
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    mb.export_ensure_set(256).unwrap();
    mb.export_namedict(&flow_record()).unwrap();

    let bytes = mb.to_bytes().unwrap();
    assert_eq_hex!(FLOW_MESSAGE.as_slice(), bytes);
}

#[test]
fn test_encode_flow_message_tuple() {
    // Tuple export with a caller-supplied order; surplus projection
    // entries are ignored.
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    mb.export_ensure_set(256).unwrap();

    let ielist = registry::spec_list([
        "packetDeltaCount",
        "destinationIPv4Address",
        "sourceIPv4Address",
        "flowStartMilliseconds",
        "octetDeltaCount",
    ])
    .unwrap();
    let rec = flow_record();
    let values = vec![
        rec["packetDeltaCount"].clone(),
        rec["destinationIPv4Address"].clone(),
        rec["sourceIPv4Address"].clone(),
        rec["flowStartMilliseconds"].clone(),
        4242u64.into(),
    ];
    mb.export_tuple(&values, Some(&ielist)).unwrap();

    let bytes = mb.to_bytes().unwrap();
    assert_eq_hex!(FLOW_MESSAGE.as_slice(), bytes);
}

#[test]
fn test_encode_reduced_length() {
    // packetDeltaCount at four octets instead of its natural eight.
    init_infomodel();
    let ies =
        registry::spec_list(["flowStartMilliseconds", "packetDeltaCount[4]"])
            .unwrap();
    let tmpl = ipfix::Template::from_ielist(258, ies).unwrap();

    let mut mb = exporter(65535, 8304);
    mb.add_template(tmpl, true).unwrap();
    mb.export_ensure_set(258).unwrap();
    mb.export_namedict(&flow_record()).unwrap();
    let bytes = mb.to_bytes().unwrap();

    // Template set with two descriptors, then a 12-octet record.
    assert_eq!(bytes.len(), 16 + 16 + 16);
    assert_eq_hex!(
        &bytes[bytes.len() - 4..],
        [0x00, 0x00, 0x00, 0x1b]
    );

    // The reduced field decodes back to the integer.
    let mut rx = ipfix::MessageBuffer::default();
    rx.from_bytes(&bytes).unwrap();
    let records = rx
        .namedict_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0]["packetDeltaCount"].as_unsigned().copied(),
        Some(27)
    );
}

#[test]
fn test_missing_field() {
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    mb.export_ensure_set(256).unwrap();

    let mut rec = flow_record();
    rec.remove("packetDeltaCount");
    assert_eq!(
        mb.export_namedict(&rec),
        Err(EncodeError::MissingField("packetDeltaCount".to_owned()))
    );

    // The failed export left no partial record behind.
    let bytes = mb.to_bytes().unwrap();
    assert_eq!(bytes.len(), 16 + 24 + 4);
}

#[test]
fn test_options_template() {
    // Options templates land in set 3 and carry their scope count across
    // the wire.
    init_infomodel();
    let ies = registry::spec_list([
        "observationDomainId",
        "exportedMessageTotalCount",
    ])
    .unwrap();
    let tmpl = ipfix::Template::options_from_ielist(259, 1, ies).unwrap();

    let mut mb = exporter(65535, 8304);
    mb.add_template(tmpl, true).unwrap();
    mb.export_ensure_set(259).unwrap();
    mb.export_tuple(&[8304u32.into(), 42u64.into()], None).unwrap();
    let bytes = mb.to_bytes().unwrap();

    // Set 3: header, then tid + field count + scope count + two
    // descriptors.
    assert_eq!(bytes.len(), 16 + 18 + 16);
    assert_eq_hex!(&bytes[16..26], [
        0x00, 0x03, 0x00, 0x12, 0x01, 0x03, 0x00, 0x02, 0x00, 0x01
    ]);

    let mut rx = ipfix::MessageBuffer::default();
    rx.from_bytes(&bytes).unwrap();
    let records = rx
        .namedict_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0]["exportedMessageTotalCount"].as_unsigned().copied(),
        Some(42)
    );
    let tmpl = rx.get_template(259).unwrap();
    assert!(tmpl.is_options());
    assert_eq!(tmpl.scope_count(), 1);
}

#[test]
fn test_sequence_monotonicity() {
    let mut mb = exporter(65535, 1);
    mb.add_template(flow_template(256), false).unwrap();

    // First message: two data records, sequence 0.
    mb.export_ensure_set(256).unwrap();
    mb.export_namedict(&flow_record()).unwrap();
    mb.export_namedict(&flow_record()).unwrap();
    let bytes = mb.to_bytes().unwrap();
    assert_eq!(header_sequence(&bytes), 0);

    // Second message: three records, sequence advanced by two.
    mb.begin_export(None);
    mb.export_ensure_set(256).unwrap();
    for _ in 0..3 {
        mb.export_namedict(&flow_record()).unwrap();
    }
    let bytes = mb.to_bytes().unwrap();
    assert_eq!(header_sequence(&bytes), 2);

    // Third message: no records, sequence advanced by three.
    mb.begin_export(None);
    let bytes = mb.to_bytes().unwrap();
    assert_eq!(header_sequence(&bytes), 5);
}

#[test]
fn test_template_scoping() {
    // A template registered under one observation domain is not visible
    // from another.
    let mut mb = exporter(65535, 1);
    mb.add_template(flow_template(256), false).unwrap();
    mb.begin_export(Some(2));
    assert_eq!(
        mb.export_ensure_set(256),
        Err(EncodeError::TemplateNotFound(256))
    );

    mb.begin_export(Some(1));
    mb.export_ensure_set(256).unwrap();
}

#[test]
fn test_wrong_state() {
    init_infomodel();
    let mut mb = ipfix::MessageBuffer::default();
    assert_eq!(
        mb.export_ensure_set(256),
        Err(EncodeError::InvalidState)
    );
    assert_eq!(
        mb.export_namedict(&flow_record()),
        Err(EncodeError::InvalidState)
    );
    assert_eq!(mb.to_bytes(), Err(EncodeError::InvalidState));

    // Exporting a record into a template set is refused.
    mb.begin_export(Some(1));
    mb.add_template(flow_template(256), true).unwrap();
    assert_eq!(
        mb.export_namedict(&flow_record()),
        Err(EncodeError::InvalidState)
    );
}

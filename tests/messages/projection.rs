//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use ipfix::types::FieldValue;
use ipfix::{MessageBuffer, Template, registry};
use maplit::hashmap;

use super::{export_time, exporter, flow_record, flow_template};

#[test]
fn test_tuple_projection_skips_templates() {
    // Template 256 carries packetDeltaCount; template 257 does not. A
    // tuple projection over packetDeltaCount must only see 256's records.
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    let ies = registry::spec_list([
        "flowStartMilliseconds",
        "octetDeltaCount",
    ])
    .unwrap();
    mb.add_template(Template::from_ielist(257, ies).unwrap(), true)
        .unwrap();

    mb.export_new_set(256).unwrap();
    mb.export_namedict(&flow_record()).unwrap();
    mb.export_new_set(257).unwrap();
    mb.export_namedict(&hashmap! {
        "flowStartMilliseconds".to_owned() => export_time().into(),
        "octetDeltaCount".to_owned() => 9000u64.into(),
    })
    .unwrap();
    let bytes = mb.to_bytes().unwrap();

    let mut rx = MessageBuffer::default();
    rx.from_bytes(&bytes).unwrap();
    let projection = registry::spec_list([
        "flowStartMilliseconds",
        "packetDeltaCount",
    ])
    .unwrap();
    let records = rx
        .tuple_iter(projection)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(
        records,
        vec![vec![
            FieldValue::from(export_time()),
            FieldValue::from(27u64),
        ]]
    );
}

#[test]
fn test_tuple_projection_reorders() {
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    mb.export_ensure_set(256).unwrap();
    mb.export_namedict(&flow_record()).unwrap();
    let bytes = mb.to_bytes().unwrap();

    // Projection order differs from template order.
    let mut rx = MessageBuffer::default();
    rx.from_bytes(&bytes).unwrap();
    let projection = registry::spec_list([
        "packetDeltaCount",
        "flowStartMilliseconds",
    ])
    .unwrap();
    let records = rx
        .tuple_iter(projection)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(
        records,
        vec![vec![
            FieldValue::from(27u64),
            FieldValue::from(export_time()),
        ]]
    );
}

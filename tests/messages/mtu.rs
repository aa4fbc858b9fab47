//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use ipfix::MessageBuffer;
use ipfix::error::EncodeError;

use super::{exporter, flow_record, flow_template};

#[test]
fn test_mtu_exhaustion_and_recovery() {
    // Header (16) plus template set (28) plus data set header (4) fill a
    // 48-octet MTU; the first 24-octet record no longer fits.
    let mut mb = exporter(48, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    mb.export_ensure_set(256).unwrap();
    assert_eq!(
        mb.export_namedict(&flow_record()),
        Err(EncodeError::EndOfMessage)
    );

    let first = mb.to_bytes().unwrap();
    // Header, template set, and the empty data set that was opened.
    assert_eq!(first.len(), 16 + 24 + 4);

    // The record fits in the next message: the template is already
    // registered, so only the data set is emitted.
    mb.begin_export(None);
    mb.export_ensure_set(256).unwrap();
    mb.export_namedict(&flow_record()).unwrap();
    let second = mb.to_bytes().unwrap();
    assert_eq!(second.len(), 16 + 4 + 24);

    // The collector learns the template from the first message and
    // decodes the record from the second.
    let mut rx = MessageBuffer::default();
    rx.from_bytes(&first).unwrap();
    assert_eq!(rx.namedict_iter().count(), 0);
    rx.from_bytes(&second).unwrap();
    let records = rx
        .namedict_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], flow_record());
}

#[test]
fn test_mtu_rollback_is_byte_identical() {
    // A failed export leaves the buffer exactly as it was.
    let mut attempted = exporter(48, 8304);
    attempted.add_template(flow_template(256), true).unwrap();
    attempted.export_ensure_set(256).unwrap();
    assert_eq!(
        attempted.export_namedict(&flow_record()),
        Err(EncodeError::EndOfMessage)
    );

    let mut control = exporter(48, 8304);
    control.add_template(flow_template(256), true).unwrap();
    control.export_ensure_set(256).unwrap();

    assert_eq!(
        attempted.to_bytes().unwrap(),
        control.to_bytes().unwrap()
    );
}

#[test]
fn test_mtu_template_set() {
    // Even the template set respects the MTU.
    let mut mb = exporter(20, 8304);
    assert_eq!(
        mb.add_template(flow_template(256), true),
        Err(EncodeError::EndOfMessage)
    );

    // The template was still registered; it can be exported in the next
    // message or used directly.
    mb.begin_export(None);
    mb.export_ensure_set(256).unwrap();
}

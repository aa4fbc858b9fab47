//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use ipfix::error::EncodeError;
use ipfix::{MessageBuffer, assert_eq_hex};

use super::{exporter, flow_record, flow_template};

#[test]
fn test_encode_withdrawal() {
    // Template announcement followed by its withdrawal in the same
    // template set.
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    mb.delete_template(256, true).unwrap();
    let bytes = mb.to_bytes().unwrap();

    assert_eq!(bytes.len(), 16 + 4 + 20 + 4);
    // Set 2 closes over both records; the withdrawal is a template record
    // with field count zero.
    assert_eq_hex!(
        &bytes[16..20],
        [0x00, 0x02, 0x00, 0x1c]
    );
    assert_eq_hex!(
        &bytes[bytes.len() - 4..],
        [0x01, 0x00, 0x00, 0x00]
    );

    // The exporter can no longer open a data set for the withdrawn
    // template.
    mb.begin_export(None);
    assert_eq!(
        mb.export_ensure_set(256),
        Err(EncodeError::TemplateNotFound(256))
    );
}

#[test]
fn test_decode_withdrawal() {
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    mb.delete_template(256, true).unwrap();
    let bytes = mb.to_bytes().unwrap();

    let mut rx = MessageBuffer::default();
    rx.from_bytes(&bytes).unwrap();
    assert_eq!(rx.namedict_iter().count(), 0);
    // The collector's domain table ends with the template absent.
    assert!(rx.get_template(256).is_none());
    assert!(rx.active_template_ids().is_empty());
}

#[test]
fn test_withdrawn_template_data_skipped() {
    // First message announces the template and carries a record; the
    // second withdraws it and references it again. The trailing data set
    // must be skipped.
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    mb.export_ensure_set(256).unwrap();
    mb.export_namedict(&flow_record()).unwrap();
    let first = mb.to_bytes().unwrap();

    mb.begin_export(None);
    mb.delete_template(256, true).unwrap();
    let second = mb.to_bytes().unwrap();

    // Hand-craft a data set for the withdrawn template after the
    // withdrawal.
    let mut second = second.to_vec();
    second.extend_from_slice(&[0x01, 0x00, 0x00, 0x08]);
    second.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    let length = second.len() as u16;
    second[2..4].copy_from_slice(&length.to_be_bytes());

    let mut rx = MessageBuffer::default();
    rx.from_bytes(&first).unwrap();
    assert_eq!(rx.namedict_iter().count(), 1);
    assert!(rx.get_template(256).is_some());

    rx.from_bytes(&second).unwrap();
    assert_eq!(rx.namedict_iter().count(), 0);
    assert!(rx.get_template(256).is_none());
}

#[test]
fn test_delete_unknown_template() {
    let mut mb = exporter(65535, 8304);
    assert_eq!(
        mb.delete_template(256, true),
        Err(EncodeError::TemplateNotFound(256))
    );
}

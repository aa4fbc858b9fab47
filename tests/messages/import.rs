//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::Bytes;
use ipfix::error::DecodeError;
use ipfix::{MessageBuffer, registry};

use super::{
    export_time, exporter, flow_record, flow_template, init_infomodel,
};

fn flow_message() -> Bytes {
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), true).unwrap();
    mb.export_ensure_set(256).unwrap();
    mb.export_namedict(&flow_record()).unwrap();
    mb.to_bytes().unwrap()
}

#[test]
fn test_decode_flow_message() {
    let bytes = flow_message();

    let mut mb = MessageBuffer::default();
    mb.from_bytes(&bytes).unwrap();
    assert_eq!(mb.odid(), 8304);
    assert_eq!(mb.sequence(), 0);
    assert_eq!(mb.export_time(), export_time());

    let records = mb
        .namedict_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], flow_record());

    // The template set was fed into the domain table.
    let tmpl = mb.get_template(256).unwrap();
    assert_eq!(*tmpl, flow_template(256));
}

#[test]
fn test_decode_iedict() {
    init_infomodel();
    let bytes = flow_message();

    let mut mb = MessageBuffer::default();
    mb.from_bytes(&bytes).unwrap();
    let records = mb
        .iedict_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);

    let packets = registry::for_spec("packetDeltaCount").unwrap();
    assert_eq!(
        records[0][&packets].as_unsigned().copied(),
        Some(27)
    );
}

#[test]
fn test_message_roundtrip() {
    // Re-exporting the decoded records reproduces the message bytes.
    let bytes = flow_message();

    let mut rx = MessageBuffer::default();
    rx.from_bytes(&bytes).unwrap();
    let records = rx
        .namedict_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let mut tx = exporter(65535, 8304);
    tx.add_template(flow_template(256), true).unwrap();
    tx.export_ensure_set(256).unwrap();
    for record in &records {
        tx.export_namedict(record).unwrap();
    }
    assert_eq!(tx.to_bytes().unwrap(), bytes);
}

#[test]
fn test_skip_unknown_template() {
    // A data set whose template was never seen yields zero records
    // rather than a failure.
    let mut mb = exporter(65535, 8304);
    mb.add_template(flow_template(256), false).unwrap();
    mb.export_ensure_set(256).unwrap();
    mb.export_namedict(&flow_record()).unwrap();
    let bytes = mb.to_bytes().unwrap();

    let mut rx = MessageBuffer::default();
    rx.from_bytes(&bytes).unwrap();
    assert_eq!(rx.namedict_iter().count(), 0);
}

#[test]
fn test_single_pass_iteration() {
    let bytes = flow_message();

    let mut mb = MessageBuffer::default();
    mb.from_bytes(&bytes).unwrap();
    assert_eq!(mb.namedict_iter().count(), 1);
    // Re-reading requires another `from_bytes`.
    assert_eq!(mb.namedict_iter().count(), 0);
    mb.from_bytes(&bytes).unwrap();
    assert_eq!(mb.namedict_iter().count(), 1);
}

#[test]
fn test_decode_malformed_header() {
    let mut mb = MessageBuffer::default();

    // Wrong version.
    let mut bytes = flow_message().to_vec();
    bytes[0] = 0x00;
    bytes[1] = 0x09;
    assert_eq!(
        mb.from_bytes(&bytes),
        Err(DecodeError::InvalidVersion(9))
    );

    // Message length past the buffer.
    let bytes = flow_message();
    assert_eq!(
        mb.from_bytes(&bytes[..bytes.len() - 1]),
        Err(DecodeError::InvalidMessageLength(bytes.len() as u16))
    );

    // Truncated header.
    assert_eq!(
        mb.from_bytes(&bytes[..10]),
        Err(DecodeError::IncompleteMessage)
    );
}

#[test]
fn test_decode_malformed_set() {
    // Set length running past the message.
    let mut bytes = flow_message().to_vec();
    bytes[18] = 0xff;
    bytes[19] = 0xff;

    let mut mb = MessageBuffer::default();
    assert_eq!(
        mb.from_bytes(&bytes),
        Err(DecodeError::InvalidSetLength(65535))
    );

    // Set length smaller than its own header.
    let mut bytes = flow_message().to_vec();
    bytes[18] = 0x00;
    bytes[19] = 0x03;
    assert_eq!(
        mb.from_bytes(&bytes),
        Err(DecodeError::InvalidSetLength(3))
    );
}

#[test]
fn test_read_message_stream() {
    // An IPFIX File is a plain concatenation of messages.
    let bytes = flow_message();
    let mut stream = Vec::new();
    stream.extend_from_slice(&bytes);
    stream.extend_from_slice(&bytes);

    let mut cursor = std::io::Cursor::new(stream);
    let mut mb = MessageBuffer::default();
    let mut total = 0;
    while mb.read_message(&mut cursor).unwrap() {
        total += mb.namedict_iter().count();
    }
    assert_eq!(total, 2);
}

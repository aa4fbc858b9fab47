//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::{Arc, LazyLock as Lazy};

use bytes::BytesMut;
use ipfix::consts::VARLEN;
use ipfix::ie::{InformationElement, InformationElementList};
use ipfix::types::{DataType, FieldValue};
use ipfix::{MessageBuffer, Template, assert_eq_hex, registry};
use maplit::hashmap;

use super::{export_time, exporter, init_infomodel};

// Message with template 257: a fixed-length timestamp followed by an
// enterprise-numbered variable-length string.
static VARLEN_MESSAGE: Lazy<Vec<u8>> = Lazy::new(|| {
    vec![
        // Message header.
        0x00, 0x0a, 0x00, 0x3f, 0x51, 0xc4, 0x5c, 0x60, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x20, 0x70,
        // Template set.
        0x00, 0x02, 0x00, 0x14, 0x01, 0x01, 0x00, 0x02, 0x00, 0x98, 0x00,
        0x08, 0x80, 0x01, 0xff, 0xff, 0x00, 0x00, 0x8a, 0xee,
        // Data set: 8-octet timestamp, 1-octet varlen prefix, 14 octets
        // of UTF-8.
        0x01, 0x01, 0x00, 0x1b, 0x00, 0x00, 0x01, 0x3f, 0x67, 0x08, 0xd7,
        0x00, 0x0e, 0x47, 0x72, 0xc3, 0xbc, 0x65, 0x7a, 0x69, 0x2c, 0x20,
        0x59, 0x27, 0x61, 0x6c, 0x6c,
    ]
});

fn varlen_template() -> Template {
    init_infomodel();
    let ies = registry::spec_list([
        "flowStartMilliseconds",
        "myNewInformationElement(35566/1)<string>",
    ])
    .unwrap();
    Template::from_ielist(257, ies).unwrap()
}

#[test]
fn test_encode_varlen_message() {
    let mut mb = exporter(65535, 8304);
    mb.add_template(varlen_template(), true).unwrap();
    mb.export_ensure_set(257).unwrap();
    mb.export_namedict(&hashmap! {
        "flowStartMilliseconds".to_owned() => export_time().into(),
        "myNewInformationElement".to_owned() => "Grüezi, Y'all".into(),
    })
    .unwrap();

    let bytes = mb.to_bytes().unwrap();
    assert_eq_hex!(VARLEN_MESSAGE.as_slice(), bytes);
}

#[test]
fn test_decode_varlen_message() {
    // Register the private element so the decoded template resolves it.
    varlen_template();

    let mut mb = MessageBuffer::default();
    mb.from_bytes(&VARLEN_MESSAGE).unwrap();
    let records = mb
        .namedict_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0]["myNewInformationElement"].as_string().map(String::as_str),
        Some("Grüezi, Y'all")
    );
}

#[test]
fn test_varlen_prefix_boundaries() {
    // 254 octets keep the one-octet prefix; 255 and up escape to the
    // three-octet form; the maximum expressible length round-trips.
    let ies: InformationElementList = vec![Arc::new(
        InformationElement::new(
            "payload",
            35566,
            2,
            DataType::OctetArray,
            VARLEN,
        )
        .unwrap(),
    )]
    .into();
    let tmpl = Template::from_ielist(300, ies).unwrap();

    for (len, prefix_len) in [(0, 1), (254, 1), (255, 3), (65535, 3)] {
        let value = FieldValue::from(vec![0xa5u8; len]);
        let mut buf = BytesMut::new();
        tmpl.encode_record(&mut buf, &[value.clone()], None).unwrap();
        assert_eq!(buf.len(), prefix_len + len);
        if prefix_len == 3 {
            assert_eq!(buf[0], 0xff);
            assert_eq!(
                u16::from_be_bytes([buf[1], buf[2]]) as usize,
                len
            );
        } else {
            assert_eq!(buf[0] as usize, len);
        }

        let mut cursor = buf.freeze();
        let values = tmpl.decode_record(&mut cursor, None).unwrap();
        assert_eq!(values, vec![value]);
    }
}

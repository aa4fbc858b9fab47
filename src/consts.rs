//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

// IPFIX protocol version carried in every message header.
pub const IPFIX_VERSION: u16 = 10;

// Message header size in octets.
pub const MSG_HDR_SIZE: usize = 16;

// Set header size in octets (set ID + set length).
pub const SET_HDR_SIZE: usize = 4;

// Reserved set IDs.
//
// IANA registry:
// https://www.iana.org/assignments/ipfix/ipfix.xhtml#ipfix-set-ids
pub const TEMPLATE_SET_ID: u16 = 2;
pub const OPTIONS_SET_ID: u16 = 3;

// Data set IDs equal the template ID describing their records.
pub const MIN_TEMPLATE_ID: u16 = 256;
pub const MAX_TEMPLATE_ID: u16 = u16::MAX;

// Sentinel field length denoting a variable-length Information Element.
pub const VARLEN: u16 = 65535;

// One-octet varlen prefix escape: lengths >= 255 use the three-octet form.
pub const VARLEN_LONG_FORM: u8 = 255;

// Enterprise flag in a template field specifier's element ID.
pub const ENTERPRISE_BIT: u16 = 0x8000;

// Private Enterprise Number of the RFC 5103 reverse information elements.
pub const REVERSE_PEN: u32 = 29305;

// Largest message the wire format can express; the default MTU.
pub const DEFAULT_MTU: usize = 65535;

// Offset between the NTP era (1900-01-01) and the Unix epoch, in seconds.
pub const NTP_EPOCH_OFFSET: i64 = 2_208_988_800;

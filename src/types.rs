//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use chrono::{DateTime, Utc};
use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::consts::{NTP_EPOCH_OFFSET, VARLEN};
use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::error::{SpecError, SpecResult};

// IPFIX abstract data types.
//
// IANA registry:
// https://www.iana.org/assignments/ipfix/ipfix.xhtml#ipfix-information-element-data-types
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum DataType {
    OctetArray = 0,
    Unsigned8 = 1,
    Unsigned16 = 2,
    Unsigned32 = 3,
    Unsigned64 = 4,
    Signed8 = 5,
    Signed16 = 6,
    Signed32 = 7,
    Signed64 = 8,
    Float32 = 9,
    Float64 = 10,
    Boolean = 11,
    MacAddress = 12,
    String = 13,
    DateTimeSeconds = 14,
    DateTimeMilliseconds = 15,
    DateTimeMicroseconds = 16,
    DateTimeNanoseconds = 17,
    Ipv4Address = 18,
    Ipv6Address = 19,
}

// A single record field value.
//
// Records are dynamically typed on the wire; the variant in use is dictated
// by the data type of the Information Element describing the field.
#[derive(Clone, Debug, PartialEq)]
#[derive(EnumAsInner)]
#[derive(Deserialize, Serialize)]
pub enum FieldValue {
    Octets(Bytes),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Boolean(bool),
    MacAddr(MacAddr),
    String(String),
    Datetime(DateTime<Utc>),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
}

// 48-bit MAC address (IEEE EUI-48 format).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct MacAddr([u8; 6]);

// ===== impl DataType =====

impl DataType {
    /// Natural width of the type in octets. Variable-length types report
    /// the varlen sentinel.
    pub fn natural_len(&self) -> u16 {
        match self {
            DataType::OctetArray | DataType::String => VARLEN,
            DataType::Unsigned8 | DataType::Signed8 | DataType::Boolean => 1,
            DataType::Unsigned16 | DataType::Signed16 => 2,
            DataType::Unsigned32
            | DataType::Signed32
            | DataType::Float32
            | DataType::DateTimeSeconds
            | DataType::Ipv4Address => 4,
            DataType::Unsigned64
            | DataType::Signed64
            | DataType::Float64
            | DataType::DateTimeMilliseconds
            | DataType::DateTimeMicroseconds
            | DataType::DateTimeNanoseconds => 8,
            DataType::MacAddress => 6,
            DataType::Ipv6Address => 16,
        }
    }

    /// Whether a field of this type may be encoded with the given length:
    /// the natural width, a reduced width for integers and float64, or any
    /// length (including varlen) for the octet-sequence types.
    pub fn length_valid(&self, length: u16) -> bool {
        match self {
            DataType::OctetArray | DataType::String => length > 0,
            DataType::Unsigned8
            | DataType::Unsigned16
            | DataType::Unsigned32
            | DataType::Unsigned64
            | DataType::Signed8
            | DataType::Signed16
            | DataType::Signed32
            | DataType::Signed64 => {
                length >= 1 && length <= self.natural_len()
            }
            DataType::Float64 => length == 4 || length == 8,
            _ => length == self.natural_len(),
        }
    }

    /// Encodes a value as exactly `length` octets (big-endian), appending
    /// to `buf`. Integers narrower than their natural width use
    /// reduced-length encoding; the value is preserved iff it fits.
    /// For octet-sequence types `length` is the exact number of octets to
    /// emit: shorter values are zero-padded, longer ones truncated.
    pub fn encode(
        &self,
        value: &FieldValue,
        buf: &mut BytesMut,
        length: u16,
    ) -> EncodeResult<()> {
        debug_assert_ne!(length, VARLEN);
        let length = length as usize;

        match (self, value) {
            (DataType::OctetArray, FieldValue::Octets(octets)) => {
                put_padded(buf, octets, length);
            }
            (DataType::String, FieldValue::String(string)) => {
                put_padded(buf, string.as_bytes(), length);
            }
            (
                DataType::Unsigned8
                | DataType::Unsigned16
                | DataType::Unsigned32
                | DataType::Unsigned64,
                FieldValue::Unsigned(value),
            ) => {
                buf.put_slice(&value.to_be_bytes()[8 - length..]);
            }
            (
                DataType::Signed8
                | DataType::Signed16
                | DataType::Signed32
                | DataType::Signed64,
                FieldValue::Signed(value),
            ) => {
                buf.put_slice(&value.to_be_bytes()[8 - length..]);
            }
            (DataType::Float32, FieldValue::Float(value)) => {
                buf.put_f32(*value as f32);
            }
            (DataType::Float64, FieldValue::Float(value)) => {
                // Reduced-length float64 is emitted as float32.
                if length == 4 {
                    buf.put_f32(*value as f32);
                } else {
                    buf.put_f64(*value);
                }
            }
            (DataType::Boolean, FieldValue::Boolean(value)) => {
                // SMIv2 convention.
                buf.put_u8(if *value { 1 } else { 2 });
            }
            (DataType::MacAddress, FieldValue::MacAddr(addr)) => {
                buf.put_slice(&addr.as_bytes());
            }
            (DataType::DateTimeSeconds, FieldValue::Datetime(ts)) => {
                buf.put_u32(ts.timestamp() as u32);
            }
            (DataType::DateTimeMilliseconds, FieldValue::Datetime(ts)) => {
                buf.put_u64(ts.timestamp_millis() as u64);
            }
            (
                DataType::DateTimeMicroseconds
                | DataType::DateTimeNanoseconds,
                FieldValue::Datetime(ts),
            ) => {
                let (secs, frac) = datetime_to_ntp(ts);
                buf.put_u32(secs);
                buf.put_u32(frac);
            }
            (DataType::Ipv4Address, FieldValue::Ipv4(addr)) => {
                buf.put_u32((*addr).into());
            }
            (DataType::Ipv6Address, FieldValue::Ipv6(addr)) => {
                buf.put_slice(&addr.octets());
            }
            _ => {
                return Err(EncodeError::ValueTypeMismatch {
                    name: String::new(),
                    data_type: *self,
                });
            }
        }

        Ok(())
    }

    /// Decodes a value occupying exactly `length` octets of `buf`. For
    /// variable-length fields the caller resolves the varlen prefix first
    /// and passes the actual value length.
    pub fn decode(
        &self,
        buf: &mut Bytes,
        length: u16,
    ) -> DecodeResult<FieldValue> {
        debug_assert_ne!(length, VARLEN);
        // Empty varlen octet-sequence values are legal on the wire.
        if !matches!(self, DataType::OctetArray | DataType::String)
            && !self.length_valid(length)
        {
            return Err(DecodeError::InvalidFieldLength(length));
        }
        let length = length as usize;
        if buf.remaining() < length {
            return Err(DecodeError::ReadOutOfBounds);
        }

        let value = match self {
            DataType::OctetArray => {
                FieldValue::Octets(buf.copy_to_bytes(length))
            }
            DataType::String => {
                let octets = buf.copy_to_bytes(length);
                // Fixed-length strings arrive padded with trailing NULs.
                let end = octets
                    .iter()
                    .rposition(|octet| *octet != 0)
                    .map_or(0, |pos| pos + 1);
                let string = std::str::from_utf8(&octets[..end])
                    .map_err(|_| DecodeError::InvalidString)?;
                FieldValue::String(string.to_owned())
            }
            DataType::Unsigned8
            | DataType::Unsigned16
            | DataType::Unsigned32
            | DataType::Unsigned64 => {
                let mut octets = [0; 8];
                buf.copy_to_slice(&mut octets[8 - length..]);
                FieldValue::Unsigned(u64::from_be_bytes(octets))
            }
            DataType::Signed8
            | DataType::Signed16
            | DataType::Signed32
            | DataType::Signed64 => {
                let mut octets = [0; 8];
                buf.copy_to_slice(&mut octets[8 - length..]);
                // Sign-extend reduced-length values.
                if octets[8 - length] & 0x80 != 0 {
                    octets[..8 - length].fill(0xff);
                }
                FieldValue::Signed(i64::from_be_bytes(octets))
            }
            DataType::Float32 => FieldValue::Float(buf.get_f32() as f64),
            DataType::Float64 => {
                if length == 4 {
                    FieldValue::Float(buf.get_f32() as f64)
                } else {
                    FieldValue::Float(buf.get_f64())
                }
            }
            DataType::Boolean => match buf.get_u8() {
                1 => FieldValue::Boolean(true),
                2 => FieldValue::Boolean(false),
                value => return Err(DecodeError::InvalidBoolean(value)),
            },
            DataType::MacAddress => {
                let mut octets = [0; 6];
                buf.copy_to_slice(&mut octets);
                FieldValue::MacAddr(MacAddr::from(octets))
            }
            DataType::DateTimeSeconds => {
                let secs = buf.get_u32();
                let ts = DateTime::from_timestamp(secs as i64, 0)
                    .ok_or(DecodeError::InvalidTimestamp)?;
                FieldValue::Datetime(ts)
            }
            DataType::DateTimeMilliseconds => {
                let millis = buf.get_u64();
                let ts = DateTime::from_timestamp_millis(millis as i64)
                    .ok_or(DecodeError::InvalidTimestamp)?;
                FieldValue::Datetime(ts)
            }
            DataType::DateTimeMicroseconds | DataType::DateTimeNanoseconds => {
                let secs = buf.get_u32();
                let frac = buf.get_u32();
                FieldValue::Datetime(datetime_from_ntp(secs, frac)?)
            }
            DataType::Ipv4Address => {
                FieldValue::Ipv4(Ipv4Addr::from(buf.get_u32()))
            }
            DataType::Ipv6Address => {
                FieldValue::Ipv6(Ipv6Addr::from(buf.get_u128()))
            }
        };

        Ok(value)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::OctetArray => "octetArray",
            DataType::Unsigned8 => "unsigned8",
            DataType::Unsigned16 => "unsigned16",
            DataType::Unsigned32 => "unsigned32",
            DataType::Unsigned64 => "unsigned64",
            DataType::Signed8 => "signed8",
            DataType::Signed16 => "signed16",
            DataType::Signed32 => "signed32",
            DataType::Signed64 => "signed64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Boolean => "boolean",
            DataType::MacAddress => "macAddress",
            DataType::String => "string",
            DataType::DateTimeSeconds => "dateTimeSeconds",
            DataType::DateTimeMilliseconds => "dateTimeMilliseconds",
            DataType::DateTimeMicroseconds => "dateTimeMicroseconds",
            DataType::DateTimeNanoseconds => "dateTimeNanoseconds",
            DataType::Ipv4Address => "ipv4Address",
            DataType::Ipv6Address => "ipv6Address",
        };
        write!(f, "{name}")
    }
}

impl FromStr for DataType {
    type Err = SpecError;

    fn from_str(s: &str) -> SpecResult<DataType> {
        let data_type = match s {
            "octetArray" => DataType::OctetArray,
            "unsigned8" => DataType::Unsigned8,
            "unsigned16" => DataType::Unsigned16,
            "unsigned32" => DataType::Unsigned32,
            "unsigned64" => DataType::Unsigned64,
            "signed8" => DataType::Signed8,
            "signed16" => DataType::Signed16,
            "signed32" => DataType::Signed32,
            "signed64" => DataType::Signed64,
            "float32" => DataType::Float32,
            "float64" => DataType::Float64,
            "boolean" => DataType::Boolean,
            "macAddress" => DataType::MacAddress,
            "string" => DataType::String,
            "dateTimeSeconds" => DataType::DateTimeSeconds,
            "dateTimeMilliseconds" => DataType::DateTimeMilliseconds,
            "dateTimeMicroseconds" => DataType::DateTimeMicroseconds,
            "dateTimeNanoseconds" => DataType::DateTimeNanoseconds,
            "ipv4Address" => DataType::Ipv4Address,
            "ipv6Address" => DataType::Ipv6Address,
            _ => return Err(SpecError::UnknownDataType(s.to_owned())),
        };
        Ok(data_type)
    }
}

// ===== impl FieldValue =====

impl FieldValue {
    /// Size of the value octets when carried in a variable-length field.
    /// Only the octet-sequence variants can be variable-length.
    pub(crate) fn varlen_size(&self) -> Option<usize> {
        match self {
            FieldValue::Octets(octets) => Some(octets.len()),
            FieldValue::String(string) => Some(string.len()),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Octets(octets) => {
                for octet in octets {
                    write!(f, "{octet:02x}")?;
                }
                Ok(())
            }
            FieldValue::Unsigned(value) => write!(f, "{value}"),
            FieldValue::Signed(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Boolean(value) => write!(f, "{value}"),
            FieldValue::MacAddr(addr) => write!(f, "{addr}"),
            FieldValue::String(string) => write!(f, "{string}"),
            FieldValue::Datetime(ts) => write!(f, "{ts}"),
            FieldValue::Ipv4(addr) => write!(f, "{addr}"),
            FieldValue::Ipv6(addr) => write!(f, "{addr}"),
        }
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> FieldValue {
        FieldValue::Unsigned(value.into())
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> FieldValue {
        FieldValue::Unsigned(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> FieldValue {
        FieldValue::Unsigned(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> FieldValue {
        FieldValue::Unsigned(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> FieldValue {
        FieldValue::Signed(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> FieldValue {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> FieldValue {
        FieldValue::Boolean(value)
    }
}

impl From<MacAddr> for FieldValue {
    fn from(addr: MacAddr) -> FieldValue {
        FieldValue::MacAddr(addr)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> FieldValue {
        FieldValue::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> FieldValue {
        FieldValue::String(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(ts: DateTime<Utc>) -> FieldValue {
        FieldValue::Datetime(ts)
    }
}

impl From<Ipv4Addr> for FieldValue {
    fn from(addr: Ipv4Addr) -> FieldValue {
        FieldValue::Ipv4(addr)
    }
}

impl From<Ipv6Addr> for FieldValue {
    fn from(addr: Ipv6Addr) -> FieldValue {
        FieldValue::Ipv6(addr)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(octets: Vec<u8>) -> FieldValue {
        FieldValue::Octets(octets.into())
    }
}

impl From<Bytes> for FieldValue {
    fn from(octets: Bytes) -> FieldValue {
        FieldValue::Octets(octets)
    }
}

// ===== impl MacAddr =====

impl MacAddr {
    pub const LENGTH: usize = 6;

    pub fn as_bytes(&self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> MacAddr {
        MacAddr(octets)
    }
}

impl std::fmt::Display for MacAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5],
        ))
    }
}

// ===== global functions =====

// Writes `octets` as exactly `length` octets, zero-padding or truncating.
fn put_padded(buf: &mut BytesMut, octets: &[u8], length: usize) {
    if octets.len() >= length {
        buf.put_slice(&octets[..length]);
    } else {
        buf.put_slice(octets);
        buf.put_bytes(0, length - octets.len());
    }
}

// Converts a timestamp to NTP format: seconds since 1900-01-01 in the upper
// word, fractional seconds scaled to 2^32 in the lower.
fn datetime_to_ntp(ts: &DateTime<Utc>) -> (u32, u32) {
    let secs = (ts.timestamp() + NTP_EPOCH_OFFSET) as u32;
    let nanos = ts.timestamp_subsec_nanos() as u64;
    let frac = ((nanos << 32) + 500_000_000) / 1_000_000_000;
    (secs, frac as u32)
}

// Inverse of `datetime_to_ntp`. Sub-microsecond precision is truncated;
// microsecond granularity suffices for the NTP-format wire types.
fn datetime_from_ntp(secs: u32, frac: u32) -> DecodeResult<DateTime<Utc>> {
    let unix_secs = secs as i64 - NTP_EPOCH_OFFSET;
    let nanos = ((frac as u64 * 1_000_000_000) + (1 << 31)) >> 32;
    let micros = (nanos / 1000) as u32;
    DateTime::from_timestamp(unix_secs, micros * 1000)
        .ok_or(DecodeError::InvalidTimestamp)
}

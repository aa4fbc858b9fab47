//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::TryGetError;
use serde::{Deserialize, Serialize};

use crate::types::DataType;

// Type aliases.
pub type DecodeResult<T> = Result<T, DecodeError>;
pub type EncodeResult<T> = Result<T, EncodeError>;
pub type SpecResult<T> = Result<T, SpecError>;

// IPFIX message decoding errors.
//
// All variants are terminal for the buffer being decoded: the caller should
// discard the message and advance to the next one.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum DecodeError {
    ReadOutOfBounds,
    InvalidVersion(u16),
    IncompleteMessage,
    InvalidMessageLength(u16),
    InvalidSetLength(u16),
    InvalidTemplateId(u16),
    InvalidScopeCount { field_count: u16, scope_count: u16 },
    InvalidFieldLength(u16),
    InvalidBoolean(u8),
    InvalidString,
    InvalidTimestamp,
    MissingElement(String),
    Io(String),
}

// IPFIX message encoding errors.
//
// `EndOfMessage` is recoverable: the buffer is rolled back to its
// pre-operation state so the caller can finalize the current message and
// retry in the next one. The remaining variants are caller errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum EncodeError {
    EndOfMessage,
    InvalidState,
    TemplateNotFound(u16),
    InvalidTemplateId(u16),
    InvalidSetId(u16),
    MissingField(String),
    ValueTypeMismatch { name: String, data_type: DataType },
    Io(String),
}

// Information Element specification errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum SpecError {
    Parse(String),
    UnknownElement(String),
    UnknownDataType(String),
    InvalidElementNumber(u16),
    IncompatibleLength { name: String, data_type: DataType, length: u16 },
    InvalidTemplateId(u16),
    InvalidScopeCount(u16),
    Io(String),
}

// ===== impl DecodeError =====

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::ReadOutOfBounds => {
                write!(f, "attempt to read out of bounds")
            }
            DecodeError::InvalidVersion(version) => {
                write!(f, "Invalid IPFIX version: {version}")
            }
            DecodeError::IncompleteMessage => {
                write!(f, "Incomplete message")
            }
            DecodeError::InvalidMessageLength(len) => {
                write!(f, "Invalid message length: {len}")
            }
            DecodeError::InvalidSetLength(len) => {
                write!(f, "Invalid set length: {len}")
            }
            DecodeError::InvalidTemplateId(tid) => {
                write!(f, "Invalid template ID: {tid}")
            }
            DecodeError::InvalidScopeCount {
                field_count,
                scope_count,
            } => {
                write!(
                    f,
                    "Invalid scope count: {scope_count} (field count: {field_count})"
                )
            }
            DecodeError::InvalidFieldLength(len) => {
                write!(f, "Invalid field length: {len}")
            }
            DecodeError::InvalidBoolean(value) => {
                write!(f, "Invalid boolean octet: {value}")
            }
            DecodeError::InvalidString => {
                write!(f, "Invalid UTF-8 string")
            }
            DecodeError::InvalidTimestamp => {
                write!(f, "Timestamp out of range")
            }
            DecodeError::MissingElement(name) => {
                write!(f, "Template does not contain {name}")
            }
            DecodeError::Io(error) => {
                write!(f, "I/O error: {error}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<TryGetError> for DecodeError {
    fn from(_error: TryGetError) -> DecodeError {
        DecodeError::ReadOutOfBounds
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(error: std::io::Error) -> DecodeError {
        DecodeError::Io(error.to_string())
    }
}

// ===== impl EncodeError =====

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::EndOfMessage => {
                write!(f, "Message MTU exhausted")
            }
            EncodeError::InvalidState => {
                write!(f, "Operation invalid in the current export state")
            }
            EncodeError::TemplateNotFound(tid) => {
                write!(f, "Unknown template ID: {tid}")
            }
            EncodeError::InvalidTemplateId(tid) => {
                write!(f, "Invalid template ID: {tid}")
            }
            EncodeError::InvalidSetId(setid) => {
                write!(f, "Invalid set ID: {setid}")
            }
            EncodeError::MissingField(name) => {
                write!(f, "Record is missing a value for {name}")
            }
            EncodeError::ValueTypeMismatch { name, data_type } => {
                write!(f, "Value for {name} is not a {data_type}")
            }
            EncodeError::Io(error) => {
                write!(f, "I/O error: {error}")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<std::io::Error> for EncodeError {
    fn from(error: std::io::Error) -> EncodeError {
        EncodeError::Io(error.to_string())
    }
}

// ===== impl SpecError =====

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecError::Parse(spec) => {
                write!(f, "Malformed IESpec: {spec}")
            }
            SpecError::UnknownElement(spec) => {
                write!(f, "No such Information Element: {spec}")
            }
            SpecError::UnknownDataType(name) => {
                write!(f, "Unknown data type: {name}")
            }
            SpecError::InvalidElementNumber(num) => {
                write!(f, "Invalid element number: {num}")
            }
            SpecError::IncompatibleLength {
                name,
                data_type,
                length,
            } => {
                write!(f, "Invalid length {length} for {name}<{data_type}>")
            }
            SpecError::InvalidTemplateId(tid) => {
                write!(f, "Invalid template ID: {tid}")
            }
            SpecError::InvalidScopeCount(count) => {
                write!(f, "Invalid scope count: {count}")
            }
            SpecError::Io(error) => {
                write!(f, "I/O error: {error}")
            }
        }
    }
}

impl std::error::Error for SpecError {}

impl From<std::io::Error> for SpecError {
    fn from(error: std::io::Error) -> SpecError {
        SpecError::Io(error.to_string())
    }
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::VARLEN;
use crate::error::{SpecError, SpecResult};
use crate::types::DataType;

// An IPFIX Information Element: a named, numbered, typed field that may
// appear in records.
//
// Instances are immutable once registered and are shared as
// `Arc<InformationElement>` between the registry, templates, and decoded
// records. Identity is the (pen, num) pair; reduced-length variants of the
// same element compare equal.
#[derive(Clone, Debug)]
#[derive(Deserialize, Serialize)]
pub struct InformationElement {
    pub name: String,
    pub pen: u32,
    pub num: u16,
    pub data_type: DataType,
    pub length: u16,
}

// Ordered sequence of Information Elements.
//
// Hashable so it can key cached packing plans; also used as a
// caller-supplied projection order for the tuple interfaces.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct InformationElementList(Vec<Arc<InformationElement>>);

// A parsed IESpec of the form `name(pen/num)<type>[size]`, any combination
// of fields present.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IeSpec {
    pub name: Option<String>,
    pub pen: u32,
    pub num: Option<u16>,
    pub data_type: Option<DataType>,
    pub length: Option<u16>,
}

// ===== impl InformationElement =====

impl InformationElement {
    // Element numbers are 15-bit; the high bit is the enterprise flag on
    // the wire.
    pub const MAX_NUM: u16 = 0x7fff;

    pub fn new(
        name: impl Into<String>,
        pen: u32,
        num: u16,
        data_type: DataType,
        length: u16,
    ) -> SpecResult<InformationElement> {
        let name = name.into();
        if num == 0 || num > Self::MAX_NUM {
            return Err(SpecError::InvalidElementNumber(num));
        }
        if length != VARLEN && !data_type.length_valid(length) {
            return Err(SpecError::IncompatibleLength {
                name,
                data_type,
                length,
            });
        }
        Ok(InformationElement {
            name,
            pen,
            num,
            data_type,
            length,
        })
    }

    /// Whether this element is variable-length on the wire.
    pub fn is_varlen(&self) -> bool {
        self.length == VARLEN
    }

    /// Returns this element with a different length (reduced-length
    /// encoding). The registry entry itself is never mutated.
    pub fn for_length(
        &self,
        length: u16,
    ) -> SpecResult<Arc<InformationElement>> {
        if length != VARLEN && !self.data_type.length_valid(length) {
            return Err(SpecError::IncompatibleLength {
                name: self.name.clone(),
                data_type: self.data_type,
                length,
            });
        }
        Ok(Arc::new(InformationElement {
            length,
            ..self.clone()
        }))
    }
}

impl PartialEq for InformationElement {
    fn eq(&self, other: &InformationElement) -> bool {
        self.pen == other.pen && self.num == other.num
    }
}

impl Eq for InformationElement {}

impl Hash for InformationElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pen.hash(state);
        self.num.hash(state);
    }
}

impl std::fmt::Display for InformationElement {
    // Canonical IESpec form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.pen != 0 {
            write!(f, "({}/{})", self.pen, self.num)?;
        } else {
            write!(f, "({})", self.num)?;
        }
        write!(f, "<{}>[{}]", self.data_type, self.length)
    }
}

// ===== impl InformationElementList =====

impl InformationElementList {
    pub fn new() -> InformationElementList {
        InformationElementList(Vec::new())
    }

    /// Position of the given element in the list, by element identity.
    pub fn index_of(&self, ie: &InformationElement) -> Option<usize> {
        self.0.iter().position(|other| **other == *ie)
    }

    pub fn contains(&self, ie: &InformationElement) -> bool {
        self.index_of(ie).is_some()
    }
}

impl std::ops::Deref for InformationElementList {
    type Target = [Arc<InformationElement>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Arc<InformationElement>>> for InformationElementList {
    fn from(ies: Vec<Arc<InformationElement>>) -> InformationElementList {
        InformationElementList(ies)
    }
}

impl FromIterator<Arc<InformationElement>> for InformationElementList {
    fn from_iter<I>(iter: I) -> InformationElementList
    where
        I: IntoIterator<Item = Arc<InformationElement>>,
    {
        InformationElementList(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a InformationElementList {
    type Item = &'a Arc<InformationElement>;
    type IntoIter = std::slice::Iter<'a, Arc<InformationElement>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ===== impl IeSpec =====

impl IeSpec {
    /// Whether the spec carries everything needed to register a new
    /// element, as opposed to looking up an existing one.
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.num.is_some() && self.data_type.is_some()
    }
}

impl FromStr for IeSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> SpecResult<IeSpec> {
        let err = || SpecError::Parse(s.to_owned());
        let mut rem = s.trim();

        // Leading identifier.
        let end = rem
            .find(['(', '<', '['])
            .unwrap_or(rem.len());
        let name = match &rem[..end] {
            "" => None,
            name => {
                if !name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(err());
                }
                Some(name.to_owned())
            }
        };
        rem = &rem[end..];

        // Optional (pen/num) section.
        let mut pen = 0;
        let mut num = None;
        if let Some(inner) = rem.strip_prefix('(') {
            let end = inner.find(')').ok_or_else(err)?;
            let numbers = &inner[..end];
            let numbers = match numbers.split_once('/') {
                Some((pen_str, num_str)) => {
                    pen = pen_str.parse().map_err(|_| err())?;
                    num_str
                }
                None => numbers,
            };
            let value: u16 = numbers.parse().map_err(|_| err())?;
            if value == 0 || value > InformationElement::MAX_NUM {
                return Err(SpecError::InvalidElementNumber(value));
            }
            num = Some(value);
            rem = &inner[end + 1..];
        }

        // Optional <type> section.
        let mut data_type = None;
        if let Some(inner) = rem.strip_prefix('<') {
            let end = inner.find('>').ok_or_else(err)?;
            data_type = Some(inner[..end].parse()?);
            rem = &inner[end + 1..];
        }

        // Optional [size] section.
        let mut length = None;
        if let Some(inner) = rem.strip_prefix('[') {
            let end = inner.find(']').ok_or_else(err)?;
            let size = &inner[..end];
            length = Some(match size {
                "v" | "varlen" => VARLEN,
                _ => size.parse().map_err(|_| err())?,
            });
            rem = &inner[end + 1..];
        }

        if !rem.is_empty()
            || (name.is_none() && num.is_none())
        {
            return Err(err());
        }

        Ok(IeSpec {
            name,
            pen,
            num,
            data_type,
            length,
        })
    }
}

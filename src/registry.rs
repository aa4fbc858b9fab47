//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock as Lazy, RwLock};

use tracing::debug;

use crate::consts::REVERSE_PEN;
use crate::error::{SpecError, SpecResult};
use crate::iana::{IANA_IESPECS, NON_REVERSIBLE_NUMS};
use crate::ie::{IeSpec, InformationElement, InformationElementList};
use crate::types::DataType;

// Process-wide information model.
//
// Bulk loads complete before concurrent readers begin; afterwards lookups
// are pure reads. Decoding unknown template entries is the only writer in
// steady state.
static INFO_MODEL: Lazy<RwLock<InfoModel>> =
    Lazy::new(|| RwLock::new(InfoModel::default()));

#[derive(Debug, Default)]
struct InfoModel {
    by_id: HashMap<(u32, u16), Arc<InformationElement>>,
    by_name: HashMap<String, Arc<InformationElement>>,
}

// ===== impl InfoModel =====

impl InfoModel {
    // Registers an element. Loading is idempotent: an existing entry wins,
    // except that a named element replaces a placeholder synthesized from
    // an earlier unknown template entry.
    fn insert(
        &mut self,
        ie: InformationElement,
    ) -> Arc<InformationElement> {
        if let Some(existing) = self.by_id.get(&(ie.pen, ie.num))
            && !(is_placeholder(existing) && !is_placeholder(&ie))
        {
            return existing.clone();
        }
        let ie = Arc::new(ie);
        self.by_id.insert((ie.pen, ie.num), ie.clone());
        self.by_name.insert(ie.name.clone(), ie.clone());
        ie
    }
}

// ===== global functions =====

/// Resolves an IESpec of the form `name(pen/num)<type>[size]`.
///
/// A complete spec (name, number, and type) registers the element if it is
/// not already known. A partial spec looks up an existing element, applying
/// a `[size]` suffix as a reduced-length adjustment.
pub fn for_spec(spec: &str) -> SpecResult<Arc<InformationElement>> {
    let parsed: IeSpec = spec.parse()?;

    if parsed.is_complete() {
        let data_type = parsed.data_type.unwrap();
        let ie = InformationElement::new(
            parsed.name.unwrap(),
            parsed.pen,
            parsed.num.unwrap(),
            data_type,
            parsed.length.unwrap_or_else(|| data_type.natural_len()),
        )?;
        let mut model = INFO_MODEL.write().unwrap();
        return Ok(model.insert(ie));
    }

    let ie = {
        let model = INFO_MODEL.read().unwrap();
        match (&parsed.name, parsed.num) {
            (_, Some(num)) => model.by_id.get(&(parsed.pen, num)).cloned(),
            (Some(name), None) => model.by_name.get(name).cloned(),
            (None, None) => unreachable!(),
        }
    }
    .ok_or_else(|| SpecError::UnknownElement(spec.to_owned()))?;

    match parsed.length {
        Some(length) => ie.for_length(length),
        None => Ok(ie),
    }
}

/// Resolves a template field specifier during template decoding.
///
/// Known elements are returned as-is, or as a length-adjusted variant when
/// the template uses reduced-length encoding. Unknown elements are
/// synthesized as octetArray placeholders and registered so the element
/// identity stays stable for the rest of the process lifetime.
pub fn for_template_entry(
    pen: u32,
    num: u16,
    length: u16,
) -> Arc<InformationElement> {
    {
        let model = INFO_MODEL.read().unwrap();
        if let Some(ie) = model.by_id.get(&(pen, num)) {
            if ie.length == length {
                return ie.clone();
            }
            if let Ok(adjusted) = ie.for_length(length) {
                return adjusted;
            }
            // Length incompatible with the modeled type: decode the field
            // as opaque octets under the modeled name.
            return Arc::new(InformationElement {
                name: ie.name.clone(),
                pen,
                num,
                data_type: DataType::OctetArray,
                length,
            });
        }
    }

    let ie = InformationElement {
        name: format!("_ipfix_{pen}_{num}"),
        pen,
        num,
        data_type: DataType::OctetArray,
        length,
    };
    debug!(name = %ie.name, length, "synthesized placeholder element");
    let mut model = INFO_MODEL.write().unwrap();
    model.insert(ie)
}

/// Loads the bundled IANA registry subset.
pub fn use_iana_default() -> SpecResult<()> {
    let mut model = INFO_MODEL.write().unwrap();
    for spec in IANA_IESPECS {
        let parsed: IeSpec = spec.parse()?;
        model.insert(ie_from_complete(parsed)?);
    }
    debug!(count = IANA_IESPECS.len(), "loaded IANA information model");
    Ok(())
}

/// Loads the bundled IANA registry subset plus the RFC 5103 reverse
/// elements (PEN 29305, `reverse`-prefixed names).
pub fn use_5103_default() -> SpecResult<()> {
    use_iana_default()?;

    let mut model = INFO_MODEL.write().unwrap();
    let mut count = 0;
    for spec in IANA_IESPECS {
        let parsed: IeSpec = spec.parse()?;
        let num = parsed.num.unwrap();
        if NON_REVERSIBLE_NUMS.contains(&num) {
            continue;
        }
        let mut ie = ie_from_complete(parsed)?;
        ie.name = reverse_name(&ie.name);
        ie.pen = REVERSE_PEN;
        model.insert(ie);
        count += 1;
    }
    debug!(count, "loaded RFC 5103 reverse information elements");
    Ok(())
}

/// Loads an IESpec file: one spec per line, `#` comments and blank lines
/// ignored.
pub fn use_specfile(path: impl AsRef<Path>) -> SpecResult<()> {
    let data = std::fs::read_to_string(path)?;
    let mut count = 0;
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for_spec(line)?;
        count += 1;
    }
    debug!(count, "loaded information model spec file");
    Ok(())
}

/// Empties the information model.
pub fn clear_infomodel() {
    let mut model = INFO_MODEL.write().unwrap();
    model.by_id.clear();
    model.by_name.clear();
}

/// Parses a list of IESpecs into an element list usable as a template
/// definition or a tuple projection.
pub fn spec_list<I, S>(specs: I) -> SpecResult<InformationElementList>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    specs
        .into_iter()
        .map(|spec| for_spec(spec.as_ref()))
        .collect()
}

// ===== helper functions =====

fn is_placeholder(ie: &InformationElement) -> bool {
    ie.name.starts_with("_ipfix_")
}

// Builds an element from a spec known to be complete (bundled data).
fn ie_from_complete(spec: IeSpec) -> SpecResult<InformationElement> {
    let data_type = spec.data_type.unwrap();
    InformationElement::new(
        spec.name.unwrap(),
        spec.pen,
        spec.num.unwrap(),
        data_type,
        spec.length.unwrap_or_else(|| data_type.natural_len()),
    )
}

// RFC 5103 section 6.1 name rewriting.
fn reverse_name(name: &str) -> String {
    let mut reversed = String::with_capacity(name.len() + 7);
    reversed.push_str("reverse");
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        reversed.extend(first.to_uppercase());
        reversed.push_str(chars.as_str());
    }
    reversed
}

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::bytes::{BytesExt, BytesMutExt};
use crate::consts::{
    ENTERPRISE_BIT, MIN_TEMPLATE_ID, OPTIONS_SET_ID, TEMPLATE_SET_ID,
};
use crate::error::{
    DecodeError, DecodeResult, EncodeError, EncodeResult, SpecError,
    SpecResult,
};
use crate::ie::{InformationElement, InformationElementList};
use crate::registry;
use crate::types::FieldValue;

//
// IPFIX Template Record.
//
// Encoding format:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |      Template ID (> 255)      |         Field Count           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |  Field Specifiers ...
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-
//
// An Options Template Record carries an additional Scope Field Count after
// the Field Count. Each Field Specifier is:
//
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |E|  Information Element ident. |        Field Length           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                      Enterprise Number                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// where the Enterprise Number is present iff the E bit is set.
//
#[derive(Debug)]
#[derive(Deserialize, Serialize)]
pub struct Template {
    tid: u16,
    scope_count: u16,
    ies: InformationElementList,
    // Leading run of fixed-length elements and its width.
    fixlen_count: usize,
    fixlen_octets: usize,
    // Minimum wire size of one record: fixed octets plus one prefix octet
    // per variable-length element.
    min_len: usize,
    varlen: bool,
    #[serde(skip)]
    plans: Mutex<PlanCache>,
}

type PlanCache =
    HashMap<InformationElementList, Arc<TemplatePackingPlan>>;

// One record of a Template Set or Options Template Set.
#[derive(Debug, PartialEq)]
pub enum TemplateRecord {
    Defined(Template),
    // Field Count zero: the template is being withdrawn.
    Withdrawn(u16),
}

// A compiled projection of a template.
//
// Walking the template once, contiguous runs of fixed-length elements that
// are all projected become a single group decoded back-to-back after one
// bounds check; runs that are all excluded collapse into a single skip of
// their summed width. Variable-length elements are singleton steps whose
// offsets are resolved dynamically during record traversal.
#[derive(Debug)]
pub struct TemplatePackingPlan {
    steps: Vec<PlanStep>,
    // Whether any projected element is variable-length, disabling the
    // fully contiguous fast path.
    pub varlen: bool,
    // Number of values a decoded record yields (projection length).
    value_count: usize,
    // Whether every projection entry is present in the template.
    complete: bool,
    // First template element absent from the projection, if any.
    missing: Option<String>,
}

#[derive(Debug)]
enum PlanStep {
    // Contiguous fixed-length run, all projected.
    Group { fields: Vec<PlanField>, octets: usize },
    // Contiguous fixed-length run, none projected.
    Skip { octets: usize },
    Varlen { ie_idx: usize, value_idx: Option<usize> },
}

#[derive(Debug)]
struct PlanField {
    ie_idx: usize,
    value_idx: usize,
    length: u16,
}

// ===== impl TemplatePackingPlan =====

impl TemplatePackingPlan {
    /// Whether every projection entry was found in the template. Plans
    /// that are not complete cannot decode records.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of values a record decoded through this plan yields.
    pub fn value_count(&self) -> usize {
        self.value_count
    }
}

// ===== impl Template =====

impl Template {
    /// Finalizes a data template. IDs 256..=65535 identify data sets; 0 is
    /// accepted as the unassigned sentinel for placeholder instances.
    pub fn from_ielist(
        tid: u16,
        ies: InformationElementList,
    ) -> SpecResult<Template> {
        if tid != 0 && tid < MIN_TEMPLATE_ID {
            return Err(SpecError::InvalidTemplateId(tid));
        }
        Ok(Template::finalize(tid, 0, ies))
    }

    /// Finalizes an options template: the leading `scope_count` elements
    /// are scope fields.
    pub fn options_from_ielist(
        tid: u16,
        scope_count: u16,
        ies: InformationElementList,
    ) -> SpecResult<Template> {
        if tid != 0 && tid < MIN_TEMPLATE_ID {
            return Err(SpecError::InvalidTemplateId(tid));
        }
        if scope_count == 0 || scope_count as usize > ies.len() {
            return Err(SpecError::InvalidScopeCount(scope_count));
        }
        Ok(Template::finalize(tid, scope_count, ies))
    }

    fn finalize(
        tid: u16,
        scope_count: u16,
        ies: InformationElementList,
    ) -> Template {
        let fixlen_count = ies
            .iter()
            .take_while(|ie| !ie.is_varlen())
            .count();
        let fixlen_octets = ies[..fixlen_count]
            .iter()
            .map(|ie| ie.length as usize)
            .sum();
        let min_len = ies
            .iter()
            .map(|ie| if ie.is_varlen() { 1 } else { ie.length as usize })
            .sum();
        let varlen = fixlen_count != ies.len();

        Template {
            tid,
            scope_count,
            ies,
            fixlen_count,
            fixlen_octets,
            min_len,
            varlen,
            plans: Mutex::new(HashMap::new()),
        }
    }

    pub fn tid(&self) -> u16 {
        self.tid
    }

    pub fn scope_count(&self) -> u16 {
        self.scope_count
    }

    pub fn is_options(&self) -> bool {
        self.scope_count > 0
    }

    pub fn ies(&self) -> &InformationElementList {
        &self.ies
    }

    /// Count of leading fixed-length elements.
    pub fn fixlen_count(&self) -> usize {
        self.fixlen_count
    }

    /// Wire size of the leading fixed-length run.
    pub fn fixlen_octets(&self) -> usize {
        self.fixlen_octets
    }

    /// Whether any element is variable-length, making record sizes
    /// dynamic.
    pub fn has_varlen(&self) -> bool {
        self.varlen
    }

    pub(crate) fn min_record_len(&self) -> usize {
        self.min_len
    }

    /// Whether every element of the projection appears in this template.
    pub fn covers(&self, ielist: &InformationElementList) -> bool {
        self.packplan_for_ielist(ielist).complete
    }

    /// Returns the cached packing plan mapping this template onto the
    /// given projection, compiling it on first use. Templates are
    /// immutable once finalized, so plans never invalidate.
    pub fn packplan_for_ielist(
        &self,
        ielist: &InformationElementList,
    ) -> Arc<TemplatePackingPlan> {
        let mut plans = self.plans.lock().unwrap();
        if let Some(plan) = plans.get(ielist) {
            return plan.clone();
        }
        let plan = Arc::new(self.build_plan(ielist));
        plans.insert(ielist.clone(), plan.clone());
        plan
    }

    fn identity_plan(&self) -> Arc<TemplatePackingPlan> {
        self.packplan_for_ielist(&self.ies)
    }

    fn build_plan(
        &self,
        projection: &InformationElementList,
    ) -> TemplatePackingPlan {
        let mut steps = Vec::new();
        let mut fields = Vec::new();
        let mut group_octets = 0;
        let mut skip_octets = 0;
        let mut varlen = false;
        let mut assigned = vec![false; projection.len()];
        let mut missing = None;

        for (ie_idx, ie) in self.ies.iter().enumerate() {
            let value_idx = projection
                .index_of(ie)
                .filter(|idx| !assigned[*idx]);
            match value_idx {
                Some(idx) => assigned[idx] = true,
                None => {
                    if missing.is_none() {
                        missing = Some(ie.name.clone());
                    }
                }
            }

            if ie.is_varlen() {
                flush_group(&mut steps, &mut fields, &mut group_octets);
                flush_skip(&mut steps, &mut skip_octets);
                varlen |= value_idx.is_some();
                steps.push(PlanStep::Varlen { ie_idx, value_idx });
            } else if let Some(value_idx) = value_idx {
                flush_skip(&mut steps, &mut skip_octets);
                fields.push(PlanField {
                    ie_idx,
                    value_idx,
                    length: ie.length,
                });
                group_octets += ie.length as usize;
            } else {
                flush_group(&mut steps, &mut fields, &mut group_octets);
                skip_octets += ie.length as usize;
            }
        }
        flush_group(&mut steps, &mut fields, &mut group_octets);
        flush_skip(&mut steps, &mut skip_octets);

        TemplatePackingPlan {
            steps,
            varlen,
            value_count: projection.len(),
            complete: assigned.iter().all(|assigned| *assigned),
            missing,
        }
    }

    /// Writes one record. `values` parallels the plan's projection, or the
    /// full template when no plan is given.
    pub fn encode_record(
        &self,
        buf: &mut BytesMut,
        values: &[FieldValue],
        plan: Option<&TemplatePackingPlan>,
    ) -> EncodeResult<()> {
        let identity;
        let plan = match plan {
            Some(plan) => plan,
            None => {
                identity = self.identity_plan();
                &identity
            }
        };

        // Every template element needs a value.
        if let Some(name) = &plan.missing {
            return Err(EncodeError::MissingField(name.clone()));
        }

        for step in &plan.steps {
            match step {
                PlanStep::Group { fields, .. } => {
                    for field in fields {
                        let ie = &self.ies[field.ie_idx];
                        let value = values
                            .get(field.value_idx)
                            .ok_or_else(|| {
                                EncodeError::MissingField(ie.name.clone())
                            })?;
                        ie.data_type
                            .encode(value, buf, field.length)
                            .map_err(|error| named_error(error, ie))?;
                    }
                }
                PlanStep::Skip { .. } => unreachable!(),
                PlanStep::Varlen { ie_idx, value_idx } => {
                    let ie = &self.ies[*ie_idx];
                    let value = value_idx
                        .and_then(|idx| values.get(idx))
                        .ok_or_else(|| {
                            EncodeError::MissingField(ie.name.clone())
                        })?;
                    let size = value.varlen_size().ok_or_else(|| {
                        EncodeError::ValueTypeMismatch {
                            name: ie.name.clone(),
                            data_type: ie.data_type,
                        }
                    })?;
                    buf.put_varlen(size);
                    ie.data_type
                        .encode(value, buf, size as u16)
                        .map_err(|error| named_error(error, ie))?;
                }
            }
        }

        Ok(())
    }

    /// Reads one record, yielding values in projection order. The plan
    /// must be complete (see `covers`); the full template is used when no
    /// plan is given.
    pub fn decode_record(
        &self,
        buf: &mut Bytes,
        plan: Option<&TemplatePackingPlan>,
    ) -> DecodeResult<Vec<FieldValue>> {
        let identity;
        let plan = match plan {
            Some(plan) => plan,
            None => {
                identity = self.identity_plan();
                &identity
            }
        };
        debug_assert!(plan.complete);

        let mut values: Vec<Option<FieldValue>> =
            vec![None; plan.value_count];
        for step in &plan.steps {
            match step {
                PlanStep::Group { fields, octets } => {
                    if buf.remaining() < *octets {
                        return Err(DecodeError::ReadOutOfBounds);
                    }
                    for field in fields {
                        let ie = &self.ies[field.ie_idx];
                        values[field.value_idx] =
                            Some(ie.data_type.decode(buf, field.length)?);
                    }
                }
                PlanStep::Skip { octets } => {
                    if buf.remaining() < *octets {
                        return Err(DecodeError::ReadOutOfBounds);
                    }
                    buf.advance(*octets);
                }
                PlanStep::Varlen { ie_idx, value_idx } => {
                    let size = buf.try_get_varlen()?;
                    if buf.remaining() < size {
                        return Err(DecodeError::ReadOutOfBounds);
                    }
                    match value_idx {
                        Some(idx) => {
                            let ie = &self.ies[*ie_idx];
                            values[*idx] = Some(
                                ie.data_type.decode(buf, size as u16)?,
                            );
                        }
                        None => buf.advance(size),
                    }
                }
            }
        }

        // A complete plan assigns every projection position.
        Ok(values.into_iter().map(|value| value.unwrap()).collect())
    }

    /// Encodes a record from a name-to-value mapping. Extra keys are
    /// ignored; absent template elements fail.
    pub fn encode_namedict_to(
        &self,
        buf: &mut BytesMut,
        rec: &HashMap<String, FieldValue>,
    ) -> EncodeResult<()> {
        let values = self
            .ies
            .iter()
            .map(|ie| {
                rec.get(&ie.name)
                    .cloned()
                    .ok_or_else(|| EncodeError::MissingField(ie.name.clone()))
            })
            .collect::<EncodeResult<Vec<_>>>()?;
        self.encode_record(buf, &values, None)
    }

    /// Encodes a record from a value sequence. With `ielist`, `rec[i]`
    /// corresponds to `ielist[i]` and surplus projection entries are
    /// ignored; without it, `rec` parallels the template.
    pub fn encode_tuple_to(
        &self,
        buf: &mut BytesMut,
        rec: &[FieldValue],
        ielist: Option<&InformationElementList>,
    ) -> EncodeResult<()> {
        match ielist {
            Some(ielist) => {
                let plan = self.packplan_for_ielist(ielist);
                self.encode_record(buf, rec, Some(&plan))
            }
            None => self.encode_record(buf, rec, None),
        }
    }

    /// Decodes a record into a name-to-value mapping.
    pub fn decode_namedict_from(
        &self,
        buf: &mut Bytes,
    ) -> DecodeResult<HashMap<String, FieldValue>> {
        let values = self.decode_record(buf, None)?;
        Ok(self
            .ies
            .iter()
            .zip(values)
            .map(|(ie, value)| (ie.name.clone(), value))
            .collect())
    }

    /// Decodes a record into an element-handle-to-value mapping.
    pub fn decode_iedict_from(
        &self,
        buf: &mut Bytes,
    ) -> DecodeResult<HashMap<Arc<InformationElement>, FieldValue>> {
        let values = self.decode_record(buf, None)?;
        Ok(self
            .ies
            .iter()
            .cloned()
            .zip(values)
            .collect())
    }

    /// Decodes a record projected onto `ielist`, in `ielist` order.
    pub fn decode_tuple_from(
        &self,
        buf: &mut Bytes,
        ielist: &InformationElementList,
    ) -> DecodeResult<Vec<FieldValue>> {
        let plan = self.packplan_for_ielist(ielist);
        if !plan.complete {
            let name = ielist
                .iter()
                .find(|ie| !self.ies.contains(ie))
                .map(|ie| ie.name.clone())
                .unwrap_or_default();
            return Err(DecodeError::MissingElement(name));
        }
        self.decode_record(buf, Some(&plan))
    }

    /// Serializes the template record for a Template Set (`setid` 2) or an
    /// Options Template Set (`setid` 3).
    pub fn encode_template_to(
        &self,
        buf: &mut BytesMut,
        setid: u16,
    ) -> EncodeResult<()> {
        if !matches!(setid, TEMPLATE_SET_ID | OPTIONS_SET_ID) {
            return Err(EncodeError::InvalidSetId(setid));
        }
        buf.put_u16(self.tid);
        buf.put_u16(self.ies.len() as u16);
        if setid == OPTIONS_SET_ID {
            buf.put_u16(self.scope_count);
        }

        for ie in &self.ies {
            if ie.pen != 0 {
                buf.put_u16(ie.num | ENTERPRISE_BIT);
                buf.put_u16(ie.length);
                buf.put_u32(ie.pen);
            } else {
                buf.put_u16(ie.num);
                buf.put_u16(ie.length);
            }
        }

        Ok(())
    }

    /// Parses one record of a template set, resolving field specifiers
    /// through the information model. A record with Field Count zero is a
    /// withdrawal.
    pub fn decode_template_record(
        buf: &mut Bytes,
        setid: u16,
    ) -> DecodeResult<TemplateRecord> {
        let tid = buf.try_get_u16()?;
        let field_count = buf.try_get_u16()?;
        if tid < MIN_TEMPLATE_ID {
            return Err(DecodeError::InvalidTemplateId(tid));
        }
        if field_count == 0 {
            return Ok(TemplateRecord::Withdrawn(tid));
        }

        let scope_count = if setid == OPTIONS_SET_ID {
            let scope_count = buf.try_get_u16()?;
            if scope_count == 0 || scope_count > field_count {
                return Err(DecodeError::InvalidScopeCount {
                    field_count,
                    scope_count,
                });
            }
            scope_count
        } else {
            0
        };

        let mut ies = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            let id = buf.try_get_u16()?;
            let length = buf.try_get_u16()?;
            let pen = if id & ENTERPRISE_BIT != 0 {
                buf.try_get_u32()?
            } else {
                0
            };
            ies.push(registry::for_template_entry(
                pen,
                id & !ENTERPRISE_BIT,
                length,
            ));
        }

        let template =
            Template::finalize(tid, scope_count, ies.into_iter().collect());
        Ok(TemplateRecord::Defined(template))
    }
}

impl Clone for Template {
    fn clone(&self) -> Template {
        Template::finalize(self.tid, self.scope_count, self.ies.clone())
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Template) -> bool {
        self.tid == other.tid
            && self.scope_count == other.scope_count
            && self.ies.len() == other.ies.len()
            && self
                .ies
                .iter()
                .zip(other.ies.iter())
                .all(|(a, b)| {
                    a.pen == b.pen && a.num == b.num && a.length == b.length
                })
    }
}

// ===== helper functions =====

fn flush_group(
    steps: &mut Vec<PlanStep>,
    fields: &mut Vec<PlanField>,
    octets: &mut usize,
) {
    if !fields.is_empty() {
        steps.push(PlanStep::Group {
            fields: std::mem::take(fields),
            octets: std::mem::take(octets),
        });
    }
}

fn flush_skip(steps: &mut Vec<PlanStep>, octets: &mut usize) {
    if *octets > 0 {
        steps.push(PlanStep::Skip {
            octets: std::mem::take(octets),
        });
    }
}

// Fills in the element name on value errors raised by the type layer.
fn named_error(error: EncodeError, ie: &InformationElement) -> EncodeError {
    match error {
        EncodeError::ValueTypeMismatch { data_type, .. } => {
            EncodeError::ValueTypeMismatch {
                name: ie.name.clone(),
                data_type,
            }
        }
        error => error,
    }
}

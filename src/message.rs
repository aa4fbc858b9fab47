//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use chrono::{DateTime, Utc};
use derive_new::new;
use tracing::debug;

use crate::consts::{
    DEFAULT_MTU, IPFIX_VERSION, MIN_TEMPLATE_ID, MSG_HDR_SIZE,
    OPTIONS_SET_ID, SET_HDR_SIZE, TEMPLATE_SET_ID,
};
use crate::error::{
    DecodeError, DecodeResult, EncodeError, EncodeResult,
};
use crate::ie::{InformationElement, InformationElementList};
use crate::template::{Template, TemplatePackingPlan, TemplateRecord};
use crate::types::FieldValue;

//
// IPFIX Message.
//
// Encoding format (message header):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |       Version Number = 10     |            Length             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                          Export Time                          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        Sequence Number                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Observation Domain ID                      |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                             Sets ...
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-
//
// Each set is a four-octet header (Set ID, Set Length, length inclusive of
// the header) followed by template, options-template, or data records.
//
// The buffer is a mutable octet sequence bounded by the MTU. During export
// it tracks the currently open set; appends that would exceed the MTU are
// rolled back and reported, leaving the buffer valid for finalization.
// During collection it is loaded from one message's bytes, the sets are
// indexed up front, and record iteration decodes them in order, feeding
// template sets into the domain-scoped template table.
//
#[derive(Debug)]
pub struct MessageBuffer {
    mtu: usize,
    odid: u32,
    // Manual export-time override; None stamps messages at finalization.
    export_time: Option<DateTime<Utc>>,
    // Per-domain count of data records in previously exported messages.
    sequences: HashMap<u32, u32>,
    templates: BTreeMap<(u32, u16), Arc<Template>>,
    buf: BytesMut,
    state: State,
    cur_set_off: usize,
    record_count: u32,
    // Header fields of the last finalized or deframed message.
    msg_export_time: DateTime<Utc>,
    msg_sequence: u32,
    // Decode side: the loaded message and its set index.
    rx_msg: Bytes,
    setlist: Vec<SetEntry>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Idle,
    // Message header written, no set open.
    Message,
    // A set with the given ID is open.
    Set(u16),
    Finalized,
    // A received message has been deframed for iteration.
    Deframed,
}

// One entry of the deframed set index: ID plus body position.
#[derive(Clone, Copy, Debug, new)]
struct SetEntry {
    set_id: u16,
    offset: usize,
    length: usize,
}

// Rollback point for MTU-checked append operations.
#[derive(Clone, Copy, Debug)]
struct Checkpoint {
    buf_len: usize,
    state: State,
    cur_set_off: usize,
}

// ===== impl MessageBuffer =====

impl MessageBuffer {
    /// Creates a buffer bounded by `mtu` octets per message. The MTU is
    /// clamped to what the wire format can express and to the smallest
    /// useful message (header plus one set header).
    pub fn new(mtu: usize) -> MessageBuffer {
        MessageBuffer {
            mtu: mtu.clamp(MSG_HDR_SIZE + SET_HDR_SIZE, DEFAULT_MTU),
            odid: 0,
            export_time: None,
            sequences: HashMap::new(),
            templates: BTreeMap::new(),
            buf: BytesMut::with_capacity(DEFAULT_MTU),
            state: State::Idle,
            cur_set_off: 0,
            record_count: 0,
            msg_export_time: DateTime::UNIX_EPOCH,
            msg_sequence: 0,
            rx_msg: Bytes::new(),
            setlist: Vec::new(),
        }
    }

    pub fn mtu(&self) -> usize {
        self.mtu
    }

    /// Current observation domain ID.
    pub fn odid(&self) -> u32 {
        self.odid
    }

    /// Export time of the last finalized or deframed message.
    pub fn export_time(&self) -> DateTime<Utc> {
        self.msg_export_time
    }

    /// Sequence number of the last finalized or deframed message.
    pub fn sequence(&self) -> u32 {
        self.msg_sequence
    }

    /// Overrides the export time stamped into finalized messages; `None`
    /// restores automatic stamping.
    pub fn set_export_time(&mut self, time: Option<DateTime<Utc>>) {
        self.export_time = time;
    }

    /// Template registered for `tid` in the current observation domain.
    pub fn get_template(&self, tid: u16) -> Option<Arc<Template>> {
        self.templates.get(&(self.odid, tid)).cloned()
    }

    /// Template IDs active in the current observation domain.
    pub fn active_template_ids(&self) -> Vec<u16> {
        self.templates
            .range((self.odid, 0)..=(self.odid, u16::MAX))
            .map(|((_, tid), _)| *tid)
            .collect()
    }

    // ===== exporting =====

    /// Starts a new message: clears the buffer and writes a stub header.
    /// The length, export time, and sequence fields are filled in at
    /// finalization.
    pub fn begin_export(&mut self, odid: Option<u32>) {
        if let Some(odid) = odid {
            self.odid = odid;
        }
        self.buf.clear();
        self.buf.put_u16(IPFIX_VERSION);
        self.buf.put_u16(0);
        self.buf.put_u32(0);
        self.buf.put_u32(0);
        self.buf.put_u32(self.odid);
        self.record_count = 0;
        self.state = State::Message;
    }

    /// Registers a template in the current domain and, with `export`,
    /// appends its encoding to the appropriate template set.
    pub fn add_template(
        &mut self,
        template: Template,
        export: bool,
    ) -> EncodeResult<()> {
        if !matches!(self.state, State::Message | State::Set(_)) {
            return Err(EncodeError::InvalidState);
        }
        let tid = template.tid();
        if tid < MIN_TEMPLATE_ID {
            return Err(EncodeError::InvalidTemplateId(tid));
        }

        let setid = if template.is_options() {
            OPTIONS_SET_ID
        } else {
            TEMPLATE_SET_ID
        };
        let template = Arc::new(template);
        self.templates.insert((self.odid, tid), template.clone());
        debug!(odid = self.odid, tid, "registered template");

        if export {
            let cp = self.checkpoint();
            self.export_ensure_set(setid)?;
            template.encode_template_to(&mut self.buf, setid)?;
            self.check_mtu(cp)?;
        }
        Ok(())
    }

    /// Removes a template from the current domain and, with `export`,
    /// appends a Template Withdrawal (a template record with field count
    /// zero). On MTU exhaustion the template stays registered so the
    /// operation can be retried in the next message.
    pub fn delete_template(
        &mut self,
        tid: u16,
        export: bool,
    ) -> EncodeResult<()> {
        if !matches!(self.state, State::Message | State::Set(_)) {
            return Err(EncodeError::InvalidState);
        }
        let Some(template) = self.templates.remove(&(self.odid, tid)) else {
            return Err(EncodeError::TemplateNotFound(tid));
        };
        debug!(odid = self.odid, tid, "withdrew template");

        if export {
            let setid = if template.is_options() {
                OPTIONS_SET_ID
            } else {
                TEMPLATE_SET_ID
            };
            let cp = self.checkpoint();
            let result = self.export_ensure_set(setid).and_then(|_| {
                self.buf.put_u16(tid);
                self.buf.put_u16(0);
                self.check_mtu(cp)
            });
            if let Err(error) = result {
                self.templates.insert((self.odid, tid), template);
                return Err(error);
            }
        }
        Ok(())
    }

    /// Opens a set with the given ID unless it is already the current one.
    /// Data set IDs must name a template known in the current domain.
    pub fn export_ensure_set(&mut self, setid: u16) -> EncodeResult<()> {
        match self.state {
            State::Set(cur) if cur == setid => Ok(()),
            State::Message | State::Set(_) => self.open_set(setid),
            _ => Err(EncodeError::InvalidState),
        }
    }

    /// Closes the current set, if any, and opens a fresh one.
    pub fn export_new_set(&mut self, setid: u16) -> EncodeResult<()> {
        match self.state {
            State::Message | State::Set(_) => self.open_set(setid),
            _ => Err(EncodeError::InvalidState),
        }
    }

    /// Encodes one data record from a name-to-value mapping into the
    /// currently open data set.
    pub fn export_namedict(
        &mut self,
        rec: &HashMap<String, FieldValue>,
    ) -> EncodeResult<()> {
        let template = self.current_data_template()?;
        let cp = self.checkpoint();
        if let Err(error) = template.encode_namedict_to(&mut self.buf, rec) {
            self.rollback(cp);
            return Err(error);
        }
        self.check_mtu(cp)?;
        self.record_count += 1;
        Ok(())
    }

    /// Encodes one data record from a value sequence, optionally reordered
    /// through a projection (see `Template::encode_tuple_to`).
    pub fn export_tuple(
        &mut self,
        rec: &[FieldValue],
        ielist: Option<&InformationElementList>,
    ) -> EncodeResult<()> {
        let template = self.current_data_template()?;
        let cp = self.checkpoint();
        if let Err(error) =
            template.encode_tuple_to(&mut self.buf, rec, ielist)
        {
            self.rollback(cp);
            return Err(error);
        }
        self.check_mtu(cp)?;
        self.record_count += 1;
        Ok(())
    }

    /// Finalizes the message: closes the current set, fills in the header
    /// length, export time, and sequence, advances the domain sequence by
    /// the number of data records exported, and returns the bytes.
    pub fn to_bytes(&mut self) -> EncodeResult<Bytes> {
        if !matches!(self.state, State::Message | State::Set(_)) {
            return Err(EncodeError::InvalidState);
        }
        self.close_set();

        let export_time = self.export_time.unwrap_or_else(Utc::now);
        let sequence = self.sequences.get(&self.odid).copied().unwrap_or(0);
        let length = self.buf.len() as u16;
        self.buf[2..4].copy_from_slice(&length.to_be_bytes());
        self.buf[4..8].copy_from_slice(
            &(export_time.timestamp() as u32).to_be_bytes(),
        );
        self.buf[8..12].copy_from_slice(&sequence.to_be_bytes());

        let counter = self.sequences.entry(self.odid).or_insert(0);
        *counter = counter.wrapping_add(self.record_count);
        self.msg_export_time = export_time;
        self.msg_sequence = sequence;
        self.state = State::Finalized;

        Ok(self.buf.split().freeze())
    }

    /// Finalizes the message and writes it to a stream.
    pub fn write_message<W: Write>(
        &mut self,
        writer: &mut W,
    ) -> EncodeResult<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    fn open_set(&mut self, setid: u16) -> EncodeResult<()> {
        match setid {
            TEMPLATE_SET_ID | OPTIONS_SET_ID => (),
            setid if setid >= MIN_TEMPLATE_ID => {
                if !self.templates.contains_key(&(self.odid, setid)) {
                    return Err(EncodeError::TemplateNotFound(setid));
                }
            }
            setid => return Err(EncodeError::InvalidSetId(setid)),
        }

        let cp = self.checkpoint();
        self.close_set();
        self.cur_set_off = self.buf.len();
        self.buf.put_u16(setid);
        // The set length is patched when the set is closed.
        self.buf.put_u16(0);
        self.state = State::Set(setid);
        self.check_mtu(cp)
    }

    // Patches the current set's length field to its final size.
    fn close_set(&mut self) {
        if let State::Set(_) = self.state {
            let length = (self.buf.len() - self.cur_set_off) as u16;
            self.buf[self.cur_set_off + 2..self.cur_set_off + 4]
                .copy_from_slice(&length.to_be_bytes());
            self.state = State::Message;
        }
    }

    fn current_data_template(&self) -> EncodeResult<Arc<Template>> {
        match self.state {
            State::Set(setid) if setid >= MIN_TEMPLATE_ID => self
                .templates
                .get(&(self.odid, setid))
                .cloned()
                .ok_or(EncodeError::TemplateNotFound(setid)),
            _ => Err(EncodeError::InvalidState),
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            buf_len: self.buf.len(),
            state: self.state,
            cur_set_off: self.cur_set_off,
        }
    }

    fn rollback(&mut self, cp: Checkpoint) {
        self.buf.truncate(cp.buf_len);
        self.state = cp.state;
        self.cur_set_off = cp.cur_set_off;
    }

    // Rolls the buffer back to the checkpoint if the MTU was exceeded,
    // leaving it byte-identical to its pre-operation state.
    fn check_mtu(&mut self, cp: Checkpoint) -> EncodeResult<()> {
        if self.buf.len() > self.mtu {
            self.rollback(cp);
            return Err(EncodeError::EndOfMessage);
        }
        Ok(())
    }

    // ===== decoding =====

    /// Loads one message: validates the header, stores its fields, and
    /// indexes the sets for iteration.
    pub fn from_bytes(&mut self, data: &[u8]) -> DecodeResult<()> {
        if data.len() < MSG_HDR_SIZE {
            return Err(DecodeError::IncompleteMessage);
        }
        let mut hdr = Bytes::copy_from_slice(&data[..MSG_HDR_SIZE]);
        let version = hdr.get_u16();
        if version != IPFIX_VERSION {
            return Err(DecodeError::InvalidVersion(version));
        }
        let length = hdr.get_u16() as usize;
        if length < MSG_HDR_SIZE || length > data.len() {
            return Err(DecodeError::InvalidMessageLength(length as u16));
        }
        let export_time = hdr.get_u32();
        let sequence = hdr.get_u32();
        let odid = hdr.get_u32();

        // Index the sets.
        let msg = Bytes::copy_from_slice(&data[..length]);
        let mut setlist = Vec::new();
        let mut offset = MSG_HDR_SIZE;
        while offset < length {
            if length - offset < SET_HDR_SIZE {
                return Err(DecodeError::InvalidSetLength(
                    (length - offset) as u16,
                ));
            }
            let mut set_hdr = msg.slice(offset..offset + SET_HDR_SIZE);
            let set_id = set_hdr.get_u16();
            let set_len = set_hdr.get_u16() as usize;
            if set_len < SET_HDR_SIZE || offset + set_len > length {
                return Err(DecodeError::InvalidSetLength(set_len as u16));
            }
            setlist.push(SetEntry::new(
                set_id,
                offset + SET_HDR_SIZE,
                set_len - SET_HDR_SIZE,
            ));
            offset += set_len;
        }

        self.odid = odid;
        self.msg_export_time = DateTime::from_timestamp(export_time as i64, 0)
            .ok_or(DecodeError::InvalidTimestamp)?;
        self.msg_sequence = sequence;
        self.rx_msg = msg;
        self.setlist = setlist;
        self.state = State::Deframed;
        Ok(())
    }

    /// Reads and loads the next message from a stream, e.g. an RFC 5655
    /// IPFIX File (a plain concatenation of messages). Returns `false` on
    /// a clean end of stream.
    pub fn read_message<R: Read>(
        &mut self,
        reader: &mut R,
    ) -> DecodeResult<bool> {
        let mut hdr = [0; MSG_HDR_SIZE];
        let mut nread = 0;
        while nread < MSG_HDR_SIZE {
            let n = reader.read(&mut hdr[nread..])?;
            if n == 0 {
                if nread == 0 {
                    return Ok(false);
                }
                return Err(DecodeError::IncompleteMessage);
            }
            nread += n;
        }

        let length = u16::from_be_bytes([hdr[2], hdr[3]]) as usize;
        if length < MSG_HDR_SIZE {
            return Err(DecodeError::InvalidMessageLength(length as u16));
        }
        let mut data = vec![0; length];
        data[..MSG_HDR_SIZE].copy_from_slice(&hdr);
        reader
            .read_exact(&mut data[MSG_HDR_SIZE..])
            .map_err(|_| DecodeError::IncompleteMessage)?;
        self.from_bytes(&data)?;
        Ok(true)
    }

    /// Iterates the loaded message's data records as name-to-value
    /// mappings. Template sets are processed as they are encountered;
    /// data sets with no known template are skipped. Single-pass:
    /// re-reading requires another `from_bytes`.
    pub fn namedict_iter(&mut self) -> NamedictIter<'_> {
        NamedictIter(RecordCursor::new(self, None))
    }

    /// Like `namedict_iter`, keyed by element handle.
    pub fn iedict_iter(&mut self) -> IedictIter<'_> {
        IedictIter(RecordCursor::new(self, None))
    }

    /// Iterates data records projected onto `ielist`, in `ielist` order.
    /// Sets whose template does not cover the projection are skipped
    /// entirely.
    pub fn tuple_iter(
        &mut self,
        ielist: InformationElementList,
    ) -> TupleIter<'_> {
        TupleIter(RecordCursor::new(self, Some(ielist)))
    }

    // Decodes every record of a template set into the domain table.
    fn process_template_set(
        &mut self,
        setid: u16,
        mut body: Bytes,
    ) -> DecodeResult<()> {
        // A template record is at least four octets; anything shorter left
        // at the tail is padding.
        while body.remaining() >= 4 {
            match Template::decode_template_record(&mut body, setid)? {
                TemplateRecord::Defined(template) => {
                    let tid = template.tid();
                    debug!(odid = self.odid, tid, "decoded template");
                    self.templates
                        .insert((self.odid, tid), Arc::new(template));
                }
                TemplateRecord::Withdrawn(tid) => {
                    debug!(odid = self.odid, tid, "template withdrawn");
                    self.templates.remove(&(self.odid, tid));
                }
            }
        }
        Ok(())
    }
}

impl Default for MessageBuffer {
    fn default() -> MessageBuffer {
        MessageBuffer::new(DEFAULT_MTU)
    }
}

// ===== record iteration =====

// Single-pass cursor over the deframed set index. Takes the index out of
// the buffer so a second iterator observes an already-consumed message.
struct RecordCursor<'a> {
    mb: &'a mut MessageBuffer,
    sets: std::vec::IntoIter<SetEntry>,
    body: Bytes,
    template: Option<Arc<Template>>,
    plan: Option<Arc<TemplatePackingPlan>>,
    projection: Option<InformationElementList>,
    failed: bool,
}

/// Iterator over records as name-to-value mappings.
pub struct NamedictIter<'a>(RecordCursor<'a>);

/// Iterator over records as element-handle-to-value mappings.
pub struct IedictIter<'a>(RecordCursor<'a>);

/// Iterator over records as projected value sequences.
pub struct TupleIter<'a>(RecordCursor<'a>);

impl<'a> RecordCursor<'a> {
    fn new(
        mb: &'a mut MessageBuffer,
        projection: Option<InformationElementList>,
    ) -> RecordCursor<'a> {
        let sets = std::mem::take(&mut mb.setlist).into_iter();
        RecordCursor {
            mb,
            sets,
            body: Bytes::new(),
            template: None,
            plan: None,
            projection,
            failed: false,
        }
    }

    fn next_values(
        &mut self,
    ) -> Option<DecodeResult<(Arc<Template>, Vec<FieldValue>)>> {
        if self.failed {
            return None;
        }
        loop {
            // Drain the current data set first.
            if let Some(template) = self.template.clone() {
                if self.body.remaining() >= template.min_record_len() {
                    match template
                        .decode_record(&mut self.body, self.plan.as_deref())
                    {
                        Ok(values) => return Some(Ok((template, values))),
                        Err(error) => {
                            self.failed = true;
                            return Some(Err(error));
                        }
                    }
                }
                // Tail padding smaller than one record is permitted.
                self.template = None;
                self.plan = None;
            }

            let entry = self.sets.next()?;
            let body = self
                .mb
                .rx_msg
                .slice(entry.offset..entry.offset + entry.length);
            match entry.set_id {
                TEMPLATE_SET_ID | OPTIONS_SET_ID => {
                    if let Err(error) =
                        self.mb.process_template_set(entry.set_id, body)
                    {
                        self.failed = true;
                        return Some(Err(error));
                    }
                }
                setid if setid >= MIN_TEMPLATE_ID => {
                    let Some(template) = self
                        .mb
                        .templates
                        .get(&(self.mb.odid, setid))
                        .cloned()
                    else {
                        debug!(
                            odid = self.mb.odid,
                            setid, "skipping set with unknown template"
                        );
                        continue;
                    };
                    let plan = match &self.projection {
                        Some(projection) => {
                            let plan =
                                template.packplan_for_ielist(projection);
                            if !plan.is_complete() {
                                debug!(
                                    odid = self.mb.odid,
                                    setid,
                                    "skipping set not covering projection"
                                );
                                continue;
                            }
                            Some(plan)
                        }
                        None => None,
                    };
                    self.template = Some(template);
                    self.plan = plan;
                    self.body = body;
                }
                // Reserved set IDs.
                _ => (),
            }
        }
    }
}

impl Iterator for NamedictIter<'_> {
    type Item = DecodeResult<HashMap<String, FieldValue>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next_values().map(|result| {
            result.map(|(template, values)| {
                template
                    .ies()
                    .iter()
                    .zip(values)
                    .map(|(ie, value)| (ie.name.clone(), value))
                    .collect()
            })
        })
    }
}

impl Iterator for IedictIter<'_> {
    type Item =
        DecodeResult<HashMap<Arc<InformationElement>, FieldValue>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next_values().map(|result| {
            result.map(|(template, values)| {
                template.ies().iter().cloned().zip(values).collect()
            })
        })
    }
}

impl Iterator for TupleIter<'_> {
    type Item = DecodeResult<Vec<FieldValue>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next_values()
            .map(|result| result.map(|(_, values)| values))
    }
}

//! Binary trace decoder.
//!
//! A [`TraceDecoder`] owns one trace source and turns it into a lazy,
//! non-restartable sequence of [`Event`]s. End of data at a record boundary
//! is a normal end of stream; running out of bytes after the tag has been
//! read is a corrupt record and is fatal.

use std::fmt;
use std::io::{self, ErrorKind, Read};
use std::iter::FusedIterator;

use metrics::counter;
use tracing::{debug, warn};

use crate::disasm::{Disassembler, RiscvDisassembler, describe_instruction};
use crate::record::HEADER_LEN;
use crate::{DecodeError, Event, EventPayload, EventTag, is_jump_class};

/// Which side of the comparison a trace comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Functional emulator.
    Emu,
    /// RTL simulation.
    Rtl,
}

impl Stream {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emu => "emu",
            Self::Rtl => "rtl",
        }
    }

    /// Upper-case label used in mismatch reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Emu => "EMU",
            Self::Rtl => "RTL",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoder options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Drop jump-class records (`opcode & 0x7f == 0x67`).
    ///
    /// The RTL trace reports these unreliably, so both sides filter them.
    pub skip_jumps: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { skip_jumps: true }
    }
}

/// Decodes trace records from a byte source.
pub struct TraceDecoder<R, D = RiscvDisassembler> {
    reader: R,
    stream: Stream,
    disassembler: D,
    config: DecoderConfig,
    /// Records read so far, filtered ones included.
    seq: u64,
    /// Bytes consumed so far.
    offset: u64,
    /// Keep descriptions of filtered records for [`Self::take_skipped`].
    retain_skipped: bool,
    skipped: Vec<Event>,
    done: bool,
}

impl<R: Read, D: Disassembler> TraceDecoder<R, D> {
    pub fn new(reader: R, stream: Stream, disassembler: D) -> Self {
        Self {
            reader,
            stream,
            disassembler,
            config: DecoderConfig::default(),
            seq: 0,
            offset: 0,
            retain_skipped: false,
            skipped: Vec::new(),
            done: false,
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn stream(&self) -> Stream {
        self.stream
    }

    pub const fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Buffer filtered jump records so they can be echoed.
    pub fn set_retain_skipped(&mut self, retain: bool) {
        self.retain_skipped = retain;
        if !retain {
            self.skipped.clear();
        }
    }

    /// Drain the records filtered since the last call, oldest first.
    ///
    /// Always empty unless [`Self::set_retain_skipped`] was enabled.
    pub fn take_skipped(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.skipped)
    }

    /// Sequence number of the last record read (0 before the first).
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Bytes consumed from the source.
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Decode the next event.
    ///
    /// Returns `Ok(None)` once the source is exhausted. After end of stream
    /// or an error the decoder stays finished.
    pub fn next_event(&mut self) -> Result<Option<Event>, DecodeError> {
        if self.done {
            return Ok(None);
        }
        let result = self.decode_next();
        if !matches!(result, Ok(Some(_))) {
            self.done = true;
        }
        result
    }

    fn decode_next(&mut self) -> Result<Option<Event>, DecodeError> {
        loop {
            let record = self.offset;
            let mut header = [0u8; HEADER_LEN];
            let n = read_fully(&mut self.reader, &mut header).map_err(|source| DecodeError::Io {
                stream: self.stream,
                offset: record,
                source,
            })?;
            self.offset += n as u64;
            if n < HEADER_LEN {
                if n > 0 {
                    warn!(
                        stream = %self.stream,
                        offset = record,
                        bytes = n,
                        "ignoring partial record header at end of trace"
                    );
                }
                debug!(stream = %self.stream, records = self.seq, "end of trace");
                return Ok(None);
            }

            self.seq += 1;
            counter!("rvtrace_records_total", "stream" => self.stream.as_str()).increment(1);

            let pc = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let opcode = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
            let tag = EventTag::try_from(header[8]).map_err(|tag| DecodeError::UnknownTag {
                stream: self.stream,
                offset: record,
                tag,
            })?;

            let payload = self.read_payload(tag, record)?;

            if self.config.skip_jumps && is_jump_class(opcode) {
                debug!(
                    stream = %self.stream,
                    seq = self.seq,
                    "skipping jump-class record pc=0x{pc:08x} opcode=0x{opcode:08x}"
                );
                counter!("rvtrace_jumps_skipped_total", "stream" => self.stream.as_str())
                    .increment(1);
                if self.retain_skipped {
                    let text = describe_instruction(&self.disassembler, opcode, pc);
                    self.skipped.push(Event::new(pc, opcode, payload, self.seq, &text));
                }
                continue;
            }

            let text = describe_instruction(&self.disassembler, opcode, pc);
            return Ok(Some(Event::new(pc, opcode, payload, self.seq, &text)));
        }
    }

    fn read_payload(&mut self, tag: EventTag, record: u64) -> Result<EventPayload, DecodeError> {
        let payload = match tag {
            EventTag::RegWrite => {
                let reg = self.read_u8(record, "reg")?;
                let value = self.read_u32(record, "value")?;
                EventPayload::RegWrite { reg, value }
            }
            EventTag::MemRead => {
                let addr = self.read_u32(record, "addr")?;
                let value = self.read_u32(record, "value")?;
                EventPayload::MemRead { addr, value }
            }
            EventTag::MemWrite => {
                let addr = self.read_u32(record, "addr")?;
                let value = self.read_u32(record, "value")?;
                EventPayload::MemWrite { addr, value }
            }
            EventTag::FlowChange => {
                // Target is consumed but recorded as 0.
                let _new_pc = self.read_u32(record, "new_pc")?;
                EventPayload::FlowChange { new_pc: 0 }
            }
            EventTag::FlowLink => {
                let new_pc = self.read_u32(record, "new_pc")?;
                let register = self.read_u8(record, "register")?;
                EventPayload::FlowLink { new_pc, register }
            }
        };
        Ok(payload)
    }

    fn read_field<const N: usize>(
        &mut self,
        record: u64,
        field: &'static str,
    ) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        match self.reader.read_exact(&mut buf) {
            Ok(()) => {
                self.offset += N as u64;
                Ok(buf)
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(DecodeError::CorruptRecord {
                stream: self.stream,
                offset: record,
                field,
            }),
            Err(source) => Err(DecodeError::Io {
                stream: self.stream,
                offset: record,
                source,
            }),
        }
    }

    fn read_u8(&mut self, record: u64, field: &'static str) -> Result<u8, DecodeError> {
        self.read_field::<1>(record, field).map(|[b]| b)
    }

    fn read_u32(&mut self, record: u64, field: &'static str) -> Result<u32, DecodeError> {
        self.read_field::<4>(record, field).map(u32::from_le_bytes)
    }
}

impl<R: Read, D: Disassembler> Iterator for TraceDecoder<R, D> {
    type Item = Result<Event, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

impl<R: Read, D: Disassembler> FusedIterator for TraceDecoder<R, D> {}

/// Read until `buf` is full or the source is exhausted.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

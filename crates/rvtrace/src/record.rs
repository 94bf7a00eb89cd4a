//! Binary trace record layout.
//!
//! Every record is `pc:u32 | opcode:u32 | tag:u8 | payload`, little-endian
//! with no padding between fields or records. Payload sizes by tag:
//!
//! | Tag | Variant    | Payload                      |
//! |-----|------------|------------------------------|
//! | 0   | RegWrite   | `reg:u8 value:u32`           |
//! | 1   | MemRead    | `addr:u32 value:u32`         |
//! | 2   | MemWrite   | `addr:u32 value:u32`         |
//! | 3   | FlowChange | `new_pc:u32`                 |
//! | 4   | FlowLink   | `new_pc:u32 register:u8`     |

use std::io::{self, Write};

use crate::{EventPayload, EventTag};

/// Bytes of `pc`, `opcode` and `tag`.
pub const HEADER_LEN: usize = 9;

/// Payload size in bytes for a tag.
pub const fn payload_len(tag: EventTag) -> usize {
    match tag {
        EventTag::RegWrite | EventTag::FlowLink => 5,
        EventTag::MemRead | EventTag::MemWrite => 8,
        EventTag::FlowChange => 4,
    }
}

/// The compared content of a trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub pc: u32,
    pub opcode: u32,
    pub payload: EventPayload,
}

impl Record {
    pub const fn new(pc: u32, opcode: u32, payload: EventPayload) -> Self {
        Self {
            pc,
            opcode,
            payload,
        }
    }

    /// Size of the encoded record.
    pub const fn encoded_len(&self) -> usize {
        HEADER_LEN + payload_len(self.payload.tag())
    }

    /// Append the wire encoding to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.pc.to_le_bytes());
        out.extend_from_slice(&self.opcode.to_le_bytes());
        out.push(self.payload.tag() as u8);
        match self.payload {
            EventPayload::RegWrite { reg, value } => {
                out.push(reg);
                out.extend_from_slice(&value.to_le_bytes());
            }
            EventPayload::MemRead { addr, value } | EventPayload::MemWrite { addr, value } => {
                out.extend_from_slice(&addr.to_le_bytes());
                out.extend_from_slice(&value.to_le_bytes());
            }
            EventPayload::FlowChange { new_pc } => {
                out.extend_from_slice(&new_pc.to_le_bytes());
            }
            EventPayload::FlowLink { new_pc, register } => {
                out.extend_from_slice(&new_pc.to_le_bytes());
                out.push(register);
            }
        }
    }

    /// Write the wire encoding to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        writer.write_all(&buf)
    }
}

/// Encode a sequence of records back to back.
pub fn encode(records: &[Record]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.iter().map(Record::encoded_len).sum());
    for record in records {
        record.encode_into(&mut out);
    }
    out
}

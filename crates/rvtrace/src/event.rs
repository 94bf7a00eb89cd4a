//! Architectural events decoded from a trace.

use std::fmt;

/// Low opcode bits selecting the instruction format.
pub const OPCODE_MASK: u32 = 0x7F;

/// Major opcode of the jump-class instructions filtered from comparison.
pub const JUMP_OPCODE: u32 = 0x67;

/// Check whether an instruction word is jump-class.
#[inline]
pub const fn is_jump_class(opcode: u32) -> bool {
    opcode & OPCODE_MASK == JUMP_OPCODE
}

/// Wire tag selecting the payload variant of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventTag {
    RegWrite = 0,
    MemRead = 1,
    MemWrite = 2,
    FlowChange = 3,
    FlowLink = 4,
}

impl EventTag {
    /// Name used in descriptions.
    pub const fn name(self) -> &'static str {
        match self {
            Self::RegWrite => "RegWrite",
            Self::MemRead => "MemRead",
            Self::MemWrite => "MemWrite",
            Self::FlowChange => "FlowChange",
            Self::FlowLink => "FlowLink",
        }
    }
}

impl TryFrom<u8> for EventTag {
    /// The rejected byte.
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::RegWrite),
            1 => Ok(Self::MemRead),
            2 => Ok(Self::MemWrite),
            3 => Ok(Self::FlowChange),
            4 => Ok(Self::FlowLink),
            other => Err(other),
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The architectural effect carried by a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventPayload {
    /// Register `reg` was written with `value`.
    RegWrite { reg: u8, value: u32 },
    /// A load from `addr` returned `value`.
    MemRead { addr: u32, value: u32 },
    /// A store to `addr` wrote `value`.
    MemWrite { addr: u32, value: u32 },
    /// Control flow was redirected.
    FlowChange { new_pc: u32 },
    /// A linking control-flow change wrote `register`.
    FlowLink { new_pc: u32, register: u8 },
}

impl EventPayload {
    pub const fn tag(&self) -> EventTag {
        match self {
            Self::RegWrite { .. } => EventTag::RegWrite,
            Self::MemRead { .. } => EventTag::MemRead,
            Self::MemWrite { .. } => EventTag::MemWrite,
            Self::FlowChange { .. } => EventTag::FlowChange,
            Self::FlowLink { .. } => EventTag::FlowLink,
        }
    }

    /// Variant fields rendered as `Name=0x........` pairs.
    pub fn fields(&self) -> String {
        match *self {
            Self::RegWrite { reg, value } => {
                format!("Reg={}, Value={}", hex(u32::from(reg)), hex(value))
            }
            Self::MemRead { addr, value } | Self::MemWrite { addr, value } => {
                format!("Addr={}, Value={}", hex(addr), hex(value))
            }
            Self::FlowChange { new_pc } => format!("NewPC={}", hex(new_pc)),
            Self::FlowLink { new_pc, register } => {
                format!("NewPC={}, Reg={}", hex(new_pc), hex(u32::from(register)))
            }
        }
    }
}

impl fmt::Display for EventPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag(), self.fields())
    }
}

/// One decoded trace event.
///
/// Two events are equal when their `pc`, `opcode` and `payload` are equal.
/// `seq` and `description` differ legitimately between streams and are
/// ignored by comparison.
#[derive(Clone, Debug)]
pub struct Event {
    pub pc: u32,
    pub opcode: u32,
    pub payload: EventPayload,
    /// Position of the record in its stream, starting at 1.
    pub seq: u64,
    /// Human-readable line for reports.
    pub description: String,
}

impl Event {
    /// Build an event and render its description.
    pub fn new(pc: u32, opcode: u32, payload: EventPayload, seq: u64, disassembly: &str) -> Self {
        let description = describe(seq, disassembly, pc, opcode, &payload);
        Self {
            pc,
            opcode,
            payload,
            seq,
            description,
        }
    }

    /// The compared part of the event.
    pub const fn record(&self) -> crate::Record {
        crate::Record::new(self.pc, self.opcode, self.payload)
    }

    /// Opcode bits `[6:0]`.
    pub const fn effective_opcode(&self) -> u32 {
        self.opcode & OPCODE_MASK
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.record() == other.record()
    }
}

impl Eq for Event {}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

fn hex(value: u32) -> String {
    format!("0x{value:08X}")
}

fn describe(seq: u64, disassembly: &str, pc: u32, opcode: u32, payload: &EventPayload) -> String {
    format!(
        "{seq}: {disassembly} \t + {}: PC={}, Opcode={}, {}",
        payload.tag(),
        hex(pc),
        hex(opcode),
        payload.fields()
    )
}

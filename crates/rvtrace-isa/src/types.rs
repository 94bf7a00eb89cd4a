//! Core types for RV32 decoding.

use std::fmt::{self, Display};

/// Architecture mode used for the whole run.
///
/// Traces always come from a 32-bit core; the only knob is whether 16-bit
/// compressed encodings are recognised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IsaMode {
    /// Decode the C extension.
    pub compressed: bool,
}

impl IsaMode {
    /// RV32 without compressed instructions.
    pub const RV32: Self = Self { compressed: false };
    /// RV32 with the C extension.
    pub const RV32C: Self = Self { compressed: true };
}

impl Default for IsaMode {
    fn default() -> Self {
        Self::RV32C
    }
}

impl Display for IsaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.compressed {
            write!(f, "rv32imc")
        } else {
            write!(f, "rv32im")
        }
    }
}

/// Decoded operand shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstrArgs {
    /// `rd, rs1, rs2`
    R { rd: u8, rs1: u8, rs2: u8 },
    /// `rd, rs1, imm`
    I { rd: u8, rs1: u8, imm: i32 },
    /// `reg, offset(base)` for loads, stores and JALR.
    Mem { reg: u8, base: u8, offset: i32 },
    /// `rs1, rs2, target`
    B { rs1: u8, rs2: u8, target: u32 },
    /// `rd, imm20`
    U { rd: u8, imm: u32 },
    /// `rd, target`
    J { rd: u8, target: u32 },
    /// `rd, csr, rs1`
    Csr { rd: u8, rs1: u8, csr: u16 },
    /// `rd, csr, zimm`
    CsrImm { rd: u8, zimm: u8, csr: u16 },
    /// `pred, succ`
    Fence { pred: u8, succ: u8 },
    /// `rd, imm` (compressed two-operand immediate forms)
    RegImm { rd: u8, imm: i32 },
    /// `rd, rs2` (compressed two-operand register forms)
    RegReg { rd: u8, rs2: u8 },
    /// `rs1`
    Reg { rs1: u8 },
    /// `rs1, target`
    RegTarget { rs1: u8, target: u32 },
    /// `target`
    Target { target: u32 },
    None,
}

/// A decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInstr {
    pub mnemonic: &'static str,
    pub pc: u32,
    /// Encoding size in bytes (2 or 4).
    pub size: u8,
    pub raw: u32,
    pub args: InstrArgs,
}

/// Mnemonic and operand text for one instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disassembly {
    pub mnemonic: String,
    pub operands: String,
}

impl Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operands.is_empty() {
            write!(f, "{}", self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, self.operands)
        }
    }
}

/// Get register ABI name.
pub const fn reg_name(reg: u8) -> &'static str {
    match reg {
        0 => "zero",
        1 => "ra",
        2 => "sp",
        3 => "gp",
        4 => "tp",
        5 => "t0",
        6 => "t1",
        7 => "t2",
        8 => "s0",
        9 => "s1",
        10 => "a0",
        11 => "a1",
        12 => "a2",
        13 => "a3",
        14 => "a4",
        15 => "a5",
        16 => "a6",
        17 => "a7",
        18 => "s2",
        19 => "s3",
        20 => "s4",
        21 => "s5",
        22 => "s6",
        23 => "s7",
        24 => "s8",
        25 => "s9",
        26 => "s10",
        27 => "s11",
        28 => "t3",
        29 => "t4",
        30 => "t5",
        31 => "t6",
        _ => "??",
    }
}

/// Name of a well-known CSR, if any.
pub const fn csr_name(csr: u16) -> Option<&'static str> {
    let name = match csr {
        0x001 => "fflags",
        0x002 => "frm",
        0x003 => "fcsr",
        0x300 => "mstatus",
        0x301 => "misa",
        0x304 => "mie",
        0x305 => "mtvec",
        0x340 => "mscratch",
        0x341 => "mepc",
        0x342 => "mcause",
        0x343 => "mtval",
        0x344 => "mip",
        0xB00 => "mcycle",
        0xB02 => "minstret",
        0xB80 => "mcycleh",
        0xB82 => "minstreth",
        0xC00 => "cycle",
        0xC01 => "time",
        0xC02 => "instret",
        0xC80 => "cycleh",
        0xC81 => "timeh",
        0xC82 => "instreth",
        0xF11 => "mvendorid",
        0xF12 => "marchid",
        0xF13 => "mimpid",
        0xF14 => "mhartid",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_compressed() {
        assert_eq!(IsaMode::default(), IsaMode::RV32C);
        assert_eq!(IsaMode::RV32C.to_string(), "rv32imc");
        assert_eq!(IsaMode::RV32.to_string(), "rv32im");
    }

    #[test]
    fn test_reg_names() {
        assert_eq!(reg_name(0), "zero");
        assert_eq!(reg_name(10), "a0");
        assert_eq!(reg_name(31), "t6");
        assert_eq!(reg_name(32), "??");
    }

    #[test]
    fn test_disassembly_display() {
        let d = Disassembly {
            mnemonic: "ecall".to_string(),
            operands: String::new(),
        };
        assert_eq!(d.to_string(), "ecall");

        let d = Disassembly {
            mnemonic: "addi".to_string(),
            operands: "a0, zero, 1".to_string(),
        };
        assert_eq!(d.to_string(), "addi a0, zero, 1");
    }
}

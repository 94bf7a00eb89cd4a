use crate::{DecodedInstr, Disassembly, InstrArgs, csr_name, reg_name};

/// Render the operand list of a decoded instruction.
pub fn format_operands(args: &InstrArgs) -> String {
    match *args {
        InstrArgs::R { rd, rs1, rs2 } => {
            format!("{}, {}, {}", reg_name(rd), reg_name(rs1), reg_name(rs2))
        }
        InstrArgs::I { rd, rs1, imm } => {
            format!("{}, {}, {}", reg_name(rd), reg_name(rs1), imm)
        }
        InstrArgs::Mem { reg, base, offset } => {
            format!("{}, {}({})", reg_name(reg), offset, reg_name(base))
        }
        InstrArgs::B { rs1, rs2, target } => {
            format!("{}, {}, {:#x}", reg_name(rs1), reg_name(rs2), target)
        }
        InstrArgs::U { rd, imm } => format!("{}, {:#x}", reg_name(rd), imm),
        InstrArgs::J { rd, target } => format!("{}, {:#x}", reg_name(rd), target),
        InstrArgs::Csr { rd, rs1, csr } => {
            format!("{}, {}, {}", reg_name(rd), format_csr(csr), reg_name(rs1))
        }
        InstrArgs::CsrImm { rd, zimm, csr } => {
            format!("{}, {}, {}", reg_name(rd), format_csr(csr), zimm)
        }
        InstrArgs::Fence { pred, succ } => {
            format!("{}, {}", fence_set(pred), fence_set(succ))
        }
        InstrArgs::RegImm { rd, imm } => format!("{}, {}", reg_name(rd), imm),
        InstrArgs::RegReg { rd, rs2 } => format!("{}, {}", reg_name(rd), reg_name(rs2)),
        InstrArgs::Reg { rs1 } => reg_name(rs1).to_string(),
        InstrArgs::RegTarget { rs1, target } => format!("{}, {:#x}", reg_name(rs1), target),
        InstrArgs::Target { target } => format!("{target:#x}"),
        InstrArgs::None => String::new(),
    }
}

impl DecodedInstr {
    /// Mnemonic and operand text.
    pub fn disassembly(&self) -> Disassembly {
        Disassembly {
            mnemonic: self.mnemonic.to_string(),
            operands: format_operands(&self.args),
        }
    }
}

fn format_csr(csr: u16) -> String {
    csr_name(csr).map_or_else(|| format!("{csr:#x}"), str::to_string)
}

fn fence_set(bits: u8) -> String {
    let set: String = [(0x8, 'i'), (0x4, 'o'), (0x2, 'r'), (0x1, 'w')]
        .iter()
        .filter(|(mask, _)| bits & mask != 0)
        .map(|(_, c)| *c)
        .collect();
    if set.is_empty() {
        "0".to_string()
    } else {
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_sets() {
        assert_eq!(fence_set(0xF), "iorw");
        assert_eq!(fence_set(0x3), "rw");
        assert_eq!(fence_set(0), "0");
    }

    #[test]
    fn test_unknown_csr_is_hex() {
        assert_eq!(format_csr(0x7C0), "0x7c0");
        assert_eq!(format_csr(0x342), "mcause");
    }
}

//! Disassembly adapter.
//!
//! Trace decoding only needs a display string for each instruction word.
//! Failures are absorbed here and never reach the comparison.

use metrics::counter;
use rvtrace_isa::{DisasmError, Disassembly, IsaMode};
use tracing::debug;

/// Turns an instruction word at an address into mnemonic and operand text.
pub trait Disassembler {
    fn disassemble(&self, word: u32, pc: u32) -> Result<Disassembly, DisasmError>;
}

impl<T: Disassembler + ?Sized> Disassembler for &T {
    fn disassemble(&self, word: u32, pc: u32) -> Result<Disassembly, DisasmError> {
        (**self).disassemble(word, pc)
    }
}

impl<T: Disassembler + ?Sized> Disassembler for Box<T> {
    fn disassemble(&self, word: u32, pc: u32) -> Result<Disassembly, DisasmError> {
        (**self).disassemble(word, pc)
    }
}

/// RV32 disassembler with a fixed ISA mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RiscvDisassembler {
    mode: IsaMode,
}

impl RiscvDisassembler {
    pub const fn new(mode: IsaMode) -> Self {
        Self { mode }
    }

    pub const fn mode(&self) -> IsaMode {
        self.mode
    }
}

impl Disassembler for RiscvDisassembler {
    fn disassemble(&self, word: u32, pc: u32) -> Result<Disassembly, DisasmError> {
        rvtrace_isa::disassemble(&word.to_le_bytes(), pc, self.mode)
    }
}

/// Disassembler that never fails and prints the raw word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullDisassembler;

impl Disassembler for NullDisassembler {
    fn disassemble(&self, word: u32, _pc: u32) -> Result<Disassembly, DisasmError> {
        Ok(Disassembly {
            mnemonic: ".word".to_string(),
            operands: format!("0x{word:08x}"),
        })
    }
}

/// Placeholder used when an instruction word cannot be disassembled.
pub fn invalid_placeholder(word: u32) -> String {
    format!("<invalid 0x{word:08X}>")
}

/// Disassembly text for `word`, or a placeholder if decoding fails.
pub fn describe_instruction<D: Disassembler + ?Sized>(disassembler: &D, word: u32, pc: u32) -> String {
    match disassembler.disassemble(word, pc) {
        Ok(disassembly) => disassembly.to_string(),
        Err(err) => {
            debug!("cannot disassemble 0x{word:08x} at 0x{pc:08x}: {err}");
            counter!("rvtrace_disasm_failures_total").increment(1);
            invalid_placeholder(word)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingDisassembler;

    impl Disassembler for FailingDisassembler {
        fn disassemble(&self, word: u32, _pc: u32) -> Result<Disassembly, DisasmError> {
            Err(DisasmError::Invalid { word })
        }
    }

    #[test]
    fn test_riscv_disassembler_uses_le_encoding() {
        let disasm = RiscvDisassembler::new(IsaMode::RV32C);
        assert_eq!(
            describe_instruction(&disasm, 0x00A0_0513, 0),
            "addi a0, zero, 10"
        );
        assert_eq!(
            describe_instruction(&disasm, 0x0080_00EF, 0x8000_0000),
            "jal ra, 0x80000008"
        );
    }

    #[test]
    fn test_failure_degrades_to_placeholder() {
        assert_eq!(
            describe_instruction(&FailingDisassembler, 0xDEAD_BEEF, 0),
            "<invalid 0xDEADBEEF>"
        );
        let disasm = RiscvDisassembler::new(IsaMode::RV32C);
        assert_eq!(
            describe_instruction(&disasm, 0xFFFF_FFFF, 0),
            "<invalid 0xFFFFFFFF>"
        );
    }

    #[test]
    fn test_mode_controls_compressed() {
        let disasm = RiscvDisassembler::new(IsaMode::RV32);
        assert_eq!(
            describe_instruction(&disasm, 0x0000_0505, 0),
            "<invalid 0x00000505>"
        );
        let disasm = RiscvDisassembler::new(IsaMode::RV32C);
        assert_eq!(describe_instruction(&disasm, 0x0000_0505, 0), "c.addi a0, 1");
    }

    #[test]
    fn test_null_disassembler() {
        assert_eq!(
            describe_instruction(&NullDisassembler, 0x13, 0),
            ".word 0x00000013"
        );
        let boxed: Box<dyn Disassembler> = Box::new(NullDisassembler);
        assert!(boxed.disassemble(0, 0).is_ok());
    }
}

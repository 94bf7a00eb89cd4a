//! RV32 instruction decoder and disassembler.
//!
//! Covers the base integer ISA, M, Zicsr, Zifencei and the C extension.
//! Output uses ABI register names and never folds instructions into
//! pseudo-instructions, so the text always reflects the raw encoding.

mod base;
mod compressed;
mod disasm;
mod error;
pub mod fields;
mod types;

pub use disasm::format_operands;
pub use error::{DisasmError, Result};
pub use types::*;

/// Decode the instruction at the start of `bytes` (little-endian).
///
/// With the C extension enabled, an encoding whose low two bits are not
/// `0b11` is a 16-bit instruction and only the first two bytes are used.
pub fn decode(bytes: &[u8], pc: u32, mode: IsaMode) -> Result<DecodedInstr> {
    if bytes.len() < 2 {
        return Err(DisasmError::Truncated { len: bytes.len() });
    }
    let half = u16::from_le_bytes([bytes[0], bytes[1]]);

    if half & 0x3 != 0x3 {
        if !mode.compressed {
            return Err(DisasmError::CompressedDisabled { half });
        }
        let (mnemonic, args) = compressed::decode_16bit(half, pc).ok_or(DisasmError::Invalid {
            word: u32::from(half),
        })?;
        return Ok(DecodedInstr {
            mnemonic,
            pc,
            size: 2,
            raw: u32::from(half),
            args,
        });
    }

    if bytes.len() < 4 {
        return Err(DisasmError::Truncated { len: bytes.len() });
    }
    let word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let (mnemonic, args) = base::decode_32bit(word, pc).ok_or(DisasmError::Invalid { word })?;
    Ok(DecodedInstr {
        mnemonic,
        pc,
        size: 4,
        raw: word,
        args,
    })
}

/// Disassemble the instruction at the start of `bytes`.
pub fn disassemble(bytes: &[u8], pc: u32, mode: IsaMode) -> Result<Disassembly> {
    decode(bytes, pc, mode).map(|instr| instr.disassembly())
}

use thiserror::Error;

/// Disassembly errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisasmError {
    #[error("instruction truncated: {len} byte(s) available")]
    Truncated { len: usize },
    #[error("invalid instruction encoding 0x{word:08x}")]
    Invalid { word: u32 },
    #[error("compressed instruction 0x{half:04x} but C extension is disabled")]
    CompressedDisabled { half: u16 },
}

pub type Result<T> = std::result::Result<T, DisasmError>;

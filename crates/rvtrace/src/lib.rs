//! RVTRACE - differential trace comparison
//!
//! Decodes two binary execution traces of the same RISC-V program, one from
//! an instruction-set emulator and one from an RTL simulation, and walks
//! them in lockstep to find the first points where they disagree.
//!
//! # Example
//!
//! ```ignore
//! use rvtrace::{Config, Report, compare_files};
//!
//! let mut report = Report::new(std::io::stdout().lock(), false);
//! let summary = compare_files("emu.bin".as_ref(), "rtl.bin".as_ref(), &Config::default(), &mut report)?;
//! assert!(summary.is_clean());
//! ```

pub mod compare;
pub mod decoder;
pub mod disasm;
mod error;
mod event;
pub mod metrics;
pub mod record;
mod report;
pub mod source;

use std::io::Write;
use std::path::Path;

pub use compare::{CompareConfig, Exhausted, Session, SessionSummary, StopReason};
pub use decoder::{DecoderConfig, Stream, TraceDecoder};
pub use disasm::{Disassembler, NullDisassembler, RiscvDisassembler};
pub use error::{DecodeError, Error, Result};
pub use event::{Event, EventPayload, EventTag, JUMP_OPCODE, OPCODE_MASK, is_jump_class};
pub use record::Record;
pub use report::Report;
pub use rvtrace_isa::IsaMode;

/// Options for a full comparison run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub decoder: DecoderConfig,
    pub compare: CompareConfig,
    /// ISA used to render instruction words.
    pub isa: IsaMode,
}

/// Compare the emulator trace at `emu` against the RTL trace at `rtl`.
pub fn compare_files<W: Write>(
    emu: &Path,
    rtl: &Path,
    config: &Config,
    report: &mut Report<W>,
) -> Result<SessionSummary> {
    let disassembler = RiscvDisassembler::new(config.isa);
    let emu = TraceDecoder::new(source::open_trace(emu)?, Stream::Emu, disassembler)
        .with_config(config.decoder);
    let rtl = TraceDecoder::new(source::open_trace(rtl)?, Stream::Rtl, disassembler)
        .with_config(config.decoder);
    Session::new(emu, rtl, config.compare).run(report)
}

//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rvtrace::{CompareConfig, Config, DecoderConfig, IsaMode};

/// Exit code when the traces agree.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when at least one mismatch was reported.
pub const EXIT_MISMATCH: i32 = 1;
/// Exit code for decode and I/O failures.
pub const EXIT_FATAL: i32 = 2;

#[derive(Parser)]
#[command(name = "rvtrace")]
#[command(about = "Compare an emulator trace against an RTL simulation trace")]
#[command(version)]
pub struct Cli {
    /// Trace produced by the instruction-set emulator
    #[arg(value_name = "EMU_TRACE")]
    pub emu: PathBuf,

    /// Trace produced by the RTL simulation
    #[arg(value_name = "RTL_TRACE")]
    pub rtl: PathBuf,

    /// Compare jump-class (JALR) records instead of dropping them
    #[arg(long)]
    pub keep_jumps: bool,

    /// Stop after this many mismatches
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_mismatches: u64,

    /// Disassemble without the C extension
    #[arg(long)]
    pub no_compressed: bool,

    /// Print every decoded record, filtered jumps included
    #[arg(long)]
    pub echo: bool,

    /// Show metrics summary after the comparison
    #[arg(long)]
    pub metrics: bool,

    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// When to style the report
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl ColorArg {
    /// Resolve against whether stdout supports color.
    pub const fn enabled(self, terminal_supports_color: bool) -> bool {
        match self {
            Self::Auto => terminal_supports_color,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

impl Cli {
    /// Default log directive for the chosen verbosity.
    pub const fn log_directive(&self) -> &'static str {
        if self.verbose {
            "rvtrace=debug"
        } else if self.quiet {
            "rvtrace=error"
        } else {
            "rvtrace=warn"
        }
    }

    pub fn config(&self) -> Config {
        Config {
            decoder: DecoderConfig {
                skip_jumps: !self.keep_jumps,
            },
            compare: CompareConfig {
                max_mismatches: usize::try_from(self.max_mismatches).unwrap_or(usize::MAX),
                echo_events: self.echo,
            },
            isa: if self.no_compressed {
                IsaMode::RV32
            } else {
                IsaMode::RV32C
            },
        }
    }
}

//! Lockstep comparison of two decoded traces.
//!
//! Each step pulls exactly one event from the emulator trace and one from
//! the RTL trace. There is no resynchronisation: if one side has extra or
//! missing events, the drift shows up as mismatches or as an early end of
//! stream.

use std::io::{Read, Write};

use metrics::{counter, gauge};
use tracing::{debug, info};

use crate::disasm::Disassembler;
use crate::{Error, Event, Report, Result, Stream, TraceDecoder};

/// Comparison options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompareConfig {
    /// Stop once this many mismatches have been reported (minimum 1).
    pub max_mismatches: usize,
    /// Print every decoded record below its step header, filtered jumps
    /// included.
    pub echo_events: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            max_mismatches: 2,
            echo_events: false,
        }
    }
}

/// Which trace ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exhausted {
    Emu,
    Rtl,
    Both,
}

/// Why a session stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream(Exhausted),
    MismatchLimit,
}

/// Outcome of a completed session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    /// Event pairs compared.
    pub steps: usize,
    pub mismatches: usize,
    pub stop: StopReason,
}

impl SessionSummary {
    /// No mismatch was found.
    pub const fn is_clean(&self) -> bool {
        self.mismatches == 0
    }
}

/// Drives two decoders in lockstep.
pub struct Session<A, B, D> {
    emu: TraceDecoder<A, D>,
    rtl: TraceDecoder<B, D>,
    config: CompareConfig,
}

impl<A: Read, B: Read, D: Disassembler> Session<A, B, D> {
    /// With `echo_events`, both decoders also retain filtered records so
    /// they appear in the echo.
    pub fn new(
        mut emu: TraceDecoder<A, D>,
        mut rtl: TraceDecoder<B, D>,
        config: CompareConfig,
    ) -> Self {
        emu.set_retain_skipped(config.echo_events);
        rtl.set_retain_skipped(config.echo_events);
        Self { emu, rtl, config }
    }

    pub const fn emu(&self) -> &TraceDecoder<A, D> {
        &self.emu
    }

    pub const fn rtl(&self) -> &TraceDecoder<B, D> {
        &self.rtl
    }

    /// Run to completion, writing the transcript to `report`.
    ///
    /// Decode errors on either side abort the session.
    pub fn run<W: Write>(&mut self, report: &mut Report<W>) -> Result<SessionSummary> {
        let max_mismatches = self.config.max_mismatches.max(1);
        let mut step = 0;
        let mut mismatches = 0;

        info!(max_mismatches, "comparing traces");

        let stop = loop {
            report.step_header(step).map_err(Error::Report)?;

            // Both sides advance every step, even if the first has ended.
            let emu = self.emu.next_event()?;
            let rtl = self.rtl.next_event()?;

            if self.config.echo_events {
                self.echo(report, emu.as_ref(), rtl.as_ref())?;
            }

            let (emu, rtl) = match (emu, rtl) {
                (Some(emu), Some(rtl)) => (emu, rtl),
                (emu, rtl) => {
                    let exhausted = match (emu.is_none(), rtl.is_none()) {
                        (true, true) => Exhausted::Both,
                        (true, false) => Exhausted::Emu,
                        _ => Exhausted::Rtl,
                    };
                    report.end_of_stream().map_err(Error::Report)?;
                    break StopReason::EndOfStream(exhausted);
                }
            };

            if emu != rtl {
                debug!(step, emu_seq = emu.seq, rtl_seq = rtl.seq, "mismatch");
                report.mismatch(&emu, &rtl).map_err(Error::Report)?;
                counter!("rvtrace_mismatches_total").increment(1);
                mismatches += 1;
            }

            step += 1;

            if mismatches >= max_mismatches {
                report.mismatch_limit().map_err(Error::Report)?;
                break StopReason::MismatchLimit;
            }
        };

        #[allow(clippy::cast_precision_loss)]
        let compared = step as f64;
        gauge!("rvtrace_steps").set(compared);
        info!(steps = step, mismatches, ?stop, "comparison finished");

        Ok(SessionSummary {
            steps: step,
            mismatches,
            stop,
        })
    }

    /// Print each side's filtered records followed by its returned event.
    fn echo<W: Write>(
        &mut self,
        report: &mut Report<W>,
        emu: Option<&Event>,
        rtl: Option<&Event>,
    ) -> Result<()> {
        let sides = [
            (Stream::Emu, self.emu.take_skipped(), emu),
            (Stream::Rtl, self.rtl.take_skipped(), rtl),
        ];
        for (stream, skipped, event) in sides {
            for event in skipped.iter().chain(event) {
                report.event(stream, event).map_err(Error::Report)?;
            }
        }
        Ok(())
    }
}

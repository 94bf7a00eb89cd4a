//! Console report for a comparison session.
//!
//! The transcript is a header per step, a bracketed block per mismatch and
//! one closing line saying why the run stopped.

use std::io::{self, Write};

use console::Style;

use crate::{Event, Stream};

/// Writes the comparison transcript.
pub struct Report<W> {
    out: W,
    color: bool,
}

impl<W: Write> Report<W> {
    /// Create a report; `color` forces styling on or off.
    pub const fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn header_style(&self) -> Style {
        Style::new().bold().underlined().force_styling(self.color)
    }

    fn alert_style(&self) -> Style {
        Style::new().red().bold().force_styling(self.color)
    }

    /// `--- Instruction <step> ---`
    pub fn step_header(&mut self, step: usize) -> io::Result<()> {
        let style = self.header_style();
        writeln!(
            self.out,
            "{}",
            style.apply_to(format!("--- Instruction {step} ---"))
        )
    }

    /// Echo one decoded event.
    pub fn event(&mut self, stream: Stream, event: &Event) -> io::Result<()> {
        writeln!(self.out, "{}: {}", stream.label(), event.description)
    }

    /// Mismatch block with both descriptions.
    pub fn mismatch(&mut self, emu: &Event, rtl: &Event) -> io::Result<()> {
        let style = self.alert_style();
        writeln!(self.out, "{}", style.apply_to("Mismatch detected!"))?;
        writeln!(self.out, "{}: {}", Stream::Emu.label(), emu.description)?;
        writeln!(self.out, "{}: {}", Stream::Rtl.label(), rtl.description)?;
        writeln!(self.out, "{}", style.apply_to("------------------"))
    }

    /// Closing line when either trace ran out.
    pub fn end_of_stream(&mut self) -> io::Result<()> {
        writeln!(self.out, "End of file reached.")?;
        self.out.flush()
    }

    /// Closing line when the mismatch limit was hit.
    pub fn mismatch_limit(&mut self) -> io::Result<()> {
        let style = self.alert_style();
        writeln!(
            self.out,
            "{}",
            style.apply_to("Too many mismatches, stopping analysis.")
        )?;
        self.out.flush()
    }
}

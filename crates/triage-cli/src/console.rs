//! Colored console rendering.
//!
//! All formatting concerns live here, outside the engine: the engine hands
//! over results and this sink decides how they look.

use colored::Colorize;
use std::io::{self, Write};
use triage::{CheckResult, ReportSink, ReportSummary};

/// Console sink: green ✓ / red ✗ marker, check name, findings verbatim.
pub struct ConsoleSink<W: Write> {
    writer: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl<W: Write> ConsoleSink<W> {
    #[cfg(test)]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn write_result(&mut self, result: &CheckResult) -> io::Result<()> {
        let marker = if result.pass {
            "✓".green()
        } else {
            "✗".red()
        };
        writeln!(self.writer, "{} - {}", marker, result.name)?;
        if !result.details.is_empty() {
            writeln!(self.writer, "{}", result.details.trim_end_matches('\n'))?;
        }
        if let Some(error) = &result.error {
            writeln!(self.writer, "{}", format!("error: {error}").yellow())?;
        }
        self.writer.flush()
    }
}

/// One-line tally for the bottom of the text report.
pub fn summary_line(summary: &ReportSummary) -> String {
    format!(
        "{} passed, {} failed, {} degraded",
        summary.passed, summary.failed, summary.degraded
    )
}

//! The reporter sink boundary.
//!
//! The engine hands an ordered result slice to a [`ReportSink`]; how a
//! result looks (color, symbols) is the sink's business. [`WriterSink`] is
//! the plain-text rendition over any `io::Write`; the CLI supplies the
//! colored console sink.

use serde::Serialize;
use std::io::{self, Write};
use tracing::warn;

use crate::result::CheckResult;

/// Receives one rendered result at a time.
pub trait ReportSink {
    fn write_result(&mut self, result: &CheckResult) -> io::Result<()>;
}

/// Feed an ordered result slice through a sink.
///
/// A write failure for one result is logged and skipped; the remaining
/// results still render.
pub fn render(sink: &mut dyn ReportSink, results: &[CheckResult]) {
    for result in results {
        if let Err(error) = sink.write_result(result) {
            warn!(check = %result.name, %error, "failed to render result");
        }
    }
}

/// Plain-text sink: a pass/fail marker, the check name, then the details
/// text verbatim (embedded line breaks included).
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn write_result(&mut self, result: &CheckResult) -> io::Result<()> {
        let marker = if result.pass { "ok" } else { "fail" };
        writeln!(self.writer, "[{marker}] {}", result.name)?;
        if !result.details.is_empty() {
            writeln!(self.writer, "{}", result.details.trim_end_matches('\n'))?;
        }
        if let Some(error) = &result.error {
            writeln!(self.writer, "error: {error}")?;
        }
        self.writer.flush()
    }
}

/// Tallies over one run's results.
///
/// `passed`, `failed`, and `degraded` are disjoint: a degraded check counts
/// only as degraded even though its pass flag is false.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub passed: usize,
    pub failed: usize,
    pub degraded: usize,
}

impl ReportSummary {
    pub fn of(results: &[CheckResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            if result.is_degraded() {
                summary.degraded += 1;
            } else if result.pass {
                summary.passed += 1;
            } else {
                summary.failed += 1;
            }
        }
        summary
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.degraded == 0
    }
}

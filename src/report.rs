use std::io::{self, Write};

use colored::{Color, Colorize};
use log::{error, info};
use serde::Serialize;

use crate::checks::CheckFailure;
use crate::config::ReportFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    Failed(CheckFailure),
}

impl CheckOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub label: &'static str,
    pub outcome: CheckOutcome,
}

/// Checks that ran, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub records: Vec<CheckRecord>,
}

impl Report {
    pub fn passed(&self) -> bool {
        !self.records.iter().any(|record| record.outcome.is_failed())
    }

    pub fn failure(&self) -> Option<&CheckFailure> {
        self.records.iter().find_map(|record| match &record.outcome {
            CheckOutcome::Failed(failure) => Some(failure),
            CheckOutcome::Passed => None,
        })
    }
}

/// Presentation of a run. Checks call into it as they execute; it never
/// influences their result.
pub trait Renderer {
    fn check_started(&mut self, label: &str) -> io::Result<()>;
    fn check_finished(&mut self, record: &CheckRecord) -> io::Result<()>;
    /// Called when the run is aborted before the checks could complete, for
    /// example by an unreachable node, with the full cause chain. Failed
    /// checks are reported through `check_finished` only.
    fn fatal(&mut self, error: &anyhow::Error) -> io::Result<()>;
    fn finish(&mut self, passed: bool) -> io::Result<()>;
}

pub fn renderer_for(format: ReportFormat) -> Box<dyn Renderer> {
    match format {
        ReportFormat::Color => Box::new(TerminalRenderer::colored(io::stdout())),
        ReportFormat::Plain => Box::new(TerminalRenderer::plain(io::stdout())),
        ReportFormat::Log => Box::new(LogRenderer),
        ReportFormat::Csv => Box::new(CsvRenderer::new(io::stdout())),
    }
}

/// "Checking <label>... success" lines followed by a closing banner.
pub struct TerminalRenderer<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn colored(out: W) -> Self {
        Self { out, color: true }
    }

    pub fn plain(out: W) -> Self {
        Self { out, color: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn check_started(&mut self, label: &str) -> io::Result<()> {
        write!(self.out, "Checking {}... ", label)?;
        self.out.flush()
    }

    fn check_finished(&mut self, record: &CheckRecord) -> io::Result<()> {
        match &record.outcome {
            CheckOutcome::Passed => {
                let line = self.paint("success", Color::Green);
                writeln!(self.out, "{}", line)
            }
            CheckOutcome::Failed(failure) => {
                let line = self.paint("failed", Color::Red);
                writeln!(self.out, "{}", line)?;
                writeln!(self.out, "  {}", failure)
            }
        }
    }

    fn fatal(&mut self, error: &anyhow::Error) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{:?}", error)
    }

    fn finish(&mut self, passed: bool) -> io::Result<()> {
        let banner = if passed {
            self.paint("Checks executed successfully.", Color::Green)
        } else {
            self.paint("Some checks failed.", Color::Red)
        };
        writeln!(self.out)?;
        writeln!(self.out, "{}", banner)?;
        self.out.flush()
    }
}

/// One log record per check, for runs whose stdout is not a terminal.
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn check_started(&mut self, _label: &str) -> io::Result<()> {
        Ok(())
    }

    fn check_finished(&mut self, record: &CheckRecord) -> io::Result<()> {
        match &record.outcome {
            CheckOutcome::Passed => info!("check={} outcome=passed", record.label),
            CheckOutcome::Failed(failure) => {
                error!("check={} outcome=failed reason=\"{}\"", record.label, failure)
            }
        }
        Ok(())
    }

    fn fatal(&mut self, error: &anyhow::Error) -> io::Result<()> {
        error!("run aborted: {:#}", error);
        Ok(())
    }

    fn finish(&mut self, passed: bool) -> io::Result<()> {
        if passed {
            info!("checks executed successfully");
        } else {
            error!("some checks failed");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    check: &'a str,
    outcome: &'a str,
    detail: String,
}

/// `check,outcome,detail` rows with a trailing `overall` row.
pub struct CsvRenderer<W: Write> {
    wtr: csv::Writer<W>,
}

impl<W: Write> CsvRenderer<W> {
    pub fn new(out: W) -> Self {
        let wtr = csv::WriterBuilder::new().has_headers(true).from_writer(out);
        Self { wtr }
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.wtr
            .into_inner()
            .map_err(|err| io::Error::other(err.to_string()))
    }

    fn row(&mut self, check: &str, outcome: &str, detail: String) -> io::Result<()> {
        self.wtr.serialize(CsvRow {
            check,
            outcome,
            detail,
        })?;
        self.wtr.flush()
    }
}

impl<W: Write> Renderer for CsvRenderer<W> {
    fn check_started(&mut self, _label: &str) -> io::Result<()> {
        Ok(())
    }

    fn check_finished(&mut self, record: &CheckRecord) -> io::Result<()> {
        match &record.outcome {
            CheckOutcome::Passed => self.row(record.label, "passed", String::new()),
            CheckOutcome::Failed(failure) => {
                self.row(record.label, "failed", failure.to_string())
            }
        }
    }

    fn fatal(&mut self, error: &anyhow::Error) -> io::Result<()> {
        self.row("run", "aborted", format!("{:#}", error))
    }

    fn finish(&mut self, passed: bool) -> io::Result<()> {
        let outcome = if passed { "passed" } else { "failed" };
        self.row("overall", outcome, String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passed(label: &'static str) -> CheckRecord {
        CheckRecord {
            label,
            outcome: CheckOutcome::Passed,
        }
    }

    fn failed(label: &'static str) -> CheckRecord {
        CheckRecord {
            label,
            outcome: CheckOutcome::Failed(CheckFailure::TransactionCount {
                expected: 2,
                found: 1,
            }),
        }
    }

    #[test]
    fn report_verdict() {
        let mut report = Report::default();
        assert!(report.passed());

        report.records.push(passed("transaction list"));
        assert!(report.passed());
        assert_eq!(report.failure(), None);

        report.records.push(failed("first transaction"));
        assert!(!report.passed());
        assert!(matches!(
            report.failure(),
            Some(CheckFailure::TransactionCount { .. })
        ));
    }

    #[test]
    fn plain_terminal_output() {
        let mut renderer = TerminalRenderer::plain(Vec::new());
        renderer.check_started("transaction list").unwrap();
        renderer.check_finished(&passed("transaction list")).unwrap();
        renderer.check_started("first transaction").unwrap();
        renderer.check_finished(&failed("first transaction")).unwrap();
        renderer.finish(false).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            text,
            "Checking transaction list... success\n\
             Checking first transaction... failed\n  \
             expected 2 transactions, found 1\n\
             \n\
             Some checks failed.\n"
        );
    }

    #[test]
    fn fatal_prints_cause_chain() {
        let error = anyhow::anyhow!("connection refused").context("full node unreachable");
        let mut renderer = TerminalRenderer::plain(Vec::new());
        renderer.fatal(&error).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("full node unreachable"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn csv_rows() {
        let mut renderer = CsvRenderer::new(Vec::new());
        renderer.check_finished(&passed("transaction list")).unwrap();
        renderer.check_finished(&failed("first transaction")).unwrap();
        renderer.finish(false).unwrap();

        let text = String::from_utf8(renderer.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "check,outcome,detail\n\
             transaction list,passed,\n\
             first transaction,failed,\"expected 2 transactions, found 1\"\n\
             overall,failed,\n"
        );
    }
}

//! Result output
//!
//! Stdout is meant to be redirected to a file and analysed later, so it only
//! ever carries two kinds of lines: `#` comments and tab-separated results.

use crate::{
    error::Result,
    models::{ComparisonResult, Corpus, Run},
};
use std::io::Write;

/// Prefix of every non-result line
pub const COMMENT_PREFIX: &str = "#";

/// Turns comparison data into output lines (without trailing newline)
pub trait OutputFormatter: Send + Sync {
    /// Column header naming every corpus, written once per session
    fn format_session_header(&self, corpora: &[Corpus]) -> String;

    /// Description of one run's fixed parameters
    fn format_run_header(&self, run: &Run, repeat: u32) -> String;

    /// One query term and its per-corpus averages
    fn format_result(&self, result: &ComparisonResult) -> String;
}

/// Tab-separated output
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvFormatter;

impl OutputFormatter for TsvFormatter {
    fn format_session_header(&self, corpora: &[Corpus]) -> String {
        let mut line = format!("{} term", COMMENT_PREFIX);
        for corpus in corpora {
            line.push('\t');
            line.push_str(&corpus.url);
        }
        line
    }

    fn format_run_header(&self, run: &Run, repeat: u32) -> String {
        let params = run.describe_params();
        if params.is_empty() {
            format!("{} (repeat {})", COMMENT_PREFIX, repeat)
        } else {
            format!("{} {} (repeat {})", COMMENT_PREFIX, params, repeat)
        }
    }

    fn format_result(&self, result: &ComparisonResult) -> String {
        let mut line = result.term.clone();
        for average in &result.averages {
            line.push_str(&format!("\t{:.2}", average));
        }
        line
    }
}

/// Writes formatted lines to a sink, flushing after each so partial runs survive
pub struct OutputCoordinator<W: Write> {
    formatter: Box<dyn OutputFormatter>,
    out: W,
}

impl<W: Write> OutputCoordinator<W> {
    pub fn new(formatter: Box<dyn OutputFormatter>, out: W) -> Self {
        Self { formatter, out }
    }

    pub fn tsv(out: W) -> Self {
        Self::new(Box::new(TsvFormatter), out)
    }

    pub fn write_session_header(&mut self, corpora: &[Corpus]) -> Result<()> {
        let line = self.formatter.format_session_header(corpora);
        self.write_line(&line)
    }

    pub fn write_run_header(&mut self, run: &Run, repeat: u32) -> Result<()> {
        let line = self.formatter.format_run_header(run, repeat);
        self.write_line(&line)
    }

    pub fn write_result(&mut self, result: &ComparisonResult) -> Result<()> {
        let line = self.formatter.format_result(result);
        self.write_line(&line)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

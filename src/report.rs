use std::io::{self, Write};
use std::path::Path;

use crate::compare::{Outcome, TreeObserver};
use crate::config::ComparisonRequest;
use crate::diff::indent;

const MESSAGE_INDENT: &str = "    ";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &Outcome) {
        self.total += 1;
        if !outcome.is_success() {
            self.failed += 1;
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Console output of a batch run, optionally keeping a transcript.
pub struct Console<W: Write> {
    out: W,
    transcript: Option<String>,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            transcript: None,
        }
    }

    /// Like [`Console::new`], but also keeps everything written.
    pub fn recording(out: W) -> Self {
        Self {
            out,
            transcript: Some(String::new()),
        }
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        if let Some(transcript) = self.transcript.as_mut() {
            transcript.push_str(text);
            transcript.push('\n');
        }
        Ok(())
    }

    pub fn request_started(&mut self, request: &ComparisonRequest) -> io::Result<()> {
        self.line(&format!(
            "Comparing {} with {}",
            request.source.display(),
            request.dest.display()
        ))
    }

    pub fn request_finished(&mut self, outcome: &Outcome) -> io::Result<()> {
        match outcome {
            Outcome::Success => self.line("OK"),
            Outcome::Failure(messages) => {
                self.line("FAILURE")?;
                for message in messages {
                    self.line(&indent(message, MESSAGE_INDENT))?;
                }
                Ok(())
            }
        }
    }

    pub fn summary(&mut self, summary: &Summary) -> io::Result<()> {
        if summary.all_passed() {
            return Ok(());
        }
        self.line(&format!(
            "==== {} of {} comparisons FAILED ====",
            summary.failed, summary.total
        ))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> TreeObserver for Console<W> {
    fn file_started(&mut self, rel: &Path) -> io::Result<()> {
        self.line(&format!("  checking {}", rel.display()))
    }

    fn file_finished(&mut self, _rel: &Path, outcome: &Outcome) -> io::Result<()> {
        if outcome.is_success() {
            self.line("    OK")
        } else {
            self.line("    FAILURE")
        }
    }
}

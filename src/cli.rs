use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use encoding_rs::Encoding;
use glob::Pattern;

use crate::diff::DEFAULT_CONTEXT;
use crate::utils::{InvalidBytePolicy, TextDecoding};

/// Compare files, named regions or directory trees listed in a JSON batch.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file listing the comparisons to run
    pub config: PathBuf,

    /// Exit with an error if any comparison fails
    #[arg(short, long)]
    pub raise_on_errors: bool,

    /// Lines of context around each diff hunk
    #[arg(short = 'C', long, default_value_t = DEFAULT_CONTEXT)]
    pub context: usize,

    /// How to handle byte sequences that are invalid in the text encoding
    #[arg(long, value_enum, default_value_t = InvalidBytePolicy::Drop)]
    pub on_invalid_byte: InvalidBytePolicy,

    /// Text encoding label (e.g. utf-8, windows-1252)
    #[arg(long, default_value = "utf-8")]
    pub encoding: String,

    /// Normalize EOL (CRLF/LF) before text comparison
    #[arg(short = 'E', long)]
    pub normalize_eol: bool,

    /// Glob patterns to skip during directory comparison (can be repeated or comma separated)
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    pub ignore: Vec<String>,

    /// Also write everything printed to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub decoding: TextDecoding,
    pub context: usize,
    pub ignore_patterns: Vec<Pattern>,
    pub raise_on_errors: bool,
    pub report: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            decoding: TextDecoding::default(),
            context: DEFAULT_CONTEXT,
            ignore_patterns: Vec::new(),
            raise_on_errors: false,
            report: None,
        }
    }
}

pub fn build_options(args: &Args) -> Result<Options> {
    let patterns = args
        .ignore
        .iter()
        .map(|s| Pattern::new(s).with_context(|| format!("Invalid glob pattern: {s}")))
        .collect::<Result<Vec<_>>>()?;

    let encoding = Encoding::for_label(args.encoding.as_bytes())
        .with_context(|| format!("Unknown text encoding: {}", args.encoding))?;

    Ok(Options {
        decoding: TextDecoding {
            encoding,
            on_invalid: args.on_invalid_byte,
            normalize_eol: args.normalize_eol,
        },
        context: args.context,
        ignore_patterns: patterns,
        raise_on_errors: args.raise_on_errors,
        report: args.report.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["regiondiff", "batch.json"]).unwrap();
        let opts = build_options(&args).unwrap();
        assert_eq!(args.config, PathBuf::from("batch.json"));
        assert!(!opts.raise_on_errors);
        assert_eq!(opts.context, 3);
        assert_eq!(opts.decoding.on_invalid, InvalidBytePolicy::Drop);
        assert_eq!(opts.decoding.encoding, encoding_rs::UTF_8);
        assert!(opts.ignore_patterns.is_empty());
    }

    #[test]
    fn flags() {
        let args = Args::try_parse_from([
            "regiondiff",
            "batch.json",
            "-r",
            "--on-invalid-byte",
            "error",
            "--encoding",
            "latin1",
            "-i",
            "*.pyc,.git",
        ])
        .unwrap();
        let opts = build_options(&args).unwrap();
        assert!(opts.raise_on_errors);
        assert_eq!(opts.decoding.on_invalid, InvalidBytePolicy::Error);
        assert_eq!(opts.decoding.encoding, encoding_rs::WINDOWS_1252);
        assert_eq!(opts.ignore_patterns.len(), 2);
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let args = Args::try_parse_from(["regiondiff", "--encoding", "klingon", "b.json"]).unwrap();
        assert!(build_options(&args).is_err());
    }
}

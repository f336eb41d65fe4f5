use std::io;
use std::ops::Range;
use std::path::Path;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::cli::Options;
use crate::config::{ComparisonRequest, RegionPair};
use crate::diff::{indent, unified_diff};
use crate::error::{Error, Result};
use crate::region::{extract_regions, MarkerSyntax, RegionMap};
use crate::scanner::scan_files;
use crate::utils::{describe_file, file_bytes_equal, is_probably_binary, read_text};

const DETAIL_INDENT: &str = "  ";

/// Result of one comparison: success, or the diagnostics explaining why not.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(Vec<String>),
}

impl Outcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure(vec![message.into()])
    }

    pub fn from_messages(messages: Vec<String>) -> Self {
        if messages.is_empty() {
            Outcome::Success
        } else {
            Outcome::Failure(messages)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn messages(&self) -> &[String] {
        match self {
            Outcome::Success => &[],
            Outcome::Failure(messages) => messages,
        }
    }
}

/// Hooks called around each file of a directory comparison.
pub trait TreeObserver {
    fn file_started(&mut self, _rel: &Path) -> io::Result<()> {
        Ok(())
    }

    fn file_finished(&mut self, _rel: &Path, _outcome: &Outcome) -> io::Result<()> {
        Ok(())
    }
}

/// Observer that ignores progress.
pub struct Quiet;

impl TreeObserver for Quiet {}

fn recover(result: Result<Outcome>) -> Result<Outcome> {
    match result {
        Err(e) if e.is_recoverable() => Ok(Outcome::failure(e.to_string())),
        other => other,
    }
}

fn sniff(path: &Path, opts: &Options) -> Result<bool> {
    let binary = is_probably_binary(path, &opts.decoding).map_err(|e| Error::read(path, e))?;
    debug!(path = %path.display(), binary, "classified");
    Ok(binary)
}

/// Compares the whole content of two files.
pub fn compare_total(source: &Path, dest: &Path, opts: &Options) -> Result<Outcome> {
    match (sniff(source, opts)?, sniff(dest, opts)?) {
        (true, false) => Ok(Outcome::failure(format!(
            "source is binary but destination is text: {} vs {}",
            source.display(),
            dest.display()
        ))),
        (false, true) => Ok(Outcome::failure(format!(
            "destination is binary but source is text: {} vs {}",
            source.display(),
            dest.display()
        ))),
        (true, true) => {
            if file_bytes_equal(source, dest).map_err(|e| Error::read(source, e))? {
                return Ok(Outcome::Success);
            }
            let source_meta = describe_file(source).map_err(|e| Error::read(source, e))?;
            let dest_meta = describe_file(dest).map_err(|e| Error::read(dest, e))?;
            Ok(Outcome::failure(format!(
                "binary contents differ\n{DETAIL_INDENT}source: {source_meta}\n{DETAIL_INDENT}dest:   {dest_meta}"
            )))
        }
        (false, false) => {
            let source_text = read_text(source, &opts.decoding)?;
            let dest_text = read_text(dest, &opts.decoding)?;
            let diff = unified_diff(
                &source_text,
                &dest_text,
                &source.display().to_string(),
                &dest.display().to_string(),
                opts.context,
            );
            if diff.is_empty() {
                Ok(Outcome::Success)
            } else {
                Ok(Outcome::failure(format!(
                    "contents differ:\n{}",
                    indent(&diff, DETAIL_INDENT)
                )))
            }
        }
    }
}

fn load_regions(
    path: &Path,
    marker: Option<&MarkerSyntax>,
    opts: &Options,
) -> Result<(String, RegionMap)> {
    let text = read_text(path, &opts.decoding)?;
    let syntax = marker.unwrap_or_else(|| MarkerSyntax::for_path(path));
    let regions = extract_regions(&text, syntax).map_err(|source| Error::UnbalancedRegions {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), regions = regions.len(), "loaded regions");
    Ok((text, regions))
}

fn lookup(
    regions: &RegionMap,
    name: &str,
    side: &str,
    path: &Path,
) -> std::result::Result<Range<usize>, String> {
    if let Some(span) = regions.get(name) {
        return Ok(span.clone());
    }
    let available = if regions.is_empty() {
        "(none)".to_string()
    } else {
        regions.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
    };
    Err(format!(
        "region {name:?} not found in {side} {}; available regions: {available}",
        path.display()
    ))
}

/// `[start..end)` of a region in characters, as printed in diff labels.
fn char_span(text: &str, span: &Range<usize>) -> String {
    let start = text[..span.start].chars().count();
    let end = start + text[span.clone()].chars().count();
    format!("[{start}..{end})")
}

/// Compares named regions of two files, pair by pair.
///
/// A pair whose region is missing on either side fails on its own; the
/// remaining pairs are still compared.
pub fn compare_regions(
    source: &Path,
    dest: &Path,
    pairs: &[RegionPair],
    marker: Option<&MarkerSyntax>,
    opts: &Options,
) -> Result<Outcome> {
    let (source_text, source_regions) = load_regions(source, marker, opts)?;
    let (dest_text, dest_regions) = load_regions(dest, marker, opts)?;

    let mut messages = Vec::new();
    for pair in pairs {
        let found_source = lookup(&source_regions, &pair.in_source, "source", source);
        let found_dest = lookup(&dest_regions, &pair.in_dest, "destination", dest);
        let (source_span, dest_span) = match (found_source, found_dest) {
            (Ok(a), Ok(b)) => (a, b),
            (a, b) => {
                messages.extend(a.err());
                messages.extend(b.err());
                continue;
            }
        };

        let label_a = format!(
            "{} in {} {}",
            pair.in_source,
            source.display(),
            char_span(&source_text, &source_span)
        );
        let label_b = format!(
            "{} in {} {}",
            pair.in_dest,
            dest.display(),
            char_span(&dest_text, &dest_span)
        );
        let diff = unified_diff(
            &source_text[source_span],
            &dest_text[dest_span],
            &label_a,
            &label_b,
            opts.context,
        );
        if !diff.is_empty() {
            messages.push(format!(
                "region {:?} differs from region {:?}:\n{}",
                pair.in_source,
                pair.in_dest,
                indent(&diff, DETAIL_INDENT)
            ));
        }
    }
    Ok(Outcome::from_messages(messages))
}

/// Compares every file under `source_dir` (optionally filtered by base name)
/// with the file at the same relative path under `dest_dir`.
pub fn compare_tree(
    source_dir: &Path,
    dest_dir: &Path,
    file_regex: Option<&Regex>,
    opts: &Options,
    observer: &mut dyn TreeObserver,
) -> Result<Outcome> {
    let scan = scan_files(source_dir, file_regex, &opts.ignore_patterns);
    let mut messages: Vec<String> = scan
        .errors
        .iter()
        .map(|e| format!("unreadable entry: {e}"))
        .collect();

    for (rel, abs) in &scan.files {
        observer.file_started(rel)?;
        let dest_file = dest_dir.join(rel);
        let outcome = if dest_file.is_file() {
            recover(compare_total(abs, &dest_file, opts))?
        } else {
            Outcome::failure(format!("no destination file: {}", dest_file.display()))
        };
        observer.file_finished(rel, &outcome)?;
        if !outcome.is_success() {
            messages.push(format!("{}: {}", rel.display(), outcome.messages().join("\n")));
        }
    }
    Ok(Outcome::from_messages(messages))
}

/// Runs one request: existence checks, then the file, region or tree mode.
pub fn process_request(
    request: &ComparisonRequest,
    opts: &Options,
    observer: &mut dyn TreeObserver,
) -> Result<Outcome> {
    let source = request.source.as_path();
    let dest = request.dest.as_path();
    info!(source = %source.display(), dest = %dest.display(), "comparing");

    let mut missing = Vec::new();
    if !source.exists() {
        missing.push(format!("source path does not exist: {}", source.display()));
    }
    if !dest.exists() {
        missing.push(format!("destination path does not exist: {}", dest.display()));
    }
    if !missing.is_empty() {
        return Ok(Outcome::Failure(missing));
    }

    let result = if source.is_file() && dest.is_file() {
        if request.file_regex.is_some() {
            warn!(source = %source.display(), "file_regex only applies to directories; ignored");
        }
        if request.regions.is_empty() {
            compare_total(source, dest, opts)
        } else {
            compare_regions(source, dest, &request.regions, request.marker.as_ref(), opts)
        }
    } else if source.is_dir() && dest.is_dir() {
        if !request.regions.is_empty() || request.marker.is_some() {
            warn!(source = %source.display(), "regions only apply to files; ignored");
        }
        compare_tree(source, dest, request.file_regex.as_ref(), opts, observer)
    } else {
        return Err(Error::MixedPathKinds {
            source_path: source.to_path_buf(),
            dest_path: dest.to_path_buf(),
        });
    };

    let outcome = recover(result)?;
    info!(success = outcome.is_success(), "compared");
    Ok(outcome)
}

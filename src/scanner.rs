use std::path::{Path, PathBuf};

use glob::Pattern;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct ScanResult {
    pub files: Vec<(PathBuf, PathBuf)>, // (rel, abs), sorted by rel
    pub errors: Vec<String>,
}

fn is_ignored(rel: &Path, patterns: &[Pattern]) -> bool {
    let name = rel.file_name().and_then(|s| s.to_str()).unwrap_or("");
    let s_rel = rel.to_string_lossy().replace('\\', "/");
    patterns
        .iter()
        .any(|pat| pat.matches(&s_rel) || pat.matches(name))
}

fn name_matches(path: &Path, name_filter: Option<&Regex>) -> bool {
    let Some(re) = name_filter else {
        return true;
    };
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    re.is_match(&name)
}

/// Lists every regular file under `root`, in file-name order.
///
/// `name_filter` is applied to each file's base name; `ignore` globs prune
/// whole subtrees as well as single files.
pub fn scan_files(root: &Path, name_filter: Option<&Regex>, ignore: &[Pattern]) -> ScanResult {
    let mut files = Vec::new();
    let mut errors = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_entry(|e| match e.path().strip_prefix(root) {
        Ok(rel) if rel != Path::new("") => !is_ignored(rel, ignore),
        _ => true,
    }) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(root = %root.display(), error = %err, "unreadable entry during scan");
                errors.push(err.to_string());
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || !name_matches(path, name_filter) {
            continue;
        }
        if let Ok(rel) = path.strip_prefix(root) {
            files.push((rel.to_path_buf(), path.to_path_buf()));
        }
    }

    debug!(root = %root.display(), files = files.len(), "scanned directory");
    ScanResult { files, errors }
}

//! Named region extraction.
//!
//! A region is the text between a start marker line such as `# region NAME`
//! and its matching `# endregion` line. Markers may nest; nesting is resolved
//! with [`pair_intervals_ordered`].

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::pairing::{pair_intervals_ordered, PairingError};

/// Region name -> byte span of its body inside the decoded text.
pub type RegionMap = BTreeMap<String, Range<usize>>;

/// Comment syntax used to recognise region marker lines.
#[derive(Debug, Clone)]
pub struct MarkerSyntax {
    open: String,
    close: Option<String>,
    start: Regex,
    end: Regex,
}

impl MarkerSyntax {
    pub fn new(open: &str, close: Option<&str>) -> Result<Self, regex::Error> {
        let open_re = regex::escape(open);
        let start = Regex::new(&format!(
            r"(?m)^[ \t]*{open_re}[ \t]*region[ \t]+(?P<name>[^\n]*)(?:\n|$)"
        ))?;
        let end = Regex::new(&format!(r"(?m)^[ \t]*{open_re}[ \t]*endregion\b"))?;
        Ok(Self {
            open: open.to_string(),
            close: close.map(str::to_string),
            start,
            end,
        })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    /// Marker syntax for a file, chosen from its extension.
    pub fn for_path(path: &Path) -> &'static MarkerSyntax {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        // C# spells its regions with the preprocessor `#region`.
        let slash_exts = [
            "c", "h", "cpp", "hpp", "cc", "java", "js", "ts", "tsx", "swift", "go", "kt", "kts",
            "scala", "dart", "php", "rs",
        ];
        let dash_exts = ["sql", "hs", "lua"];
        let percent_exts = ["tex", "m"];
        let semicolon_exts = ["ini"];
        let html_exts = ["html", "htm", "xml", "xhtml", "svg"];
        let cblock_exts = ["css", "scss", "less"];

        let ext = ext.as_str();
        if slash_exts.contains(&ext) {
            &*SLASH
        } else if dash_exts.contains(&ext) {
            &*DASH
        } else if percent_exts.contains(&ext) {
            &*PERCENT
        } else if semicolon_exts.contains(&ext) {
            &*SEMICOLON
        } else if html_exts.contains(&ext) {
            &*HTML
        } else if cblock_exts.contains(&ext) {
            &*CBLOCK
        } else {
            &*HASH
        }
    }

    fn region_name(&self, caps: &Captures<'_>) -> String {
        let raw = caps.name("name").map_or("", |m| m.as_str()).trim();
        let name = match &self.close {
            Some(close) => raw.strip_suffix(close.as_str()).unwrap_or(raw).trim_end(),
            None => raw,
        };
        name.to_string()
    }
}

fn builtin(open: &str, close: Option<&str>) -> MarkerSyntax {
    MarkerSyntax::new(open, close).expect("escaped marker pattern always compiles")
}

pub static HASH: LazyLock<MarkerSyntax> = LazyLock::new(|| builtin("#", None));
pub static SLASH: LazyLock<MarkerSyntax> = LazyLock::new(|| builtin("//", None));
pub static DASH: LazyLock<MarkerSyntax> = LazyLock::new(|| builtin("--", None));
pub static PERCENT: LazyLock<MarkerSyntax> = LazyLock::new(|| builtin("%", None));
pub static SEMICOLON: LazyLock<MarkerSyntax> = LazyLock::new(|| builtin(";", None));
pub static HTML: LazyLock<MarkerSyntax> = LazyLock::new(|| builtin("<!--", Some("-->")));
pub static CBLOCK: LazyLock<MarkerSyntax> = LazyLock::new(|| builtin("/*", Some("*/")));

impl Default for MarkerSyntax {
    fn default() -> Self {
        HASH.clone()
    }
}

/// Finds every named region in `text`.
///
/// A region body starts right after the newline of its start marker line
/// and ends at the first byte of the matching end marker line. Text with no
/// start markers or no end markers yields an empty map. When a name is used
/// more than once, the region whose end marker comes last wins, so an outer
/// region beats a nested one of the same name.
pub fn extract_regions(text: &str, syntax: &MarkerSyntax) -> Result<RegionMap, PairingError> {
    let mut names: HashMap<usize, String> = HashMap::new();
    let mut starts = Vec::new();
    for caps in syntax.start.captures_iter(text) {
        let Some(marker) = caps.get(0) else {
            continue;
        };
        let offset = marker.end();
        names.insert(offset, syntax.region_name(&caps));
        starts.push(offset);
    }

    let ends: Vec<usize> = syntax.end.find_iter(text).map(|m| m.start()).collect();

    if starts.is_empty() || ends.is_empty() {
        debug!(
            starts = starts.len(),
            ends = ends.len(),
            "no complete region markers"
        );
        return Ok(RegionMap::new());
    }

    let pairs = pair_intervals_ordered(&starts, &ends)?;

    let mut regions = RegionMap::new();
    for (start, end) in pairs {
        let name = names.remove(&start).unwrap_or_default();
        if let Some(previous) = regions.insert(name.clone(), start..end) {
            warn!(region = %name, ?previous, "duplicate region name, keeping the one closed later");
        }
    }
    debug!(count = regions.len(), "extracted regions");
    Ok(regions)
}

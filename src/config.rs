//! Batch configuration: a JSON array of comparison requests.
//!
//! ```json
//! [
//!   { "source": "a/fec.py", "dest": "b/fec.py",
//!     "regions": [{ "in_source": "UTILS", "in_dest": "HELPERS" }] },
//!   { "source": "a/pkg", "dest": "b/pkg", "file_regex": "test_" }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::region::MarkerSyntax;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionPair {
    pub in_source: String,
    pub in_dest: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRequest {
    source: PathBuf,
    dest: PathBuf,
    #[serde(default)]
    regions: Vec<RegionPair>,
    file_regex: Option<String>,
    marker: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ComparisonRequest {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub regions: Vec<RegionPair>,
    /// Base-name filter for directory mode, anchored at the start of the name.
    pub file_regex: Option<Regex>,
    /// Overrides the extension-based region marker syntax for both files.
    pub marker: Option<MarkerSyntax>,
}

impl ComparisonRequest {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            regions: Vec::new(),
            file_regex: None,
            marker: None,
        }
    }

    pub fn with_regions<I, S>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        self.regions = pairs
            .into_iter()
            .map(|(a, b)| RegionPair {
                in_source: a.into(),
                in_dest: b.into(),
            })
            .collect();
        self
    }

    pub fn with_file_regex(mut self, pattern: &str) -> Result<Self> {
        self.file_regex = Some(anchored_regex(pattern)?);
        Ok(self)
    }

    pub fn with_marker(mut self, open: &str) -> Result<Self> {
        self.marker = Some(marker_syntax(open)?);
        Ok(self)
    }

    fn from_raw(raw: RawRequest) -> Result<Self> {
        Ok(Self {
            source: raw.source,
            dest: raw.dest,
            regions: raw.regions,
            file_regex: raw.file_regex.as_deref().map(anchored_regex).transpose()?,
            marker: raw.marker.as_deref().map(marker_syntax).transpose()?,
        })
    }
}

fn anchored_regex(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})")).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn marker_syntax(open: &str) -> Result<MarkerSyntax> {
    MarkerSyntax::new(open, None).map_err(|source| Error::InvalidPattern {
        pattern: open.to_string(),
        source,
    })
}

pub fn parse_requests(json: &str, origin: &Path) -> Result<Vec<ComparisonRequest>> {
    let raw: Vec<RawRequest> = serde_json::from_str(json).map_err(|source| Error::ConfigParse {
        path: origin.to_path_buf(),
        source,
    })?;
    raw.into_iter().map(ComparisonRequest::from_raw).collect()
}

pub fn load_requests(path: &Path) -> Result<Vec<ComparisonRequest>> {
    let json = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_requests(&json, path)
}

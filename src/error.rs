use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::pairing::PairingError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path:?}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("cannot compare {source_path:?} with {dest_path:?}: one is a file and the other a directory")]
    MixedPathKinds {
        source_path: PathBuf,
        dest_path: PathBuf,
    },

    #[error("unbalanced region markers in {path:?}: {source}")]
    UnbalancedRegions { path: PathBuf, source: PairingError },

    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("{path:?} is not valid {encoding} text: malformed sequence near byte {offset}")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
        offset: usize,
    },

    #[error("failed to write report {path:?}: {source}")]
    Report { path: PathBuf, source: io::Error },

    #[error("console output failed: {0}")]
    Console(#[from] io::Error),
}

impl Error {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Errors caused by the data under comparison rather than by the run
    /// itself. These are reported against the item and the batch goes on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Read { .. } | Error::Decode { .. })
    }
}

//
// lib.rs
// RegionDiff-rs
//
// Library entry that re-exports modules so the binary and the integration tests can reach region extraction, the comparison engine and the batch driver.
//
// Thales Matheus Mendonça Santos - November 2025
//
// Public crate interface: re-export modules used by the binary and tests.
pub mod cli;
pub mod compare;
pub mod config;
pub mod diff;
pub mod driver;
pub mod error;
pub mod logging;
pub mod pairing;
pub mod region;
pub mod report;
pub mod scanner;
pub mod utils;

pub use cli::{build_options, Args, Options};
pub use compare::{
    compare_regions, compare_total, compare_tree, process_request, Outcome, Quiet, TreeObserver,
};
pub use config::{load_requests, ComparisonRequest, RegionPair};
pub use diff::unified_diff;
pub use driver::{run_batch, run_requests};
pub use error::{Error, Result};
pub use pairing::{pair_intervals, pair_intervals_ordered, PairingError};
pub use region::{extract_regions, MarkerSyntax, RegionMap};
pub use report::{Console, Summary};
pub use scanner::{scan_files, ScanResult};

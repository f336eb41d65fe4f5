use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::cli::Options;
use crate::compare::process_request;
use crate::config::{load_requests, ComparisonRequest};
use crate::error::{Error, Result};
use crate::report::{Console, Summary};
use crate::utils::write_text_atomic;

/// Runs every request in order. A failing comparison is printed and counted;
/// only fatal errors stop the batch.
pub fn run_requests<W: Write>(
    requests: &[ComparisonRequest],
    opts: &Options,
    console: &mut Console<W>,
) -> Result<Summary> {
    let mut summary = Summary::default();
    for request in requests {
        console.request_started(request)?;
        let outcome = process_request(request, opts, console)?;
        console.request_finished(&outcome)?;
        summary.record(&outcome);
    }
    console.summary(&summary)?;
    console.flush()?;
    info!(total = summary.total, failed = summary.failed, "batch finished");
    Ok(summary)
}

/// Loads the batch file, prints every comparison to stdout and writes the
/// transcript to `opts.report` when one is requested.
pub fn run_batch(config: &Path, opts: &Options) -> Result<Summary> {
    let requests = load_requests(config)?;
    let stdout = io::stdout();
    let mut console = match opts.report {
        Some(_) => Console::recording(stdout.lock()),
        None => Console::new(stdout.lock()),
    };

    let summary = run_requests(&requests, opts, &mut console)?;

    if let Some(path) = &opts.report {
        let transcript = console.transcript().unwrap_or_default();
        write_text_atomic(path, transcript).map_err(|source| Error::Report {
            path: path.clone(),
            source,
        })?;
    }
    Ok(summary)
}

use anyhow::{Context, Result};
use clap::Parser;

use regiondiff::{build_options, logging, run_batch, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init()?;

    let opts = build_options(&args)?;
    let summary = run_batch(&args.config, &opts)
        .with_context(|| format!("Failed to run batch {:?}", args.config))?;

    if opts.raise_on_errors && !summary.all_passed() {
        anyhow::bail!("{} of {} comparisons failed", summary.failed, summary.total);
    }
    Ok(())
}

//! Split command - write each page as its own file.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;

use pdfops_core::ops::split;

/// Arguments for the split command.
#[derive(Args)]
pub struct SplitArgs {
    /// Input PDF file
    input: PathBuf,

    /// Directory for the single-page output files
    output_dir: PathBuf,
}

pub fn run(args: SplitArgs, _config_path: Option<&str>) -> anyhow::Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Splitting {}", args.input.display()));

    let result = split(&args.input, &args.output_dir);
    pb.finish_and_clear();

    match result {
        Ok(written) => {
            println!(
                "{} Wrote {} page file(s) to {}",
                style("✓").green(),
                written,
                args.output_dir.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("failed to split {}: {}", args.input.display(), e);
            Err(e.into())
        }
    }
}

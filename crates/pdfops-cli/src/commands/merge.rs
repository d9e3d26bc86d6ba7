//! Merge command - concatenate several PDF files into one.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::error;

use pdfops_core::ops::merge;

/// Arguments for the merge command.
#[derive(Args)]
pub struct MergeArgs {
    /// Input PDF files, then the output file last
    #[arg(required = true, num_args = 2.., value_name = "FILES")]
    files: Vec<PathBuf>,
}

pub fn run(args: MergeArgs, _config_path: Option<&str>) -> anyhow::Result<()> {
    let (output, inputs) = args
        .files
        .split_last()
        .expect("clap guarantees at least two paths");

    match merge(inputs, output) {
        Ok(summary) => {
            if summary.skipped > 0 {
                println!(
                    "{} {} input file(s) were missing and skipped",
                    style("!").yellow(),
                    summary.skipped
                );
            }
            println!(
                "{} Merged {} pages into {}",
                style("✓").green(),
                summary.pages,
                output.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("failed to merge PDFs: {}", e);
            Err(e.into())
        }
    }
}

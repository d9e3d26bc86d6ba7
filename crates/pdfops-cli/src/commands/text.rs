//! Text command - extract a document's plain text.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{error, info};

use pdfops_core::ops::extract_text;

/// Arguments for the text command.
#[derive(Args)]
pub struct TextArgs {
    /// Input PDF file
    input: PathBuf,

    /// Output text file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: TextArgs, _config_path: Option<&str>) -> anyhow::Result<()> {
    let text = match extract_text(&args.input) {
        Ok(text) => text,
        Err(e) => {
            error!("failed to extract text from {}: {}", args.input.display(), e);
            return Err(e.into());
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &text)?;
            info!("text saved to {}", path.display());
            println!("{} Text written to {}", style("✓").green(), path.display());
        }
        None => {
            println!();
            println!("Extracted text:");
            println!("{}", "-".repeat(40));
            println!("{}", text);
        }
    }

    Ok(())
}

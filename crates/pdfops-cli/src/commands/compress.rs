//! Compress command - recompress embedded images to shrink a PDF.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;

use pdfops_core::ops::{Quality, compress};

use super::load_config;

/// Arguments for the compress command.
#[derive(Args)]
pub struct CompressArgs {
    /// Input PDF file
    input: PathBuf,

    /// Output PDF file
    output: PathBuf,

    /// Compression quality: low, medium or high (anything else means
    /// medium)
    #[arg(short, long)]
    quality: Option<String>,
}

pub fn run(args: CompressArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let quality = match &args.quality {
        Some(name) => Quality::from_name(name),
        None => config.compress.default_quality,
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Compressing {}", args.input.display()));

    let result = compress(&args.input, &args.output, quality);
    pb.finish_and_clear();

    match result {
        Ok(stats) => {
            println!(
                "{} Compressed {} -> {}",
                style("✓").green(),
                args.input.display(),
                args.output.display()
            );
            println!(
                "  {:.2} KB -> {:.2} KB ({:.1}% saved)",
                stats.original_bytes as f64 / 1024.0,
                stats.compressed_bytes as f64 / 1024.0,
                stats.saved_percent()
            );
            Ok(())
        }
        Err(e) => {
            error!("failed to compress {}: {}", args.input.display(), e);
            Err(e.into())
        }
    }
}

//! Images command - extract embedded images to a directory.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::error;

use pdfops_core::ops::extract_images;

use super::load_config;

/// Arguments for the images command.
#[derive(Args)]
pub struct ImagesArgs {
    /// Input PDF file
    input: PathBuf,

    /// Directory for the extracted image files
    output_dir: PathBuf,
}

pub fn run(args: ImagesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    match extract_images(&args.input, &args.output_dir, config.images.min_size) {
        Ok(count) => {
            println!(
                "{} Extracted {} image(s) to {}",
                style("✓").green(),
                count,
                args.output_dir.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("failed to extract images from {}: {}", args.input.display(), e);
            Err(e.into())
        }
    }
}

//! Command-line PDF toolbox: merge, split, text, images, compress.

mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{compress, images, merge, split, text};

/// PDF toolbox - merge, split, and extract content from PDF files
#[derive(Parser)]
#[command(name = "pdfops")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge several PDF files into one
    Merge(merge::MergeArgs),

    /// Split a PDF into single-page files
    Split(split::SplitArgs),

    /// Extract text from a PDF
    Text(text::TextArgs),

    /// Extract embedded images from a PDF
    Images(images::ImagesArgs),

    /// Recompress embedded images to shrink a PDF
    Compress(compress::CompressArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Progress is logged at INFO; -v flags open up library internals.
    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Merge(args)) => merge::run(args, cli.config.as_deref()),
        Some(Commands::Split(args)) => split::run(args, cli.config.as_deref()),
        Some(Commands::Text(args)) => text::run(args, cli.config.as_deref()),
        Some(Commands::Images(args)) => images::run(args, cli.config.as_deref()),
        Some(Commands::Compress(args)) => compress::run(args, cli.config.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

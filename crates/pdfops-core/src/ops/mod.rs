//! The document operation set.
//!
//! Five independent, stateless operations over PDF files. Each one
//! opens its own input, runs a single linear pass, writes its output,
//! and reports through its `Result` and log records only. No operation
//! depends on another.

mod compress;
mod images;
mod merge;
mod split;
mod text;

pub use compress::{CompressionStats, Quality, compress};
pub use images::extract_images;
pub use merge::{MergeSummary, merge};
pub use split::split;
pub use text::extract_text;

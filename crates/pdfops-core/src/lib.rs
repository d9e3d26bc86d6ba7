//! Core library for the pdfops PDF toolbox.
//!
//! This crate provides:
//! - A document handle over lopdf with embedded-image discovery
//! - The five document operations: merge, split, text extraction,
//!   image extraction, and image recompression
//! - Configuration and error types shared with the CLI

pub mod config;
pub mod document;
pub mod error;
pub mod ops;

mod copy;

pub use config::OpsConfig;
pub use document::{EmbeddedImage, ImageEncoding, PdfFile};
pub use error::{OpsError, PdfError, Result};
pub use ops::{
    CompressionStats, MergeSummary, Quality, compress, extract_images, extract_text, merge, split,
};

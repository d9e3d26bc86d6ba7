//! Merge: concatenate the pages of several PDF files into one.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::copy::DocumentBuilder;
use crate::document::PdfFile;
use crate::error::{PdfError, Result};

/// Outcome of a merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Pages in the output document.
    pub pages: usize,
    /// Input paths skipped because no file was found.
    pub skipped: usize,
}

/// Merge `inputs`, in order, into a single document at `output`.
///
/// A missing input file is logged and skipped without failing the run.
/// Any other failure aborts the whole operation. With nothing readable
/// the output is still a valid, zero-page document.
pub fn merge(inputs: &[PathBuf], output: &Path) -> Result<MergeSummary> {
    let mut builder = DocumentBuilder::new();
    let mut skipped = 0usize;
    let mut pages = 0usize;

    for path in inputs {
        if !path.exists() {
            error!("file not found: {}", path.display());
            skipped += 1;
            continue;
        }
        let source = PdfFile::open(path)?;
        pages += builder.append_document(source.document())?;
    }

    let mut merged = builder.finish();
    merged.compress();
    merged
        .save(output)
        .map_err(|e| PdfError::Write(e.to_string()))?;

    info!("merged {} pages into {}", pages, output.display());
    Ok(MergeSummary { pages, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::fixtures::{save_into, text_document};
    use lopdf::Document;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn merges_pages_in_input_order() {
        let dir = TempDir::new().unwrap();
        let a = save_into(&mut text_document(&["first", "second"]), dir.path(), "a.pdf");
        let b = save_into(&mut text_document(&["third"]), dir.path(), "b.pdf");
        let out = dir.path().join("merged.pdf");

        let summary = merge(&[a, b], &out).unwrap();

        assert_eq!(summary.pages, 3);
        assert_eq!(summary.skipped, 0);
        assert_eq!(Document::load(&out).unwrap().get_pages().len(), 3);

        let text = crate::ops::extract_text(&out).unwrap();
        let first = text.find("first").unwrap();
        let third = text.find("third").unwrap();
        assert!(first < third);
    }

    #[test]
    fn missing_input_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let a = save_into(&mut text_document(&["only"]), dir.path(), "a.pdf");
        let missing = dir.path().join("missing.pdf");
        let out = dir.path().join("merged.pdf");

        let summary = merge(&[missing, a], &out).unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(Document::load(&out).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn empty_input_list_still_writes_a_document() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("merged.pdf");

        let summary = merge(&[], &out).unwrap();

        assert_eq!(summary.pages, 0);
        assert_eq!(Document::load(&out).unwrap().get_pages().len(), 0);
    }
}

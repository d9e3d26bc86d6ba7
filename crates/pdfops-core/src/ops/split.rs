//! Split: write each page of a document as its own single-page file.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::copy::DocumentBuilder;
use crate::document::PdfFile;
use crate::error::{PdfError, Result};

/// Split `input` into one `page_{i}.pdf` per page inside `output_dir`,
/// creating the directory if absent.
///
/// Returns the number of files written; a document without pages yields
/// zero files and still succeeds.
pub fn split(input: &Path, output_dir: &Path) -> Result<usize> {
    fs::create_dir_all(output_dir)?;

    let pdf = PdfFile::open(input)?;
    let pages = pdf.pages();
    let total = pages.len();

    for (index, (_, page_id)) in pages.iter().enumerate() {
        let mut builder = DocumentBuilder::new();
        builder.append_page(pdf.document(), *page_id)?;
        let mut single = builder.finish();

        let path = output_dir.join(format!("page_{}.pdf", index + 1));
        single
            .save(&path)
            .map_err(|e| PdfError::Write(e.to_string()))?;
        info!("wrote page {} of {}: {}", index + 1, total, path.display());
    }

    Ok(total)
}

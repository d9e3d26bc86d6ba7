//! Text extraction: the document's plain text, page by page.

use std::path::Path;

use tracing::debug;

use crate::document::PdfFile;
use crate::error::Result;

/// Extract the document's plain text, pages joined by a blank line, in
/// page order.
pub fn extract_text(input: &Path) -> Result<String> {
    let pdf = PdfFile::open(input)?;
    let pages = pdf.text_by_pages()?;
    debug!("extracted text from {} pages", pages.len());
    Ok(pages.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::fixtures::{save_into, text_document};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn extracts_pages_in_order() {
        let dir = TempDir::new().unwrap();
        let input = save_into(
            &mut text_document(&["Alpha page", "Beta page"]),
            dir.path(),
            "in.pdf",
        );

        let text = extract_text(&input).unwrap();

        assert!(text.contains("Alpha"));
        assert!(text.contains("Beta"));
        assert!(text.find("Alpha").unwrap() < text.find("Beta").unwrap());
    }

    #[test]
    fn is_idempotent() {
        let dir = TempDir::new().unwrap();
        let input = save_into(&mut text_document(&["Same text"]), dir.path(), "in.pdf");

        assert_eq!(extract_text(&input).unwrap(), extract_text(&input).unwrap());
    }

    #[test]
    fn unreadable_input_fails() {
        let dir = TempDir::new().unwrap();
        assert!(extract_text(&dir.path().join("missing.pdf")).is_err());
    }
}

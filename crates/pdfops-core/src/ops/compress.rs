//! Compress: re-encode embedded images at lower quality and save an
//! optimized copy of the document.

use std::fs;
use std::path::Path;

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use lopdf::{Dictionary, Document, Object, Stream};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::document::{EmbeddedImage, PdfFile};
use crate::error::{OpsError, PdfError, Result};

/// Lossy re-encoding quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Strong compression, lowest fidelity.
    Low,
    /// Balanced compression.
    Medium,
    /// Light compression, highest fidelity.
    High,
}

impl Default for Quality {
    fn default() -> Self {
        Quality::Medium
    }
}

impl Quality {
    /// Parse a quality name; anything unrecognized falls back to
    /// medium instead of failing.
    pub fn from_name(name: &str) -> Self {
        match name {
            "low" => Quality::Low,
            "medium" => Quality::Medium,
            "high" => Quality::High,
            other => {
                warn!("unknown quality {:?}, using medium", other);
                Quality::Medium
            }
        }
    }

    /// JPEG encoder quality for this level.
    pub fn jpeg_quality(self) -> u8 {
        match self {
            Quality::Low => 30,
            Quality::Medium => 50,
            Quality::High => 70,
        }
    }
}

/// File sizes before and after compression, read back from the
/// filesystem rather than counted in memory.
#[derive(Debug, Clone, Copy)]
pub struct CompressionStats {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

impl CompressionStats {
    /// Bytes saved; negative when the output grew.
    pub fn saved_bytes(&self) -> i64 {
        self.original_bytes as i64 - self.compressed_bytes as i64
    }

    /// Percentage of the original size that was saved.
    pub fn saved_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.saved_bytes() as f64 / self.original_bytes as f64 * 100.0
    }
}

/// Re-encode every decodable embedded image of `input` at `quality` and
/// write an optimized copy of the document to `output`.
///
/// Images whose codec cannot be decoded are left in place unchanged.
/// Page count and order are preserved.
pub fn compress(input: &Path, output: &Path, quality: Quality) -> Result<CompressionStats> {
    let jpeg_quality = quality.jpeg_quality();
    let mut pdf = PdfFile::open(input)?;

    for (page_no, page_id) in pdf.pages() {
        let images = pdf.page_images(page_no, page_id);
        for image in images {
            if let Some((data, grayscale)) = reencode(&image, jpeg_quality)? {
                replace_image(pdf.document_mut(), &image, data, grayscale);
            }
        }
    }

    let doc = pdf.document_mut();
    let _ = doc.prune_objects();
    doc.renumber_objects();
    doc.compress();
    doc.save(output).map_err(|e| PdfError::Write(e.to_string()))?;

    let stats = CompressionStats {
        original_bytes: fs::metadata(input)?.len(),
        compressed_bytes: fs::metadata(output)?.len(),
    };
    info!("compressed PDF written to {}", output.display());
    info!("original size: {:.2} KB", stats.original_bytes as f64 / 1024.0);
    info!(
        "compressed size: {:.2} KB",
        stats.compressed_bytes as f64 / 1024.0
    );
    info!(
        "saved: {:.2} KB ({:.1}%)",
        stats.saved_bytes() as f64 / 1024.0,
        stats.saved_percent()
    );
    Ok(stats)
}

/// Decode one image and re-encode it as JPEG at `jpeg_quality`.
///
/// Returns `None` when the source cannot be decoded, leaving the
/// original object untouched. Alpha is flattened to RGB; grayscale
/// stays grayscale.
fn reencode(image: &EmbeddedImage, jpeg_quality: u8) -> Result<Option<(Vec<u8>, bool)>> {
    let decoded = match image.decode() {
        Ok(decoded) => decoded,
        Err(OpsError::Pdf(PdfError::UnsupportedImage(reason))) => {
            warn!("keeping image {} unchanged: {}", image.name, reason);
            return Ok(None);
        }
        Err(OpsError::Image(err)) => {
            warn!("keeping image {} unchanged: {}", image.name, err);
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    let grayscale = !decoded.color().has_color();
    let flattened = if grayscale {
        DynamicImage::ImageLuma8(decoded.to_luma8())
    } else {
        DynamicImage::ImageRgb8(decoded.to_rgb8())
    };

    let mut encoded = Vec::new();
    flattened.write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, jpeg_quality))?;
    Ok(Some((encoded, grayscale)))
}

/// Swap the image XObject's stream under its original object id. The
/// content stream placing the image is untouched, so it keeps its
/// position and size on the page.
fn replace_image(doc: &mut Document, image: &EmbeddedImage, data: Vec<u8>, grayscale: bool) {
    let mut dict = Dictionary::new();
    dict.set("Type", "XObject");
    dict.set("Subtype", "Image");
    dict.set("Width", image.width as i64);
    dict.set("Height", image.height as i64);
    dict.set(
        "ColorSpace",
        if grayscale { "DeviceGray" } else { "DeviceRGB" },
    );
    dict.set("BitsPerComponent", 8i64);
    dict.set("Filter", "DCTDecode");
    doc.objects.insert(image.id, Object::Stream(Stream::new(dict, data)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::fixtures::{gradient_jpeg, jpeg_document, save_into, text_document};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn quality_names_parse_with_medium_fallback() {
        assert_eq!(Quality::from_name("low"), Quality::Low);
        assert_eq!(Quality::from_name("medium"), Quality::Medium);
        assert_eq!(Quality::from_name("high"), Quality::High);
        assert_eq!(Quality::from_name("maximum"), Quality::Medium);
        assert_eq!(Quality::from_name(""), Quality::Medium);
    }

    #[test]
    fn quality_maps_to_encoder_settings() {
        assert_eq!(Quality::Low.jpeg_quality(), 30);
        assert_eq!(Quality::Medium.jpeg_quality(), 50);
        assert_eq!(Quality::High.jpeg_quality(), 70);
    }

    #[test]
    fn preserves_page_count_and_stays_loadable() {
        let dir = TempDir::new().unwrap();
        let jpeg = gradient_jpeg(64, 64);
        let input = save_into(&mut jpeg_document(&jpeg, 64, 64), dir.path(), "in.pdf");
        let output = dir.path().join("out.pdf");

        compress(&input, &output, Quality::Medium).unwrap();

        let doc = lopdf::Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn lower_quality_never_beats_higher_quality_on_size() {
        let dir = TempDir::new().unwrap();
        let jpeg = gradient_jpeg(64, 64);
        let input = save_into(&mut jpeg_document(&jpeg, 64, 64), dir.path(), "in.pdf");

        let low = compress(&input, &dir.path().join("low.pdf"), Quality::Low).unwrap();
        let high = compress(&input, &dir.path().join("high.pdf"), Quality::High).unwrap();

        assert!(low.compressed_bytes <= high.compressed_bytes);
    }

    #[test]
    fn stats_match_the_documented_formula() {
        let stats = CompressionStats {
            original_bytes: 2000,
            compressed_bytes: 1500,
        };
        assert_eq!(stats.saved_bytes(), 500);
        assert!((stats.saved_percent() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn document_without_images_still_compresses() {
        let dir = TempDir::new().unwrap();
        let input = save_into(&mut text_document(&["just text"]), dir.path(), "in.pdf");
        let output = dir.path().join("out.pdf");

        compress(&input, &output, Quality::Low).unwrap();
        assert_eq!(lopdf::Document::load(&output).unwrap().get_pages().len(), 1);
    }
}

//! Image extraction: write every embedded image reference to disk.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use tracing::{debug, info};

use crate::document::{EmbeddedImage, ImageEncoding, PdfFile};
use crate::error::Result;

/// Extract every image referenced from every page of `input` into
/// `output_dir`, creating the directory if absent.
///
/// Files are named `image_p{page}_{index}.{ext}` with 1-based page and
/// per-page indices. JPEG and JPEG 2000 streams are written byte for
/// byte; bare sample images are wrapped losslessly as PNG. References
/// are not deduplicated: an image used on several pages is written once
/// per reference. Images with both dimensions below `min_size` pixels
/// are skipped (0 keeps everything). Returns the number of files
/// written.
pub fn extract_images(input: &Path, output_dir: &Path, min_size: u32) -> Result<usize> {
    fs::create_dir_all(output_dir)?;

    let pdf = PdfFile::open(input)?;
    let mut count = 0usize;

    for (page_no, page_id) in pdf.pages() {
        for (index, image) in pdf.page_images(page_no, page_id).iter().enumerate() {
            if min_size > 0 && image.width < min_size && image.height < min_size {
                debug!(
                    "skipping {}x{} image on page {}: below minimum size",
                    image.width, image.height, page_no
                );
                continue;
            }

            let path = output_dir.join(format!(
                "image_p{}_{}.{}",
                page_no,
                index + 1,
                image.extension()
            ));
            fs::write(&path, file_bytes(image)?)?;
            count += 1;
            info!("saved image: {}", path.display());
        }
    }

    info!("extracted {} images in total", count);
    Ok(count)
}

/// Bytes to write for one image record: the stream content as-is for
/// self-contained formats, a lossless PNG wrap for bare samples.
fn file_bytes(image: &EmbeddedImage) -> Result<Vec<u8>> {
    match image.encoding {
        ImageEncoding::Jpeg | ImageEncoding::Jpeg2000 => Ok(image.data.clone()),
        ImageEncoding::RawRgb | ImageEncoding::RawGray => {
            let decoded = image.decode()?;
            let mut out = Vec::new();
            decoded.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::fixtures::{gradient_jpeg, jpeg_document, save_into, text_document};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn writes_jpegs_byte_identical() {
        let dir = TempDir::new().unwrap();
        let jpeg = gradient_jpeg(24, 24);
        let input = save_into(&mut jpeg_document(&jpeg, 24, 24), dir.path(), "in.pdf");
        let out_dir = dir.path().join("images");

        let count = extract_images(&input, &out_dir, 0).unwrap();

        assert_eq!(count, 1);
        let written = fs::read(out_dir.join("image_p1_1.jpg")).unwrap();
        assert_eq!(written, jpeg);
    }

    #[test]
    fn min_size_filter_skips_small_images() {
        let dir = TempDir::new().unwrap();
        let jpeg = gradient_jpeg(8, 8);
        let input = save_into(&mut jpeg_document(&jpeg, 8, 8), dir.path(), "in.pdf");
        let out_dir = dir.path().join("images");

        assert_eq!(extract_images(&input, &out_dir, 16).unwrap(), 0);
    }

    #[test]
    fn document_without_images_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = save_into(&mut text_document(&["no images"]), dir.path(), "in.pdf");
        let out_dir = dir.path().join("images");

        assert_eq!(extract_images(&input, &out_dir, 0).unwrap(), 0);
        assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
    }

    #[test]
    fn zero_page_document_succeeds() {
        let dir = TempDir::new().unwrap();
        let input = save_into(&mut text_document(&[]), dir.path(), "empty.pdf");

        assert_eq!(extract_images(&input, &dir.path().join("images"), 0).unwrap(), 0);
    }
}

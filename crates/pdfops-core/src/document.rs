//! PDF document handle and embedded-image discovery using lopdf.

use std::fs;
use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use crate::error::{PdfError, Result};

/// An open PDF document.
///
/// Owns the parsed object tree plus the raw file bytes; pdf-extract
/// parses the raw bytes independently for text extraction. Dropping the
/// handle releases everything, on every exit path.
pub struct PdfFile {
    document: Document,
    raw_data: Vec<u8>,
}

/// How an embedded image's data is encoded inside its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// DCTDecode: the stream content is a complete JPEG file.
    Jpeg,
    /// JPXDecode: the stream content is a complete JPEG 2000 file.
    Jpeg2000,
    /// Bare 8-bit RGB samples (unfiltered or deflate-compressed).
    RawRgb,
    /// Bare 8-bit grayscale samples (unfiltered or deflate-compressed).
    RawGray,
}

/// An image XObject referenced from a page.
///
/// `id` is the stream's object id; replacing the object stored under it
/// swaps the image without touching the content stream that places it,
/// so the image keeps its position on the page.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub id: ObjectId,
    /// Resource name the page's content stream draws it by.
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub encoding: ImageEncoding,
    /// Raw stream content for Jpeg/Jpeg2000, decompressed samples for
    /// RawRgb/RawGray.
    pub data: Vec<u8>,
}

impl EmbeddedImage {
    /// File extension matching [`Self::data`] once written to disk.
    ///
    /// Bare samples have no standalone file format; they are wrapped
    /// losslessly as PNG by the callers that write them.
    pub fn extension(&self) -> &'static str {
        match self.encoding {
            ImageEncoding::Jpeg => "jpg",
            ImageEncoding::Jpeg2000 => "jp2",
            ImageEncoding::RawRgb | ImageEncoding::RawGray => "png",
        }
    }

    /// Decode the embedded data into pixels.
    ///
    /// JPEG 2000 has no decoder in the image crate and is reported as
    /// [`PdfError::UnsupportedImage`] so callers can fall back to the
    /// encoded bytes.
    pub fn decode(&self) -> Result<DynamicImage> {
        match self.encoding {
            ImageEncoding::Jpeg => {
                Ok(image::load_from_memory_with_format(&self.data, ImageFormat::Jpeg)?)
            }
            ImageEncoding::Jpeg2000 => {
                Err(PdfError::UnsupportedImage("JPEG 2000 (JPXDecode)".to_string()).into())
            }
            ImageEncoding::RawRgb => {
                let samples = self.samples(self.width as usize * self.height as usize * 3)?;
                ImageBuffer::<Rgb<u8>, _>::from_raw(self.width, self.height, samples)
                    .map(DynamicImage::ImageRgb8)
                    .ok_or_else(|| {
                        PdfError::UnsupportedImage("RGB sample buffer mismatch".to_string()).into()
                    })
            }
            ImageEncoding::RawGray => {
                let samples = self.samples(self.width as usize * self.height as usize)?;
                ImageBuffer::<Luma<u8>, _>::from_raw(self.width, self.height, samples)
                    .map(DynamicImage::ImageLuma8)
                    .ok_or_else(|| {
                        PdfError::UnsupportedImage("gray sample buffer mismatch".to_string()).into()
                    })
            }
        }
    }

    fn samples(&self, expected: usize) -> Result<Vec<u8>> {
        if self.data.len() < expected {
            return Err(PdfError::UnsupportedImage(format!(
                "sample data too short: {} < {}",
                self.data.len(),
                expected
            ))
            .into());
        }
        Ok(self.data[..expected].to_vec())
    }
}

impl PdfFile {
    /// Open and parse a PDF file.
    pub fn open(path: &Path) -> Result<Self> {
        let raw_data = fs::read(path)?;
        let document =
            Document::load_mem(&raw_data).map_err(|e| PdfError::Parse(e.to_string()))?;
        if document.is_encrypted() {
            return Err(PdfError::Encrypted.into());
        }
        debug!(
            "loaded {} ({} pages)",
            path.display(),
            document.get_pages().len()
        );
        Ok(Self { document, raw_data })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page numbers (1-based) with their object ids, in document order.
    pub fn pages(&self) -> Vec<(u32, ObjectId)> {
        self.document.get_pages().into_iter().collect()
    }

    /// Borrow the underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutably borrow the underlying lopdf document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Extract plain text per page, in page order.
    pub fn text_by_pages(&self) -> Result<Vec<String>> {
        pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()).into())
    }

    /// Image XObjects referenced from a page's resources, in the order
    /// the resource dictionary lists them.
    pub fn page_images(&self, page_no: u32, page_id: ObjectId) -> Vec<EmbeddedImage> {
        let Some(resources) = self.page_resources(page_id) else {
            return Vec::new();
        };

        let mut images = Vec::new();
        if let Ok(xobjects) = resources.get(b"XObject") {
            if let Ok((_, Object::Dictionary(xobject_dict))) = self.document.dereference(xobjects)
            {
                for (name, entry) in xobject_dict.iter() {
                    let Object::Reference(id) = entry else {
                        continue;
                    };
                    if let Ok(Object::Stream(stream)) = self.document.get_object(*id) {
                        let name = String::from_utf8_lossy(name).into_owned();
                        if let Some(image) = classify_image(&self.document, *id, name, stream) {
                            images.push(image);
                        }
                    }
                }
            }
        }
        trace!("page {}: {} images", page_no, images.len());
        images
    }

    /// Resources dictionary for a page, walking up the page tree for
    /// inherited entries.
    fn page_resources(&self, page_id: ObjectId) -> Option<Dictionary> {
        let mut node_id = page_id;
        loop {
            let dict = self.document.get_object(node_id).ok()?.as_dict().ok()?;
            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(found))) = self.document.dereference(resources) {
                    return Some(found.clone());
                }
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => node_id = *parent,
                _ => return None,
            }
        }
    }
}

/// Build an [`EmbeddedImage`] from an XObject stream, or `None` when
/// the stream is not an image or uses a codec we cannot handle.
fn classify_image(
    doc: &Document,
    id: ObjectId,
    name: String,
    stream: &lopdf::Stream,
) -> Option<EmbeddedImage> {
    let dict = &stream.dict;
    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    trace!("image {}: {}x{}", name, width, height);

    match primary_filter(dict).as_deref() {
        Some(b"DCTDecode") => Some(EmbeddedImage {
            id,
            name,
            width,
            height,
            encoding: ImageEncoding::Jpeg,
            data: stream.content.clone(),
        }),
        Some(b"JPXDecode") => Some(EmbeddedImage {
            id,
            name,
            width,
            height,
            encoding: ImageEncoding::Jpeg2000,
            data: stream.content.clone(),
        }),
        Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
            warn!("skipping image {}: fax/JBIG2 codec not supported", name);
            None
        }
        _ => {
            // FlateDecode or no filter at all: bare samples.
            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());

            let bits = dict
                .get(b"BitsPerComponent")
                .ok()
                .and_then(|o| o.as_i64().ok())
                .unwrap_or(8);
            if bits != 8 {
                warn!("skipping image {}: {} bits per component", name, bits);
                return None;
            }

            let color_space = dict
                .get(b"ColorSpace")
                .ok()
                .and_then(|o| match o {
                    Object::Name(cs) => Some(cs.as_slice()),
                    Object::Array(items) => items.first().and_then(|o| o.as_name().ok()),
                    Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
                    _ => None,
                })
                .unwrap_or(b"DeviceRGB");

            let encoding = match color_space {
                b"DeviceRGB" | b"RGB" | b"CalRGB" => ImageEncoding::RawRgb,
                b"DeviceGray" | b"G" | b"CalGray" => ImageEncoding::RawGray,
                other => {
                    warn!(
                        "skipping image {}: color space {:?} not supported",
                        name,
                        String::from_utf8_lossy(other)
                    );
                    return None;
                }
            };

            Some(EmbeddedImage {
                id,
                name,
                width,
                height,
                encoding,
                data,
            })
        }
    }
}

/// First entry of the stream's Filter, which decides the image codec.
fn primary_filter(dict: &Dictionary) -> Option<Vec<u8>> {
    match dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(name.clone()),
        Object::Array(items) => items
            .first()
            .and_then(|o| o.as_name().ok())
            .map(|n| n.to_vec()),
        _ => None,
    }
}

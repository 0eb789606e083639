//! Embedded raster extraction from PDF documents.
//!
//! Pages are walked in page order; on each page the XObject resources are
//! visited in dictionary order, recursing into Form XObjects. Every image
//! XObject found gets a 1-based per-page index, whether or not it can be
//! extracted, so file names stay stable when a single image is skipped.
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, warn};

use crate::error::Result;

/// One embedded raster, as stored (JPEG/JPX) or re-encoded (PNG).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// 1-based page number
    pub page: u32,
    /// 1-based position among the page's image references
    pub index: usize,
    pub data: Vec<u8>,
    /// File extension: `jpeg`, `jpx` or `png`
    pub ext: &'static str,
}

impl ExtractedImage {
    /// `page{N}_img{M}`
    pub fn stem(&self) -> String {
        format!("page{}_img{}", self.page, self.index)
    }

    /// `page{N}_img{M}.{ext}`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem(), self.ext)
    }
}

pub fn extract_pdf_images(path: &Path) -> Result<Vec<ExtractedImage>> {
    let doc = Document::load(path)?;
    Ok(extract_document_images(&doc))
}

pub fn extract_pdf_images_from_memory(bytes: &[u8]) -> Result<Vec<ExtractedImage>> {
    let doc = Document::load_mem(bytes)?;
    Ok(extract_document_images(&doc))
}

pub fn extract_document_images(doc: &Document) -> Vec<ExtractedImage> {
    let mut extracted = Vec::new();

    for (page, page_id) in doc.get_pages() {
        let image_ids = collect_page_images(doc, page_id);
        debug!("Page {}: {} image references", page, image_ids.len());

        for (i, obj_id) in image_ids.into_iter().enumerate() {
            match extract_image(doc, obj_id) {
                Ok((data, ext)) => extracted.push(ExtractedImage {
                    page,
                    index: i + 1,
                    data,
                    ext,
                }),
                Err(reason) => warn!(
                    "Skipping image {} on page {} (object {:?}): {}",
                    i + 1,
                    page,
                    obj_id,
                    reason
                ),
            }
        }
    }

    info!("Extracted {} images from PDF", extracted.len());
    extracted
}

/// Persist images as `page{N}_img{M}.{ext}` under `output_dir`.
pub fn write_extracted_images(images: &[ExtractedImage], output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    images
        .iter()
        .map(|img| {
            let path = output_dir.join(img.file_name());
            fs::write(&path, &img.data)?;
            Ok(path)
        })
        .collect()
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

fn name_of(obj: &Object) -> Option<String> {
    match obj {
        Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
        Object::Array(arr) => arr.first().and_then(name_of),
        _ => None,
    }
}

fn integer(dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match dict.get(key).ok()? {
        Object::Integer(n) => Some(*n),
        _ => None,
    }
}

/// Page resources, inherited from the nearest ancestor when absent.
fn page_resources<'a>(doc: &'a Document, page_id: ObjectId) -> Option<&'a Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    let mut visited = HashSet::from([page_id]);
    loop {
        if let Ok(res) = node.get(b"Resources") {
            return resolve_dict(doc, res);
        }
        let parent_id = match node.get(b"Parent").ok()? {
            Object::Reference(id) => *id,
            _ => return None,
        };
        if !visited.insert(parent_id) {
            return None;
        }
        node = doc.get_dictionary(parent_id).ok()?;
    }
}

fn xobject_refs(doc: &Document, resources: &Dictionary) -> Vec<ObjectId> {
    resources
        .get(b"XObject")
        .ok()
        .and_then(|x| resolve_dict(doc, x))
        .map(|xobjects| {
            xobjects
                .iter()
                .filter_map(|(_, value)| match value {
                    Object::Reference(id) => Some(*id),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn collect_page_images(doc: &Document, page_id: ObjectId) -> Vec<ObjectId> {
    let mut images = Vec::new();
    let mut seen = HashSet::new();
    if let Some(resources) = page_resources(doc, page_id) {
        for id in xobject_refs(doc, resources) {
            collect_images_recursive(doc, id, &mut images, &mut seen);
        }
    }
    images
}

fn collect_images_recursive(
    doc: &Document,
    obj_id: ObjectId,
    images: &mut Vec<ObjectId>,
    seen: &mut HashSet<ObjectId>,
) {
    if !seen.insert(obj_id) {
        return;
    }
    let Ok(Object::Stream(stream)) = doc.get_object(obj_id) else {
        return;
    };

    match stream.dict.get(b"Subtype").ok().and_then(name_of).as_deref() {
        Some("Image") => images.push(obj_id),
        Some("Form") => {
            if let Some(res) = stream.dict.get(b"Resources").ok().and_then(|r| resolve_dict(doc, r)) {
                for child in xobject_refs(doc, res) {
                    collect_images_recursive(doc, child, images, seen);
                }
            }
        }
        _ => {}
    }
}

/// Every name in `/Filter`, in decoding order.
fn filter_names(doc: &Document, dict: &Dictionary) -> Vec<String> {
    let Some(filter) = dict.get(b"Filter").ok().and_then(|f| resolve(doc, f)) else {
        return Vec::new();
    };
    match filter {
        Object::Name(n) => vec![String::from_utf8_lossy(n).into_owned()],
        Object::Array(arr) => arr
            .iter()
            .filter_map(|f| match resolve(doc, f)? {
                Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Undo transport filters that wrap an image codec's own bytes.
fn undo_filters(content: &[u8], filters: &[String]) -> std::result::Result<Vec<u8>, String> {
    let mut data = content.to_vec();
    for name in filters {
        data = match name.as_str() {
            "FlateDecode" => {
                let mut decoded = Vec::new();
                ZlibDecoder::new(&data[..])
                    .read_to_end(&mut decoded)
                    .map_err(|e| format!("cannot inflate stream: {}", e))?;
                decoded
            }
            other => return Err(format!("unsupported filter {} ahead of image codec", other)),
        };
    }
    Ok(data)
}

/// Stored bytes for JPEG-family streams, PNG re-encoding for everything else.
fn extract_image(doc: &Document, obj_id: ObjectId) -> std::result::Result<(Vec<u8>, &'static str), String> {
    let stream = match doc.get_object(obj_id) {
        Ok(Object::Stream(s)) => s,
        _ => return Err("not an image stream".to_string()),
    };

    // the image codec, if any, is the last filter of the chain
    let filters = filter_names(doc, &stream.dict);
    if let Some((codec, transport)) = filters.split_last() {
        let ext = match codec.as_str() {
            "DCTDecode" => Some("jpeg"),
            "JPXDecode" => Some("jpx"),
            _ => None,
        };
        if let Some(ext) = ext {
            return Ok((undo_filters(&stream.content, transport)?, ext));
        }
    }

    let img = decode_raw_image(doc, stream)?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| format!("PNG encoding failed: {}", e))?;
    Ok((png, "png"))
}

fn dimension(dict: &Dictionary, key: &str) -> std::result::Result<u32, String> {
    integer(dict, key.as_bytes())
        .filter(|&v| v > 0)
        .ok_or_else(|| format!("missing {}", key))
        .and_then(|v| u32::try_from(v).map_err(|_| format!("{} {} out of range", key, v)))
}

const DIMENSIONS_OVERFLOW: &str = "image dimensions overflow";

fn decode_raw_image(doc: &Document, stream: &Stream) -> std::result::Result<DynamicImage, String> {
    let dict = &stream.dict;
    let width = dimension(dict, "Width")?;
    let height = dimension(dict, "Height")?;
    let bits = integer(dict, b"BitsPerComponent").unwrap_or(8);
    if bits != 8 {
        return Err(format!("unsupported BitsPerComponent {}", bits));
    }

    let data = if dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| format!("cannot decompress stream: {}", e))?
    } else {
        stream.content.clone()
    };

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|cs| resolve(doc, cs))
        .and_then(name_of)
        .unwrap_or_else(|| "DeviceRGB".to_string());

    let pixels = (width as usize)
        .checked_mul(height as usize)
        .ok_or(DIMENSIONS_OVERFLOW)?;
    let holds = |channels: usize| pixels.checked_mul(channels).is_some_and(|n| data.len() >= n);
    let channels = match color_space.as_str() {
        "DeviceRGB" | "CalRGB" => 3,
        "DeviceGray" | "CalGray" => 1,
        "DeviceCMYK" => 4,
        // N is not consulted; guess from the payload size
        "ICCBased" if holds(4) => 4,
        "ICCBased" if holds(3) => 3,
        "ICCBased" if holds(1) => 1,
        "ICCBased" => return Err(format!("short ICCBased pixel data: {} bytes", data.len())),
        other => return Err(format!("unsupported color space {}", other)),
    };

    let expected = pixels.checked_mul(channels).ok_or(DIMENSIONS_OVERFLOW)?;
    if data.len() < expected {
        return Err(format!(
            "short pixel data: {} bytes, expected {}",
            data.len(),
            expected
        ));
    }
    let data = data[..expected].to_vec();

    let img = match channels {
        1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        _ => RgbImage::from_raw(width, height, cmyk_to_rgb(&data)).map(DynamicImage::ImageRgb8),
    };
    img.ok_or_else(|| "pixel buffer does not match dimensions".to_string())
}

fn cmyk_to_rgb(cmyk: &[u8]) -> Vec<u8> {
    cmyk.chunks_exact(4)
        .flat_map(|px| {
            let k = 255 - px[3] as u32;
            [0, 1, 2].map(|c| ((255 - px[c] as u32) * k / 255) as u8)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn file_names_follow_page_image_pattern() {
        let img = ExtractedImage {
            page: 3,
            index: 2,
            data: vec![],
            ext: "jpeg",
        };
        assert_eq!(img.file_name(), "page3_img2.jpeg");
        assert_eq!(img.stem(), "page3_img2");
    }

    #[test]
    fn cmyk_conversion() {
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 0, 255, 0, 0, 0, 0, 0, 0, 255]), vec![
            255, 255, 255, 0, 255, 255, 0, 0, 0
        ]);
    }

    #[test]
    fn garbage_is_a_pdf_error() {
        assert!(extract_pdf_images_from_memory(b"%PDF-nope").is_err());
    }

    /// One page whose resources hold `xobject` as `/Im1`.
    fn single_image_doc(xobject: Stream) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let image_id = doc.add_object(xobject);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im1" => image_id },
            },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1_i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn jpeg_fixture() -> Vec<u8> {
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, image::Rgb([10, 120, 200])))
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        jpeg
    }

    #[test]
    fn huge_dimensions_skip_the_image() {
        for color_space in ["ICCBased", "DeviceRGB"] {
            let doc = single_image_doc(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => 4_294_967_295_i64,
                    "Height" => 4_294_967_295_i64,
                    "ColorSpace" => color_space,
                    "BitsPerComponent" => 8_i64,
                },
                vec![0u8; 12],
            ));
            assert!(extract_document_images(&doc).is_empty(), "{}", color_space);
        }
    }

    #[test]
    fn dimensions_beyond_u32_are_rejected() {
        let dict = dictionary! { "Width" => 4_294_967_296_i64 };
        assert!(dimension(&dict, "Width").is_err());
        assert!(dimension(&dictionary! { "Width" => 0_i64 }, "Width").is_err());
        assert_eq!(dimension(&dictionary! { "Width" => 640_i64 }, "Width"), Ok(640));
    }

    #[test]
    fn flate_wrapped_jpeg_is_unwrapped() {
        use flate2::Compression;
        use flate2::write::ZlibEncoder;
        use std::io::Write;

        let jpeg = jpeg_fixture();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&jpeg).unwrap();
        let deflated = encoder.finish().unwrap();

        let doc = single_image_doc(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 8_i64,
                "Height" => 8_i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => vec![Object::Name(b"FlateDecode".to_vec()), Object::Name(b"DCTDecode".to_vec())],
            },
            deflated,
        ));

        let images = extract_document_images(&doc);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].file_name(), "page1_img1.jpeg");
        assert_eq!(images[0].data, jpeg);
    }

    #[test]
    fn unknown_transport_filter_is_reported() {
        let filters = vec!["ASCII85Decode".to_string()];
        assert!(undo_filters(b"abc", &filters).is_err());
        assert_eq!(undo_filters(b"abc", &[]), Ok(b"abc".to_vec()));
    }
}

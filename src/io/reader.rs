use std::fs;
use std::path::Path;

use image::DynamicImage;

use crate::core::image::SourceImage;
use crate::error::{Error, Result};

/// Convert any decoded image to an RGB `SourceImage`, dropping alpha.
pub fn source_from_dynamic(img: &DynamicImage) -> Result<SourceImage> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    SourceImage::from_rgb(width as usize, height as usize, rgb.into_raw())
}

/// Decode an in-memory image in any format the `image` crate recognizes.
pub fn decode_source_image(bytes: &[u8]) -> Result<SourceImage> {
    let img = image::load_from_memory(bytes)?;
    source_from_dynamic(&img)
}

/// Read and decode `path`. Every failure surfaces as `Error::UnreadableSource`.
pub fn load_source_image(path: &Path) -> Result<SourceImage> {
    let bytes = fs::read(path).map_err(|e| Error::unreadable(path, e))?;
    let img = image::load_from_memory(&bytes).map_err(|e| Error::unreadable(path, e))?;
    source_from_dynamic(&img)
}

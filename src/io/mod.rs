//! I/O layer: PDF image extraction (`pdf`), source image decoding (`reader`),
//! and `writers` for JPEG sub-images and result archives.
pub mod pdf;
pub use pdf::{ExtractedImage, extract_pdf_images, write_extracted_images};

pub mod reader;
pub use reader::{decode_source_image, load_source_image};

pub mod writers;

//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, codec, PDF and archive errors, and provides semantic
//! variants for the per-image outcomes of the split pipeline.
use std::path::PathBuf;

use thiserror::Error;

use crate::core::partition::PartitionError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[cfg(feature = "archive")]
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("JPEG encoding error: {0}")]
    Jpeg(#[from] jpeg_encoder::EncodingError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Cannot read source image {path:?}: {reason}")]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("Partition refused: {0}")]
    Partition(#[from] PartitionError),

    #[error("No sub-images produced for {name}")]
    EmptyBatch { name: String },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Processing error: {0}")]
    Processing(String),
}

impl Error {
    pub fn unreadable<E: std::fmt::Display>(path: impl Into<PathBuf>, e: E) -> Self {
        Error::UnreadableSource {
            path: path.into(),
            reason: e.to_string(),
        }
    }
}

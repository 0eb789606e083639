//! Output writers: JPEG sub-images and, with the `archive` feature, zip
//! packaging of a run's results.
#[cfg(feature = "archive")]
pub mod archive;
pub mod jpeg;

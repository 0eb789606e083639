use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::partition::contour::{DEFAULT_BINARIZE_THRESHOLD, DEFAULT_MIN_REGION};
use crate::core::processing::trim::BACKGROUND_THRESHOLD;
use crate::error::{Error, Result};
use crate::types::PartitionStrategy;

pub const DEFAULT_SUBIMAGE_COUNT: usize = 8;
pub const MAX_SUBIMAGE_COUNT: usize = 100;
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Split parameters suitable for config files and front-end presets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitParams {
    /// Number of sub-images to cut from each source image
    pub subimage_count: usize,
    pub strategy: PartitionStrategy,
    /// Luminance at or above which a pixel counts as background
    pub background_threshold: u8,
    pub jpeg_quality: u8,
    /// Contour strategy only: pixels at or below this luminance are foreground
    pub contour_binarize_threshold: u8,
    /// Contour strategy only: regions must be strictly wider and taller than this
    pub contour_min_region: u32,
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            subimage_count: DEFAULT_SUBIMAGE_COUNT,
            strategy: PartitionStrategy::Grid,
            background_threshold: BACKGROUND_THRESHOLD,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            contour_binarize_threshold: DEFAULT_BINARIZE_THRESHOLD,
            contour_min_region: DEFAULT_MIN_REGION,
        }
    }
}

impl SplitParams {
    pub fn with_count(subimage_count: usize) -> Self {
        Self {
            subimage_count,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SUBIMAGE_COUNT).contains(&self.subimage_count) {
            return Err(Error::InvalidArgument {
                arg: "subimage_count",
                value: self.subimage_count.to_string(),
            });
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::InvalidArgument {
                arg: "jpeg_quality",
                value: self.jpeg_quality.to_string(),
            });
        }
        Ok(())
    }

    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let params: SplitParams = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_presented_ui() {
        let params = SplitParams::default();
        assert_eq!(params.subimage_count, 8);
        assert_eq!(params.strategy, PartitionStrategy::Grid);
        assert_eq!(params.background_threshold, 250);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn count_outside_accepted_range_is_rejected() {
        assert!(SplitParams::with_count(0).validate().is_err());
        assert!(SplitParams::with_count(101).validate().is_err());
        assert!(SplitParams::with_count(1).validate().is_ok());
        assert!(SplitParams::with_count(100).validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: SplitParams =
            serde_json::from_str(r#"{"subimage_count": 4, "strategy": "contour"}"#).unwrap();
        assert_eq!(params.subimage_count, 4);
        assert_eq!(params.strategy, PartitionStrategy::Contour);
        assert_eq!(params.jpeg_quality, DEFAULT_JPEG_QUALITY);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{"subimage_count": 6, "jpeg_quality": 80}"#).unwrap();
        let params = SplitParams::from_json_file(&path).unwrap();
        assert_eq!(params.subimage_count, 6);
        assert_eq!(params.jpeg_quality, 80);

        fs::write(&path, r#"{"subimage_count": 0}"#).unwrap();
        assert!(SplitParams::from_json_file(&path).is_err());
    }
}

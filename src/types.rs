//! Shared types and enums used across pdfsplit.
//! Includes the partitioning `PartitionStrategy` and the archive `PackagingMode`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a source image is carved into cells.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionStrategy {
    /// Fixed row/column grid derived from the requested count
    Grid,
    /// Legacy connected-region detection
    Contour,
}

impl std::fmt::Display for PartitionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionStrategy::Grid => write!(f, "grid"),
            PartitionStrategy::Contour => write!(f, "contour"),
        }
    }
}

/// Layout of the result archive.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingMode {
    /// Keep one directory per source image
    Chapter,
    /// Everything at the archive root, named `{parentDirName}_{fileName}`
    Flat,
}

impl PackagingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackagingMode::Chapter => "chapter",
            PackagingMode::Flat => "flat",
        }
    }
}

impl std::fmt::Display for PackagingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

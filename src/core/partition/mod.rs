//! Partitioning strategies: carve a `SourceImage` into an ordered list of
//! rectangular cells.
//!
//! Two interchangeable implementations sit behind the `Partitioner` trait:
//! - [`GridPartitioner`]: fixed row/column layout derived purely from the
//!   requested count. Refuses images whose dimensions do not divide evenly.
//! - [`ContourPartitioner`]: legacy detection of connected foreground regions.
//!   Refuses images with fewer qualifying regions than requested.
//!
//! Both report refusals as [`PartitionError`] values, never panics.
use serde::Serialize;
use thiserror::Error;

use crate::core::image::SourceImage;
use crate::core::params::SplitParams;
use crate::types::PartitionStrategy;

pub mod contour;
pub mod grid;

pub use contour::ContourPartitioner;
pub use grid::{GridLayout, GridPartitioner};

/// One rectangular region of the source image, `y1..y2` x `x1..x2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// 1-based emission order
    pub index: usize,
    /// Grid (row, col); `None` for detected regions
    pub position: Option<(usize, usize)>,
    pub y1: usize,
    pub y2: usize,
    pub x1: usize,
    pub x2: usize,
}

impl Cell {
    #[inline]
    pub fn height(&self) -> usize {
        self.y2 - self.y1
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.x2 - self.x1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("Sub-image count must be at least 1, got {requested}")]
    InvalidCount { requested: usize },

    #[error(
        "{height}x{width} image does not divide evenly into {rows} rows x {columns} columns"
    )]
    Ungridable {
        height: usize,
        width: usize,
        rows: usize,
        columns: usize,
    },

    #[error("Found {found} candidate regions, need {requested}")]
    InsufficientRegions { found: usize, requested: usize },
}

pub trait Partitioner {
    fn name(&self) -> &'static str;

    /// Cells in emission order, at most `requested` of them.
    fn partition(
        &self,
        image: &SourceImage,
        requested: usize,
    ) -> Result<Vec<Cell>, PartitionError>;
}

impl PartitionStrategy {
    pub fn partitioner(self, params: &SplitParams) -> Box<dyn Partitioner> {
        match self {
            PartitionStrategy::Grid => Box::new(GridPartitioner),
            PartitionStrategy::Contour => Box::new(ContourPartitioner::new(
                params.contour_binarize_threshold,
                params.contour_min_region,
            )),
        }
    }
}

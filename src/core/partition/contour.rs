use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use tracing::debug;

use super::{Cell, PartitionError, Partitioner};
use crate::core::image::SourceImage;

pub const DEFAULT_BINARIZE_THRESHOLD: u8 = 240;
pub const DEFAULT_MIN_REGION: u32 = 50;

/// Legacy partitioner: finds top-level connected foreground regions and emits
/// their bounding boxes in reading order (top-to-bottom, then left-to-right).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContourPartitioner {
    pub binarize_threshold: u8,
    pub min_region: u32,
}

impl Default for ContourPartitioner {
    fn default() -> Self {
        Self::new(DEFAULT_BINARIZE_THRESHOLD, DEFAULT_MIN_REGION)
    }
}

impl ContourPartitioner {
    pub fn new(binarize_threshold: u8, min_region: u32) -> Self {
        Self {
            binarize_threshold,
            min_region,
        }
    }

    /// Non-zero where luminance is at or below the binarize threshold.
    fn foreground_mask(&self, image: &SourceImage) -> GrayImage {
        let gray = image.luminance();
        GrayImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
            if gray[[y as usize, x as usize]] > self.binarize_threshold {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    /// Bounding boxes `(x1, y1, x2, y2)` (exclusive ends) of qualifying
    /// regions, sorted by `(y1, x1)`.
    pub fn regions(&self, image: &SourceImage) -> Vec<(usize, usize, usize, usize)> {
        let mask = self.foreground_mask(image);
        let contours = find_contours::<u32>(&mask);

        let mut regions: Vec<(usize, usize, usize, usize)> = contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(|c| {
                let min_x = c.points.iter().map(|p| p.x).min()?;
                let max_x = c.points.iter().map(|p| p.x).max()?;
                let min_y = c.points.iter().map(|p| p.y).min()?;
                let max_y = c.points.iter().map(|p| p.y).max()?;
                let (w, h) = (max_x - min_x + 1, max_y - min_y + 1);
                (w > self.min_region && h > self.min_region).then_some((
                    min_x as usize,
                    min_y as usize,
                    max_x as usize + 1,
                    max_y as usize + 1,
                ))
            })
            .collect();

        regions.sort_by_key(|&(x1, y1, _, _)| (y1, x1));
        debug!(
            "Contour scan: {} contours, {} qualifying regions",
            contours.len(),
            regions.len()
        );
        regions
    }
}

impl Partitioner for ContourPartitioner {
    fn name(&self) -> &'static str {
        "contour"
    }

    fn partition(
        &self,
        image: &SourceImage,
        requested: usize,
    ) -> Result<Vec<Cell>, PartitionError> {
        if requested == 0 {
            return Err(PartitionError::InvalidCount { requested });
        }

        let regions = self.regions(image);
        if regions.len() < requested {
            return Err(PartitionError::InsufficientRegions {
                found: regions.len(),
                requested,
            });
        }

        Ok(regions
            .into_iter()
            .take(requested)
            .enumerate()
            .map(|(i, (x1, y1, x2, y2))| Cell {
                index: i + 1,
                position: None,
                y1,
                y2,
                x1,
                x2,
            })
            .collect())
    }
}

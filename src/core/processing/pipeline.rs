use ndarray::Array3;
use tracing::{debug, info};

use crate::core::image::SourceImage;
use crate::core::params::SplitParams;
use crate::core::partition::{Cell, PartitionError, Partitioner};
use crate::core::processing::canvas::normalize_canvas;
use crate::core::processing::trim::trim_background;

/// Trim every cell of `image`, dropping any that end up without pixels.
pub fn trim_cells(image: &SourceImage, cells: &[Cell], threshold: u8) -> Vec<Array3<u8>> {
    cells
        .iter()
        .map(|cell| trim_background(image.region(cell.y1, cell.y2, cell.x1, cell.x2), threshold))
        .filter(|trimmed| !trimmed.is_empty())
        .collect()
}

/// Partition, trim and normalize one image with an explicit partitioner.
pub fn split_image_with(
    image: &SourceImage,
    partitioner: &dyn Partitioner,
    requested: usize,
    threshold: u8,
) -> Result<Vec<Array3<u8>>, PartitionError> {
    let cells = partitioner.partition(image, requested)?;
    debug!(
        "{} partitioner produced {} cells from {}x{} image",
        partitioner.name(),
        cells.len(),
        image.width(),
        image.height()
    );

    let trimmed = trim_cells(image, &cells, threshold);
    let normalized = normalize_canvas(&trimmed);
    info!("Split image into {} sub-images", normalized.len());
    Ok(normalized)
}

/// Partition, trim and normalize one image according to `params`.
pub fn split_image(
    image: &SourceImage,
    params: &SplitParams,
) -> Result<Vec<Array3<u8>>, PartitionError> {
    let partitioner = params.strategy.partitioner(params);
    split_image_with(
        image,
        partitioner.as_ref(),
        params.subimage_count,
        params.background_threshold,
    )
}

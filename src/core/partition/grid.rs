use serde::Serialize;
use tracing::debug;

use super::{Cell, PartitionError, Partitioner};
use crate::core::image::SourceImage;

/// Row/column layout derived from a requested sub-image count.
///
/// `columns = floor(sqrt(n))`, `rows = ceil(n / columns)`. The source aspect
/// ratio plays no part, so wide or tall sources can yield elongated cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub rows: usize,
    pub columns: usize,
}

impl GridLayout {
    /// `None` for a zero count.
    pub fn for_count(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let columns = count.isqrt();
        let rows = count.div_ceil(columns);
        Some(Self { rows, columns })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }

    /// True when an `height x width` raster divides exactly into this layout.
    #[inline]
    pub fn fits(&self, height: usize, width: usize) -> bool {
        height % self.rows == 0 && width % self.columns == 0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GridPartitioner;

impl Partitioner for GridPartitioner {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn partition(
        &self,
        image: &SourceImage,
        requested: usize,
    ) -> Result<Vec<Cell>, PartitionError> {
        let layout =
            GridLayout::for_count(requested).ok_or(PartitionError::InvalidCount { requested })?;
        let (height, width) = (image.height(), image.width());

        if !layout.fits(height, width) {
            return Err(PartitionError::Ungridable {
                height,
                width,
                rows: layout.rows,
                columns: layout.columns,
            });
        }

        let sub_height = height / layout.rows;
        let sub_width = width / layout.columns;
        debug!(
            "Grid layout {}x{} for {} cells, cell size {}x{}",
            layout.rows, layout.columns, requested, sub_height, sub_width
        );

        // Boundaries are multiples of the cell size; the surplus slots of a
        // non-full last row are never emitted.
        let cells = (0..layout.rows)
            .flat_map(|row| (0..layout.columns).map(move |col| (row, col)))
            .take(requested)
            .enumerate()
            .map(|(i, (row, col))| Cell {
                index: i + 1,
                position: Some((row, col)),
                y1: row * sub_height,
                y2: (row + 1) * sub_height,
                x1: col * sub_width,
                x2: (col + 1) * sub_width,
            })
            .collect();

        Ok(cells)
    }
}

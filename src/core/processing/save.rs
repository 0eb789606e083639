use ndarray::Array3;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::io::writers::jpeg::write_rgb_jpeg;

/// `subimg_{index}.jpg`, 1-based.
pub fn subimage_file_name(index: usize) -> String {
    format!("subimg_{}.jpg", index)
}

/// Write each cell as `subimg_{i}.jpg` into `output_dir`, in batch order.
///
/// Files written before a failure are left in place.
pub fn save_subimages(
    cells: &[Array3<u8>],
    output_dir: &Path,
    quality: u8,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let path = output_dir.join(subimage_file_name(i + 1));
        let (rows, cols, _) = cell.dim();
        let rgb: Vec<u8> = cell.iter().copied().collect();
        write_rgb_jpeg(&path, cols, rows, &rgb, quality)?;
        debug!("Saved {:?} ({}x{})", path, cols, rows);
        written.push(path);
    }
    Ok(written)
}

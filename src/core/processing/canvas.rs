use ndarray::{Array3, ArrayView3, s};
use tracing::{debug, info};

/// Fill value for canvas pixels not covered by cell content.
pub const BACKGROUND_FILL: u8 = 255;

/// Elementwise maximum `(height, width)` over a batch, `None` when empty.
pub fn canvas_size(cells: &[Array3<u8>]) -> Option<(usize, usize)> {
    cells.iter().map(|c| (c.dim().0, c.dim().1)).reduce(|(max_h, max_w), (h, w)| {
        (max_h.max(h), max_w.max(w))
    })
}

/// Composite `cell` onto a `max_h x max_w` background canvas, centered with
/// floor-divided offsets.
///
/// # Panics
///
/// Panics if the cell is taller than `max_h` or wider than `max_w`.
/// `normalize_canvas` always passes the batch maximum, which satisfies this.
pub fn center_on_canvas(cell: ArrayView3<'_, u8>, max_h: usize, max_w: usize) -> Array3<u8> {
    let (rows, cols, channels) = cell.dim();
    assert!(
        rows <= max_h && cols <= max_w,
        "{}x{} cell does not fit a {}x{} canvas",
        cols,
        rows,
        max_w,
        max_h
    );
    let pad_rows = (max_h - rows) / 2;
    let pad_cols = (max_w - cols) / 2;

    debug!(
        "Centering {}x{} cell: pad_rows={}, pad_cols={}",
        cols, rows, pad_rows, pad_cols
    );

    let mut canvas = Array3::from_elem((max_h, max_w, channels), BACKGROUND_FILL);
    canvas
        .slice_mut(s![pad_rows..pad_rows + rows, pad_cols..pad_cols + cols, ..])
        .assign(&cell);
    canvas
}

/// Pad every cell of a batch to the batch's common maximum size, preserving order.
pub fn normalize_canvas(cells: &[Array3<u8>]) -> Vec<Array3<u8>> {
    let Some((max_h, max_w)) = canvas_size(cells) else {
        return Vec::new();
    };

    info!(
        "Normalizing {} cells onto a {}x{} canvas",
        cells.len(),
        max_w,
        max_h
    );

    cells
        .iter()
        .map(|cell| center_on_canvas(cell.view(), max_h, max_w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(h: usize, w: usize, v: u8) -> Array3<u8> {
        Array3::from_elem((h, w, 3), v)
    }

    #[test]
    fn empty_batch_is_noop() {
        assert!(normalize_canvas(&[]).is_empty());
        assert_eq!(canvas_size(&[]), None);
    }

    #[test]
    fn single_cell_is_unchanged() {
        let cell = solid(3, 4, 7);
        let out = normalize_canvas(std::slice::from_ref(&cell));
        assert_eq!(out, vec![cell]);
    }

    #[test]
    fn batch_shares_elementwise_max() {
        let cells = vec![solid(2, 5, 0), solid(4, 3, 0), solid(1, 1, 0)];
        let out = normalize_canvas(&cells);
        assert_eq!(out.len(), 3);
        for c in &out {
            assert_eq!(c.dim(), (4, 5, 3));
        }
    }

    #[test]
    fn content_is_centered_with_floor_offsets() {
        let cells = vec![solid(4, 5, 200), solid(1, 2, 0)];
        let out = normalize_canvas(&cells);
        let canvas = &out[1];
        // offsets: (4-1)/2 = 1, (5-2)/2 = 1
        for y in 0..4 {
            for x in 0..5 {
                let expected = if y == 1 && (1..3).contains(&x) { 0 } else { BACKGROUND_FILL };
                assert_eq!(canvas[[y, x, 0]], expected, "pixel ({y},{x})");
            }
        }
        assert_eq!(out[0], cells[0]);
    }

    #[test]
    fn center_on_exact_canvas_is_identity() {
        let cell = solid(3, 2, 9);
        assert_eq!(center_on_canvas(cell.view(), 3, 2), cell);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn oversized_cell_is_rejected() {
        center_on_canvas(solid(4, 4, 0).view(), 3, 4);
    }

    #[test]
    fn order_is_preserved() {
        let cells = vec![solid(2, 2, 10), solid(2, 2, 20), solid(2, 2, 30)];
        let firsts: Vec<u8> = normalize_canvas(&cells).iter().map(|c| c[[0, 0, 0]]).collect();
        assert_eq!(firsts, vec![10, 20, 30]);
    }
}

use ndarray::{Array2, Array3, ArrayView3, Axis, s};
use tracing::trace;

/// Luminance at or above which a pixel is treated as blank background.
pub const BACKGROUND_THRESHOLD: u8 = 250;

/// Single-channel projection of a `[row, col, channel]` raster.
///
/// Three or more channels are weighted as R, G, B with the BT.601 luma
/// coefficients in 14-bit fixed point; a single channel is copied through.
pub fn luminance(pixels: ArrayView3<'_, u8>) -> Array2<u8> {
    let (height, width, channels) = pixels.dim();
    match channels {
        0 => Array2::zeros((height, width)),
        1 | 2 => pixels.index_axis(Axis(2), 0).to_owned(),
        _ => Array2::from_shape_fn((height, width), |(y, x)| {
            let r = pixels[[y, x, 0]] as u32;
            let g = pixels[[y, x, 1]] as u32;
            let b = pixels[[y, x, 2]] as u32;
            ((r * 4899 + g * 9617 + b * 1868 + (1 << 13)) >> 14) as u8
        }),
    }
}

/// Inclusive `(y_min, y_max, x_min, x_max)` of all pixels strictly darker
/// than `threshold`, or `None` when every pixel is background.
pub fn content_bounds(gray: &Array2<u8>, threshold: u8) -> Option<(usize, usize, usize, usize)> {
    gray.indexed_iter()
        .filter(|&(_, &v)| v < threshold)
        .fold(None, |acc, ((y, x), _)| match acc {
            None => Some((y, y, x, x)),
            Some((y0, y1, x0, x1)) => Some((y0.min(y), y1.max(y), x0.min(x), x1.max(x))),
        })
}

/// Strip background rows and columns from all four sides.
///
/// Bounds are found on the luminance projection and applied to the
/// color data. An all-background cell is returned unchanged.
pub fn trim_background(pixels: ArrayView3<'_, u8>, threshold: u8) -> Array3<u8> {
    let gray = luminance(pixels);
    match content_bounds(&gray, threshold) {
        Some((y_min, y_max, x_min, x_max)) => {
            trace!(
                "Trimmed {:?} to rows {}..={} cols {}..={}",
                pixels.dim(),
                y_min,
                y_max,
                x_min,
                x_max
            );
            pixels
                .slice(s![y_min..=y_max, x_min..=x_max, ..])
                .to_owned()
        }
        None => pixels.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(height: usize, width: usize) -> Array3<u8> {
        Array3::from_elem((height, width, 3), 255u8)
    }

    #[test]
    fn luminance_of_primaries() {
        let mut px = Array3::zeros((1, 4, 3));
        px[[0, 0, 0]] = 255;
        px[[0, 1, 1]] = 255;
        px[[0, 2, 2]] = 255;
        px.slice_mut(s![0, 3, ..]).fill(255);
        let gray = luminance(px.view());
        assert_eq!(gray.row(0).to_vec(), vec![76, 150, 29, 255]);
    }

    #[test]
    fn strips_white_padding() {
        let mut px = white(20, 30);
        px.slice_mut(s![5..9, 10..22, ..]).fill(0);
        let trimmed = trim_background(px.view(), BACKGROUND_THRESHOLD);
        assert_eq!(trimmed.dim(), (4, 12, 3));
        assert!(trimmed.iter().all(|&v| v == 0));
    }

    #[test]
    fn threshold_is_strict() {
        let mut px = white(5, 5);
        px.slice_mut(s![1, 1, ..]).fill(250);
        assert_eq!(trim_background(px.view(), 250).dim(), (5, 5, 3));

        px.slice_mut(s![3, 2, ..]).fill(249);
        assert_eq!(trim_background(px.view(), 250).dim(), (1, 1, 3));
    }

    #[test]
    fn bounds_apply_to_color_data() {
        let mut px = white(6, 6);
        px[[2, 3, 0]] = 255;
        px[[2, 3, 1]] = 0;
        px[[2, 3, 2]] = 0;
        let trimmed = trim_background(px.view(), BACKGROUND_THRESHOLD);
        assert_eq!(trimmed.dim(), (1, 1, 3));
        assert_eq!(trimmed.as_slice().unwrap(), &[255, 0, 0]);
    }

    #[test]
    fn all_background_is_unchanged() {
        let px = white(7, 9);
        assert_eq!(trim_background(px.view(), BACKGROUND_THRESHOLD), px);
    }

    #[test]
    fn trimming_is_idempotent() {
        let mut px = white(40, 40);
        px.slice_mut(s![3..30, 8..12, ..]).fill(10);
        px.slice_mut(s![12..14, 5..35, ..]).fill(100);
        let once = trim_background(px.view(), BACKGROUND_THRESHOLD);
        let twice = trim_background(once.view(), BACKGROUND_THRESHOLD);
        assert_eq!(once, twice);
        assert_eq!(once.dim(), (27, 30, 3));
    }
}

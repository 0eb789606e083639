//! In-memory raster consumed by the partitioning engine.
use ndarray::{Array2, Array3, ArrayView3, s};

use crate::core::processing::trim::luminance;
use crate::error::{Error, Result};

/// Decoded RGB raster indexed `[row, col, channel]`. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: Array3<u8>,
}

impl SourceImage {
    pub const CHANNELS: usize = 3;

    /// Build from an interleaved RGB buffer of `width * height * 3` bytes.
    pub fn from_rgb(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let pixels = Array3::from_shape_vec((height, width, Self::CHANNELS), data).map_err(|e| {
            Error::InvalidArgument {
                arg: "rgb_buffer",
                value: e.to_string(),
            }
        })?;
        Ok(Self { pixels })
    }

    pub fn from_array(pixels: Array3<u8>) -> Result<Self> {
        let channels = pixels.dim().2;
        if channels != Self::CHANNELS {
            return Err(Error::InvalidArgument {
                arg: "channels",
                value: channels.to_string(),
            });
        }
        Ok(Self { pixels })
    }

    /// Uniformly colored image.
    pub fn filled(height: usize, width: usize, rgb: [u8; 3]) -> Self {
        let pixels = Array3::from_shape_fn((height, width, Self::CHANNELS), |(_, _, c)| rgb[c]);
        Self { pixels }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn pixels(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// Rows `y1..y2`, columns `x1..x2`, all channels.
    pub fn region(&self, y1: usize, y2: usize, x1: usize, x2: usize) -> ArrayView3<'_, u8> {
        self.pixels.slice(s![y1..y2, x1..x2, ..])
    }

    pub fn luminance(&self) -> Array2<u8> {
        luminance(self.pixels.view())
    }
}

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// White `width x height` image with a black square of side `side` centered
/// in each cell of a `rows x cols` grid.
pub fn squares_image(width: u32, height: u32, rows: u32, cols: u32, side: u32) -> RgbImage {
    let (cell_w, cell_h) = (width / cols, height / rows);
    let mut img = RgbImage::from_pixel(width, height, WHITE);
    for r in 0..rows {
        for c in 0..cols {
            let x0 = c * cell_w + (cell_w - side) / 2;
            let y0 = r * cell_h + (cell_h - side) / 2;
            for y in y0..y0 + side {
                for x in x0..x0 + side {
                    img.put_pixel(x, y, BLACK);
                }
            }
        }
    }
    img
}

/// 400x400, one 150px square per quadrant.
pub fn quad_squares() -> RgbImage {
    squares_image(400, 400, 2, 2, 150)
}

pub fn save_png(img: &RgbImage, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).expect("write fixture png");
    path
}

pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

use jpeg_encoder::{ColorType, Encoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

fn jpeg_dimensions(cols: usize, rows: usize) -> Result<(u16, u16)> {
    match (u16::try_from(cols), u16::try_from(rows)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(Error::InvalidArgument {
            arg: "jpeg_dimensions",
            value: format!("{}x{}", cols, rows),
        }),
    }
}

pub fn write_rgb_jpeg(
    output: &Path,
    cols: usize,
    rows: usize,
    rgb_data: &[u8],
    quality: u8,
) -> Result<()> {
    let (width, height) = jpeg_dimensions(cols, rows)?;
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let encoder = Encoder::new(&mut writer, quality);
    encoder.encode(rgb_data, width, height, ColorType::Rgb)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_file_decodes_with_same_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let data = vec![128u8; 16 * 8 * 3];
        write_rgb_jpeg(&path, 16, 8, &data, 95).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn rejects_unencodable_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        assert!(write_rgb_jpeg(&path, 0, 8, &[], 95).is_err());
        assert!(write_rgb_jpeg(&path, 70_000, 1, &[], 95).is_err());
        assert!(!path.exists());
    }
}

use clap::Parser;
use std::path::PathBuf;

use pdfsplit::SplitParams;
use pdfsplit::types::PartitionStrategy;
#[cfg(feature = "archive")]
use pdfsplit::types::PackagingMode;

#[derive(Parser)]
#[command(name = "pdfsplit", version, about = "Extract PDF images and split them into sub-images")]
pub struct CliArgs {
    /// Input PDF (single document mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Single image to split
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Directory of .jpg/.jpeg/.png images (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output root directory
    #[arg(short, long, default_value = "output_images")]
    pub output_dir: PathBuf,

    /// Number of sub-images per source image (1-100, default 8)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub count: Option<u16>,

    /// Partition strategy (grid or contour)
    #[arg(long, value_enum)]
    pub strategy: Option<PartitionStrategy>,

    /// Luminance at or above which a pixel counts as background when trimming
    #[arg(long)]
    pub threshold: Option<u8>,

    /// JPEG quality for the written sub-images (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// JSON file with split parameters; flags given on the command line win
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Zip the results of a PDF run (chapter keeps directories, flat does not)
    #[cfg(feature = "archive")]
    #[arg(long, value_enum)]
    pub package: Option<PackagingMode>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Print progress events and the final report as JSON lines
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl CliArgs {
    /// Merge the optional config file with explicit flags.
    pub fn split_params(&self) -> pdfsplit::Result<SplitParams> {
        let mut params = match &self.config {
            Some(path) => SplitParams::from_json_file(path)?,
            None => SplitParams::default(),
        };
        if let Some(count) = self.count {
            params.subimage_count = count as usize;
        }
        if let Some(strategy) = self.strategy {
            params.strategy = strategy;
        }
        if let Some(threshold) = self.threshold {
            params.background_threshold = threshold;
        }
        if let Some(quality) = self.quality {
            params.jpeg_quality = quality;
        }
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::parse_from(["pdfsplit", "--image", "a.png", "-n", "4", "--strategy", "contour"]);
        let params = args.split_params().unwrap();
        assert_eq!(params.subimage_count, 4);
        assert_eq!(params.strategy, PartitionStrategy::Contour);
        assert_eq!(args.output_dir, PathBuf::from("output_images"));
    }

    #[test]
    fn count_out_of_range_is_rejected() {
        assert!(CliArgs::try_parse_from(["pdfsplit", "-n", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["pdfsplit", "-n", "101"]).is_err());
    }
}

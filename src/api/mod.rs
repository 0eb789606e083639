//! High-level, ergonomic library API: split single images or whole directories
//! to disk, run the full PDF extract-and-split job, and package the results.
//! Prefer these entrypoints over the low-level `core` modules when integrating.
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::image::SourceImage;
use crate::core::params::SplitParams;
use crate::core::processing::pipeline::split_image;
use crate::core::processing::save::save_subimages;
use crate::error::{Error, Result};
use crate::io::pdf::{extract_pdf_images, write_extracted_images};
use crate::io::reader::load_source_image;

pub mod progress;

pub use progress::{NoProgress, ProgressEvent, ProgressSink};

#[cfg(feature = "archive")]
use crate::io::writers::archive::package_zip;
#[cfg(feature = "archive")]
use crate::types::PackagingMode;

/// Extensions picked up by directory batch mode, compared case-insensitively
pub const SOURCE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Per-image result in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageStatus {
    Split { count: usize },
    /// The partitioner refused the image
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReport {
    pub name: String,
    #[serde(flatten)]
    pub status: ImageStatus,
    pub files: Vec<PathBuf>,
}

/// Result of a batch run (directory or PDF)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: usize,
    pub split: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Total sub-images written
    pub subimages: usize,
    pub images: Vec<ImageReport>,
}

impl BatchReport {
    /// Fold one image outcome into the report and return its status.
    pub fn record(&mut self, name: impl Into<String>, outcome: Result<SplitOutcome>) -> ImageStatus {
        self.processed += 1;
        let (status, files) = match outcome {
            Ok(SplitOutcome::Split(files)) => {
                self.split += 1;
                self.subimages += files.len();
                (ImageStatus::Split { count: files.len() }, files)
            }
            Ok(SplitOutcome::Skipped { reason }) => {
                self.skipped += 1;
                (ImageStatus::Skipped { reason }, Vec::new())
            }
            Err(e) => {
                self.errors += 1;
                (ImageStatus::Failed { reason: e.to_string() }, Vec::new())
            }
        };
        self.images.push(ImageReport {
            name: name.into(),
            status: status.clone(),
            files,
        });
        status
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} images split, {} sub-images ({} skipped, {} errors)",
            self.split, self.processed, self.subimages, self.skipped, self.errors
        )
    }
}

/// Outcome of splitting one image to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Paths of the written `subimg_{i}.jpg` files, in order
    Split(Vec<PathBuf>),
    Skipped { reason: String },
}

/// Split one image file into `output_dir/subimg_{i}.jpg`.
///
/// A partition refusal is `Ok(SplitOutcome::Skipped)`; unreadable input and
/// write failures are errors.
pub fn split_image_file(input: &Path, output_dir: &Path, params: &SplitParams) -> Result<SplitOutcome> {
    params.validate()?;
    let image = load_source_image(input)?;
    split_source_to_dir(&image, output_dir, params)
}

/// Split an already decoded image into `output_dir`. Nothing is written when
/// the partition is refused.
pub fn split_source_to_dir(
    image: &SourceImage,
    output_dir: &Path,
    params: &SplitParams,
) -> Result<SplitOutcome> {
    let cells = match split_image(image, params) {
        Ok(cells) => cells,
        Err(refusal) => {
            return Ok(SplitOutcome::Skipped {
                reason: refusal.to_string(),
            });
        }
    };
    if cells.is_empty() {
        return Err(Error::EmptyBatch {
            name: output_dir.display().to_string(),
        });
    }

    let files = save_subimages(&cells, output_dir, params.jpeg_quality)?;
    Ok(SplitOutcome::Split(files))
}

fn split_to_report(
    report: &mut BatchReport,
    name: &str,
    input: &Path,
    output_dir: &Path,
    params: &SplitParams,
) -> ImageStatus {
    let outcome = load_source_image(input)
        .and_then(|image| split_source_to_dir(&image, output_dir, params));
    let status = report.record(name, outcome);
    match &status {
        ImageStatus::Split { count } => info!("Extracted {} sub-images from {}", count, name),
        ImageStatus::Skipped { reason } => warn!("Skipped {}: {}", name, reason),
        ImageStatus::Failed { reason } => warn!("Error processing {}: {}", name, reason),
    }
    status
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

/// Image files directly inside `input_dir`, sorted by path
pub fn iterate_source_images(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && has_source_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files.into_iter())
}

/// Split every image in `input_dir` into `output_dir/split_{stem}/`.
/// Per-image failures are recorded in the report and never abort the batch.
pub fn process_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    params: &SplitParams,
) -> Result<BatchReport> {
    params.validate()?;
    fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for path in iterate_source_images(input_dir)? {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| stem.clone());
        let dest = output_dir.join(format!("split_{}", stem));
        split_to_report(&mut report, &name, &path, &dest, params);
    }

    info!("Directory batch finished: {}", report.summary());
    Ok(report)
}

/// Replace every character that is not alphanumeric with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Summary of one PDF run, also written to `output_root/{name}_report.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfReport {
    /// File name of the input PDF
    pub source: String,
    /// Sanitized stem shared by the output directories
    pub name: String,
    pub generated_at: DateTime<Utc>,
    pub output_root: PathBuf,
    /// `output_root/{name}`, holding one `split_*` directory per image
    pub output_dir: PathBuf,
    /// `output_root/temp_{name}`, holding the extracted images
    pub extracted_dir: PathBuf,
    pub extracted: usize,
    pub params: SplitParams,
    pub batch: BatchReport,
}

impl PdfReport {
    /// Sidecar location, next to (not inside) the packaged results directory
    pub fn report_path(&self) -> PathBuf {
        self.output_root.join(format!("{}_report.json", self.name))
    }
}

/// Extract every embedded image of `pdf` and split each into sub-images.
///
/// Layout under `output_root`, with `name` the sanitized PDF stem:
/// - `temp_{name}/page{N}_img{M}.{ext}`: extracted images
/// - `{name}/split_page{N}_img{M}/subimg_{i}.jpg`: sub-images, recreated each run
/// - `{name}_report.json`: the serialized `PdfReport`
pub fn process_pdf_to_path(
    pdf: &Path,
    output_root: &Path,
    params: &SplitParams,
    progress: &dyn ProgressSink,
) -> Result<PdfReport> {
    params.validate()?;
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| Error::InvalidArgument {
            arg: "pdf",
            value: pdf.display().to_string(),
        })?;
    let source = pdf
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| stem.clone());
    let name = sanitize_name(&stem);

    progress.emit(ProgressEvent::Started {
        source: source.clone(),
    });
    info!("Processing PDF {:?} into {:?}", pdf, output_root);

    progress.emit(ProgressEvent::Extracting);
    let images = extract_pdf_images(pdf)?;
    let extracted_dir = output_root.join(format!("temp_{}", name));
    let extracted_paths = write_extracted_images(&images, &extracted_dir)?;
    progress.emit(ProgressEvent::Extracted {
        count: images.len(),
    });

    let output_dir = output_root.join(&name);
    if output_dir.exists() {
        debug!("Removing previous results in {:?}", output_dir);
        fs::remove_dir_all(&output_dir)?;
    }
    fs::create_dir_all(&output_dir)?;

    let mut batch = BatchReport::default();
    let total = images.len();
    for (i, (image, path)) in images.iter().zip(&extracted_paths).enumerate() {
        let image_name = image.file_name();
        progress.emit(ProgressEvent::Splitting {
            index: i + 1,
            total,
            name: image_name.clone(),
        });
        let dest = output_dir.join(format!("split_{}", image.stem()));
        let status = split_to_report(&mut batch, &image_name, path, &dest, params);
        progress.emit(ProgressEvent::ImageDone {
            index: i + 1,
            total,
            name: image_name,
            status,
        });
    }

    let report = PdfReport {
        source,
        name,
        generated_at: Utc::now(),
        output_root: output_root.to_path_buf(),
        output_dir,
        extracted_dir,
        extracted: total,
        params: params.clone(),
        batch,
    };
    write_report(&report)?;

    info!("PDF run finished: {}", report.batch.summary());
    progress.emit(ProgressEvent::Finished {
        report: report.batch.clone(),
    });
    Ok(report)
}

fn write_report(report: &PdfReport) -> Result<()> {
    let path = report.report_path();
    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, report)?;
    debug!("Wrote report to {:?}", path);
    Ok(())
}

/// Zip the split results of a finished PDF run into
/// `output_root/{name}_results_{mode}.zip` and return the archive path.
#[cfg(feature = "archive")]
pub fn package_results(report: &PdfReport, mode: PackagingMode) -> Result<PathBuf> {
    let zip_path = report
        .output_root
        .join(format!("{}_results_{}.zip", report.name, mode.as_str()));
    package_zip(&report.output_dir, &zip_path, mode)?;
    Ok(zip_path)
}

/// A PDF run executing on a worker thread
pub struct JobHandle {
    /// Progress events; the channel closes when the job ends
    pub events: Receiver<ProgressEvent>,
    handle: JoinHandle<Result<PdfReport>>,
}

impl JobHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the job. A panic on the worker becomes `Error::Processing`.
    pub fn join(self) -> Result<PdfReport> {
        self.handle
            .join()
            .map_err(|_| Error::Processing("PDF job panicked".to_string()))?
    }
}

/// Run `process_pdf_to_path` on a background thread, streaming progress
/// events through the returned handle.
pub fn spawn_pdf_job(pdf: PathBuf, output_root: PathBuf, params: SplitParams) -> JobHandle {
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || process_pdf_to_path(&pdf, &output_root, &params, &tx));
    JobHandle { events: rx, handle }
}

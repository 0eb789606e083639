#![doc = r#"
pdfsplit: extract embedded raster images from PDF documents and split each one
into uniform, whitespace-trimmed sub-images.

Each source image is carved into a near-square grid of cells (or, with the
contour strategy, into its detected foreground regions), every cell is trimmed
of its near-white border, and all cells are then centered on a shared white
canvas so the resulting JPEGs have identical dimensions. It powers the
`pdfsplit` CLI and can be embedded in your own Rust applications.

Stability
---------
The public library API is experimental in initial releases and may evolve as the
crate stabilizes. Breaking changes can occur.

Add dependency
--------------
```toml
[dependencies]
pdfsplit = { version = "0.1", features = ["full"] }
```

Quick start: split one image to a directory
-------------------------------------------
```rust,no_run
use std::path::Path;
use pdfsplit::{split_image_file, SplitOutcome, SplitParams};

fn main() -> pdfsplit::Result<()> {
    let params = SplitParams::with_count(8);
    match split_image_file(Path::new("figure.png"), Path::new("out/figure"), &params)? {
        SplitOutcome::Split(files) => println!("wrote {} sub-images", files.len()),
        SplitOutcome::Skipped { reason } => println!("skipped: {}", reason),
    }
    Ok(())
}
```

Process a whole PDF with progress
---------------------------------
```rust,no_run
use std::path::Path;
use pdfsplit::{process_pdf_to_path, ProgressEvent, SplitParams};

fn main() -> pdfsplit::Result<()> {
    let report = process_pdf_to_path(
        Path::new("chapter3.pdf"),
        Path::new("output_images"),
        &SplitParams::default(),
        &|event: ProgressEvent| eprintln!("[{:>3}%] {}", event.percent(), event),
    )?;
    println!("{}", report.batch.summary());
    Ok(())
}
```

Run a PDF job on a worker thread
--------------------------------
```rust,no_run
use std::path::PathBuf;
use pdfsplit::{spawn_pdf_job, SplitParams};

fn main() -> pdfsplit::Result<()> {
    let job = spawn_pdf_job(
        PathBuf::from("chapter3.pdf"),
        PathBuf::from("output_images"),
        SplitParams::default(),
    );
    for event in job.events.iter() {
        println!("{}", event);
    }
    let report = job.join()?;
    println!("results in {}", report.output_dir.display());
    Ok(())
}
```

In-memory splitting (no disk I/O)
---------------------------------
```rust
use pdfsplit::{split_image, SourceImage, SplitParams};

fn tiles(image: &SourceImage) -> usize {
    match split_image(image, &SplitParams::with_count(4)) {
        Ok(cells) => cells.len(),
        Err(refusal) => {
            eprintln!("{}", refusal);
            0
        }
    }
}
```

Feature flags
-------------
- `archive` (default): zip packaging of PDF run results (`package_results`).
- `full`: all features.

Error handling
--------------
All fallible APIs return `pdfsplit::Result<T>` with a structured `pdfsplit::Error`.
Partition refusals are not errors at the file level: they surface as
`SplitOutcome::Skipped` and as `ImageStatus::Skipped` in batch reports.

Logging
-------
The library logs through `tracing`; install a subscriber (as the CLI does with
`--log`) to see stage milestones and per-image geometry.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Re-exports for a stable, ergonomic public API
pub use core::image::SourceImage;
pub use core::params::SplitParams;
pub use core::partition::{Cell, ContourPartitioner, GridLayout, GridPartitioner, PartitionError, Partitioner};
pub use core::processing::pipeline::split_image;
pub use error::{Error, Result};
pub use types::{PackagingMode, PartitionStrategy};

pub use io::{ExtractedImage, extract_pdf_images, load_source_image};

pub use api::{
    BatchReport, ImageReport, ImageStatus, JobHandle, NoProgress, PdfReport, ProgressEvent,
    ProgressSink, SplitOutcome, process_directory_to_path, process_pdf_to_path, spawn_pdf_job,
    split_image_file,
};

#[cfg(feature = "archive")]
pub use api::package_results;

use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;

use pdfsplit::api::{self, BatchReport, ImageStatus, ProgressEvent, SplitOutcome};
use pdfsplit::SplitParams;

use super::args::CliArgs;
use super::errors::AppError;

enum Input {
    Pdf(PathBuf),
    Image(PathBuf),
    Directory(PathBuf),
}

fn select_input(args: &CliArgs) -> Result<Input, AppError> {
    let mut given = Vec::new();
    if let Some(p) = &args.input {
        given.push(Input::Pdf(p.clone()));
    }
    if let Some(p) = &args.image {
        given.push(Input::Image(p.clone()));
    }
    if let Some(p) = &args.input_dir {
        given.push(Input::Directory(p.clone()));
    }

    match given.len() {
        0 => Err(AppError::MissingArgument {
            arg: "--input, --image or --input-dir".to_string(),
        }),
        1 => Ok(given.remove(0)),
        _ => Err(AppError::ConflictingInputs {
            args: "--input, --image, --input-dir".to_string(),
        }),
    }
}

fn print_event(event: &ProgressEvent, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        eprintln!("[{:>3}%] {}", event.percent(), event);
    }
    Ok(())
}

fn print_batch(report: &BatchReport, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    for image in &report.images {
        match &image.status {
            ImageStatus::Split { count } => eprintln!("  {}: {} sub-images", image.name, count),
            ImageStatus::Skipped { reason } => eprintln!("  {}: skipped ({})", image.name, reason),
            ImageStatus::Failed { reason } => eprintln!("  {}: failed ({})", image.name, reason),
        }
    }
    eprintln!("{}", report.summary());
    Ok(())
}

fn run_pdf(pdf: PathBuf, args: &CliArgs, params: SplitParams) -> Result<(), AppError> {
    let job = api::spawn_pdf_job(pdf, args.output_dir.clone(), params);
    for event in job.events.iter() {
        print_event(&event, args.json)?;
    }
    let report = job.join()?;
    info!("Results written to {:?}", report.output_dir);

    #[cfg(feature = "archive")]
    if let Some(mode) = args.package {
        let zip_path = api::package_results(&report, mode)?;
        if args.json {
            println!("{}", serde_json::json!({ "event": "packaged", "path": zip_path }));
        } else {
            eprintln!("Packaged results into {}", zip_path.display());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}

fn run_image(image: &Path, args: &CliArgs, params: &SplitParams) -> Result<(), AppError> {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::MissingArgument {
            arg: "--image <file>".to_string(),
        })?;
    let dest = args.output_dir.join(format!("split_{}", stem));

    // unlike batch modes, an unreadable image fails the run
    let outcome = api::split_image_file(image, &dest, params)?;
    if let SplitOutcome::Split(files) = &outcome {
        info!("Wrote {} sub-images to {:?}", files.len(), dest);
    }

    let mut report = BatchReport::default();
    report.record(image.display().to_string(), Ok(outcome));
    print_batch(&report, args.json)
}

fn run_directory(input_dir: &Path, args: &CliArgs, params: &SplitParams) -> Result<(), AppError> {
    info!("Starting batch processing from directory: {:?}", input_dir);
    info!("Output directory: {:?}", args.output_dir);
    let report = api::process_directory_to_path(input_dir, &args.output_dir, params)?;
    print_batch(&report, args.json)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let input = select_input(&args)?;
    let params = args.split_params()?;
    info!(
        "Splitting into {} sub-images ({} strategy, background >= {})",
        params.subimage_count, params.strategy, params.background_threshold
    );

    match input {
        Input::Pdf(pdf) => run_pdf(pdf, &args, params)?,
        Input::Image(image) => run_image(&image, &args, &params)?,
        Input::Directory(dir) => run_directory(&dir, &args, &params)?,
    }
    Ok(())
}

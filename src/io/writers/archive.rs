use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::types::PackagingMode;

/// Archive entry name for `file` found under `root`.
///
/// Chapter mode keeps the relative path (always `/`-separated); flat mode
/// prefixes the file name with its parent directory name.
pub fn archive_entry_name(root: &Path, file: &Path, mode: PackagingMode) -> Option<String> {
    match mode {
        PackagingMode::Chapter => {
            let relative = file.strip_prefix(root).ok()?;
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            (!parts.is_empty()).then(|| parts.join("/"))
        }
        PackagingMode::Flat => {
            let parent = file.parent()?.file_name()?.to_string_lossy();
            let name = file.file_name()?.to_string_lossy();
            Some(format!("{}_{}", parent, name))
        }
    }
}

/// Zip every file below `root` into `zip_path`. Returns the number of entries.
pub fn package_zip(root: &Path, zip_path: &Path, mode: PackagingMode) -> Result<usize> {
    let file = File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut written = 0;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() || entry.path() == zip_path {
            continue;
        }
        let Some(name) = archive_entry_name(root, entry.path(), mode) else {
            continue;
        };

        debug!("Adding {:?} as {}", entry.path(), name);
        zip.start_file(name, options)?;
        let mut src = File::open(entry.path())?;
        io::copy(&mut src, &mut zip)?;
        written += 1;
    }

    zip.finish()?;
    info!("Packaged {} files into {:?} ({} mode)", written, zip_path, mode);
    Ok(written)
}

//! Zipped input products.
//!
//! Products are often distributed as a zip file holding a single top-level
//! folder (`*.SAFE` for Sentinel-2). They are extracted into the run's scratch
//! workspace and the folder becomes the effective input.

use crate::discovery::has_extension;
use crate::error::{CoreError, CoreResult};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

const ARCHIVE_EXTENSION: &str = ".zip";
const EXTRACTION_DIR: &str = "input";

pub fn is_zip_archive(path: &Path) -> bool {
    path.is_file() && has_extension(path, ARCHIVE_EXTENSION)
}

/// Extracts `archive_path` below `scratch_dir` and returns the effective input.
pub fn extract_input(archive_path: &Path, scratch_dir: &Path) -> CoreResult<PathBuf> {
    let destination = scratch_dir.join(EXTRACTION_DIR);
    fs::create_dir_all(&destination)?;

    log::info!(
        "Extracting {} into {}",
        archive_path.display(),
        destination.display()
    );

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| CoreError::Archive(format!("{}: {}", archive_path.display(), e)))?;
    log::debug!("Archive holds {} entries", archive.len());
    archive
        .extract(&destination)
        .map_err(|e| CoreError::Archive(format!("{}: {}", archive_path.display(), e)))?;

    let entries: Vec<PathBuf> = fs::read_dir(&destination)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;

    match entries.as_slice() {
        [single] if single.is_dir() => Ok(single.clone()),
        _ => Ok(destination),
    }
}

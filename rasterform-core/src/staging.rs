//! Local execution staging.
//!
//! Inputs on slow or remote mounts can be converted in a local workspace: the
//! input tree is copied into a temporary directory, the conversion writes its
//! output there, and the results are copied back to the requested
//! destination. The workspace is removed on every exit path.

use crate::config::ConversionRequest;
use crate::error::{CoreError, CoreResult};
use crate::external::RasterBackend;
use crate::materializer::{OutputPaths, copy_atomically, ensure_outputs_distinct, is_directory_like};
use crate::pipeline::{ConversionReport, convert};
use crate::temp_files::create_temp_dir;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const STAGED_INPUT_DIR: &str = "input";
const STAGED_OUTPUT_DIR: &str = "output";

/// Recursively copies `source` into `destination`. Returns the number of files copied.
pub fn copy_tree(source: &Path, destination: &Path) -> CoreResult<u64> {
    let mut copied = 0;
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry.path().strip_prefix(source).map_err(|_| {
            CoreError::InvalidInput(format!(
                "{} is outside of {}",
                entry.path().display(),
                source.display()
            ))
        })?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Directory copied into the workspace for `input`.
///
/// A file input brings its whole parent directory along so that sibling
/// band and metadata files stay discoverable.
fn staging_root(input: &Path) -> PathBuf {
    if input.is_dir() {
        return input.to_path_buf();
    }
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn file_name_of(path: &Path) -> CoreResult<&std::ffi::OsStr> {
    path.file_name().ok_or_else(|| {
        CoreError::InvalidInput(format!("{} does not name a file", path.display()))
    })
}

/// Copies a staged artifact to its place under the real destination.
fn copy_back(staged: &Path, destination_dir: &Path) -> CoreResult<PathBuf> {
    let target = destination_dir.join(file_name_of(staged)?);
    log::debug!("Copying {} back to {}", staged.display(), target.display());
    copy_atomically(staged, &target)?;
    Ok(target)
}

/// Runs `request` inside a local temporary workspace.
pub fn convert_staged(
    request: &ConversionRequest,
    backend: &dyn RasterBackend,
) -> CoreResult<ConversionReport> {
    let workspace = create_temp_dir("rasterform-staging-")?;
    log::info!("Staging input in local workspace {}", workspace.path().display());

    let input = request.input();
    let root = staging_root(input);
    let staged_root = workspace.path().join(STAGED_INPUT_DIR);
    let copied = copy_tree(&root, &staged_root)?;
    log::debug!("Staged {} file(s) from {}", copied, root.display());

    let staged_input = if input.is_dir() {
        staged_root.clone()
    } else {
        staged_root.join(file_name_of(input)?)
    };

    let staged_output_dir = workspace.path().join(STAGED_OUTPUT_DIR);
    fs::create_dir_all(&staged_output_dir)?;

    let requested = request.output();
    let (staged_output, destination_dir) = if is_directory_like(requested) {
        (staged_output_dir, requested.to_path_buf())
    } else {
        let destination_dir = match requested.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (staged_output_dir.join(file_name_of(requested)?), destination_dir)
    };

    let staged_request = request.relocated(staged_input, staged_output);
    let report = convert(&staged_request, backend)?;

    let final_paths = OutputPaths {
        raster_path: destination_dir.join(file_name_of(&report.output.raster_path)?),
        metadata_path: match &report.output.metadata_path {
            Some(staged) => Some(destination_dir.join(file_name_of(staged)?)),
            None => None,
        },
    };
    // Check against the originals the staged sources were copied from.
    let original_sources: Vec<PathBuf> = report
        .tiles
        .iter()
        .flat_map(|tile| tile.ordered_files.iter())
        .filter_map(|staged| staged.strip_prefix(&staged_root).ok())
        .map(|relative| root.join(relative))
        .collect();
    ensure_outputs_distinct(&final_paths, original_sources.iter().map(PathBuf::as_path))?;

    let raster_path = copy_back(&report.output.raster_path, &destination_dir)?;
    let metadata_path = match &report.output.metadata_path {
        Some(staged) => Some(copy_back(staged, &destination_dir)?),
        None => None,
    };

    log::info!("Copied results back to {}", destination_dir.display());

    Ok(ConversionReport {
        output: OutputPaths {
            raster_path,
            metadata_path,
        },
        ..report
    })
}

//! Output materialization.
//!
//! Resolves where the raster and its metadata sidecar go, then writes both.
//! Every write goes to a partial file in the destination directory first and
//! is renamed into place only once complete, so a failed run never replaces a
//! previous output with a truncated one.

use crate::config::OutputFormat;
use crate::error::{CoreError, CoreResult};
use crate::external::{RasterBackend, VirtualMosaic, WarpOptions};
use crate::temp_files::create_partial_file;
use std::fs;
use std::io;
use std::path::{Path, PathBuf, is_separator};

/// Sidecar extension used when the metadata source has none.
const DEFAULT_METADATA_EXTENSION: &str = "xml";

/// Final locations of the run's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub raster_path: PathBuf,
    /// Present only when there is a metadata source to copy.
    pub metadata_path: Option<PathBuf>,
}

/// An existing directory, or a path spelled with a trailing separator.
pub(crate) fn is_directory_like(path: &Path) -> bool {
    path.is_dir()
        || path
            .to_string_lossy()
            .chars()
            .last()
            .is_some_and(is_separator)
}

/// Derives the output paths of a run.
///
/// A destination that is an existing directory, or that ends with a path
/// separator, receives `<base_name><format extension>`. Any other destination
/// is used verbatim. The sidecar takes the raster path with the metadata
/// source's extension in lower case.
pub fn resolve_output_paths(
    requested: &Path,
    base_name: &str,
    format: OutputFormat,
    metadata_source: Option<&Path>,
) -> OutputPaths {
    let raster_path = if is_directory_like(requested) {
        requested.join(format!("{}{}", base_name, format.extension()))
    } else {
        requested.to_path_buf()
    };

    let metadata_path = metadata_source.map(|source| {
        let extension = source
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| DEFAULT_METADATA_EXTENSION.to_string());
        raster_path.with_extension(extension)
    });

    OutputPaths {
        raster_path,
        metadata_path,
    }
}

/// Resolves `path` for comparison, including paths that do not exist yet.
fn comparable_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Fails when an output would land on one of the run's own source files.
pub fn ensure_outputs_distinct<'a, I>(paths: &OutputPaths, sources: I) -> CoreResult<()>
where
    I: IntoIterator<Item = &'a Path>,
{
    let outputs: Vec<(&Path, PathBuf)> = std::iter::once(paths.raster_path.as_path())
        .chain(paths.metadata_path.as_deref())
        .map(|output| (output, comparable_path(output)))
        .collect();

    for source in sources {
        let source_path = comparable_path(source);
        if let Some((output, _)) = outputs.iter().find(|(_, resolved)| *resolved == source_path) {
            return Err(CoreError::InvalidInput(format!(
                "The output {} would overwrite the input file {}",
                output.display(),
                source.display()
            )));
        }
    }
    Ok(())
}

/// Copies `source` to `destination` through a partial file.
pub fn copy_atomically(source: &Path, destination: &Path) -> CoreResult<()> {
    let partial = create_partial_file(destination)?;
    fs::copy(source, &partial)?;
    partial.persist(destination).map_err(io::Error::from)?;
    Ok(())
}

/// Warps `mosaics` into the final raster and copies the metadata sidecar.
pub fn materialize(
    backend: &dyn RasterBackend,
    mosaics: &[VirtualMosaic],
    paths: &OutputPaths,
    format: OutputFormat,
    projection: Option<&str>,
    metadata_source: Option<&Path>,
) -> CoreResult<()> {
    if mosaics.is_empty() {
        return Err(CoreError::EmptyResult(
            "There are no mosaics to write to the output".to_string(),
        ));
    }

    let options = WarpOptions::new(format, projection.map(str::to_string));
    let partial = create_partial_file(&paths.raster_path)?;

    log::info!(
        "Writing {} tile(s) to {} ({})",
        mosaics.len(),
        paths.raster_path.display(),
        format
    );
    if let Err(e) = backend.warp(&partial, mosaics, &options) {
        log::error!("Failed to write {}: {}", paths.raster_path.display(), e);
        return Err(e);
    }
    partial.persist(&paths.raster_path).map_err(io::Error::from)?;

    if let (Some(source), Some(destination)) = (metadata_source, paths.metadata_path.as_deref()) {
        log::info!(
            "Copying metadata {} to {}",
            source.display(),
            destination.display()
        );
        copy_atomically(source, destination)?;
    }

    Ok(())
}

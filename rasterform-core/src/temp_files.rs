//! Temporary file management utilities.
//!
//! Scratch workspaces hold the virtual mosaics of a run; partial files hold
//! outputs until they are complete. Both rely on the tempfile crate so that
//! cleanup happens through `Drop`, including on error paths.

use crate::error::CoreResult;
use std::fs;
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, TempDir, TempPath};

/// Creates a scratch directory in the system temp location. Auto-cleaned when dropped.
pub fn create_temp_dir(prefix: &str) -> CoreResult<TempDir> {
    Ok(TempFileBuilder::new().prefix(prefix).tempdir()?)
}

/// Reserves a hidden partial file next to `final_path`.
///
/// The file is named `.<name>.partial-XXXXXX<ext>` so that it lives on the
/// same filesystem as the destination and can be renamed over it. It is
/// deleted when the returned path is dropped without being persisted.
pub fn create_partial_file(final_path: &Path) -> CoreResult<TempPath> {
    let dir = match final_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let name = final_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = final_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let file = TempFileBuilder::new()
        .prefix(&format!(".{name}.partial-"))
        .suffix(&suffix)
        .tempfile_in(dir)?;
    Ok(file.into_temp_path())
}

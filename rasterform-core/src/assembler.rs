//! Tile assembly: one virtual mosaic per resolved tile.

use crate::error::{CoreError, CoreResult};
use crate::external::{RasterBackend, VirtualMosaic};
use crate::resolver::ResolvedTile;
use std::path::{Path, PathBuf};

/// Path of the mosaic for the `index`-th tile of a run.
pub fn mosaic_path(scratch_dir: &Path, index: usize) -> PathBuf {
    scratch_dir.join(format!("tile_{index}.vrt"))
}

/// Stacks `ordered_files` into a virtual mosaic inside `scratch_dir`.
///
/// With `separate` every file becomes one band, in the given order. Without
/// it the files are mosaicked as is, which is how single pre-merged rasters
/// pass through.
pub fn assemble(
    backend: &dyn RasterBackend,
    ordered_files: &[PathBuf],
    separate: bool,
    scratch_dir: &Path,
    index: usize,
) -> CoreResult<VirtualMosaic> {
    if ordered_files.is_empty() {
        return Err(CoreError::EmptyResult(format!(
            "There are no image files to assemble for tile {}",
            index
        )));
    }

    let destination = mosaic_path(scratch_dir, index);
    log::debug!(
        "Assembling {} file(s) into {} (separate bands: {})",
        ordered_files.len(),
        destination.display(),
        separate
    );
    backend.build_virtual_mosaic(ordered_files, separate, &destination)
}

/// Assembles a resolved tile using its own stacking mode.
pub fn assemble_tile(
    backend: &dyn RasterBackend,
    tile: &ResolvedTile,
    scratch_dir: &Path,
    index: usize,
) -> CoreResult<VirtualMosaic> {
    assemble(backend, &tile.ordered_files, tile.separate_bands, scratch_dir, index)
}

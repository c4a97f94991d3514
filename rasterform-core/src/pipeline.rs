//! The conversion run.
//!
//! Ties the stages together for one [`ConversionRequest`]: locate the scene,
//! assemble a virtual mosaic per tile, then materialize the output. Every
//! intermediate file lives in a scratch workspace that is removed when the
//! run ends, whether it succeeded or not.

use crate::archive::{extract_input, is_zip_archive};
use crate::assembler::assemble_tile;
use crate::config::ConversionRequest;
use crate::error::{CoreError, CoreResult};
use crate::external::RasterBackend;
use crate::locator::locator_for;
use crate::materializer::{OutputPaths, ensure_outputs_distinct, materialize, resolve_output_paths};
use crate::resolver::ResolvedTile;
use crate::staging::convert_staged;
use crate::temp_files::create_temp_dir;
use std::path::PathBuf;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub output: OutputPaths,
    /// Tiles merged into the output, in processing order.
    pub tiles: Vec<ResolvedTile>,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<String>,
    /// Projection the output was warped to, if any.
    pub projection: Option<String>,
}

impl ConversionReport {
    /// Number of bands written when it follows from the band files alone.
    pub fn band_count(&self) -> Option<usize> {
        let mut total = 0;
        for tile in &self.tiles {
            if !tile.separate_bands {
                return None;
            }
            total = total.max(tile.ordered_files.len());
        }
        Some(total)
    }
}

/// Runs a conversion, staging it locally when the request asks for it.
pub fn convert(request: &ConversionRequest, backend: &dyn RasterBackend) -> CoreResult<ConversionReport> {
    if request.local_execution() {
        return convert_staged(request, backend);
    }
    convert_in_place(request, backend)
}

fn convert_in_place(request: &ConversionRequest, backend: &dyn RasterBackend) -> CoreResult<ConversionReport> {
    log::info!(
        "Converting {} input {} to {}",
        request.sensor(),
        request.input().display(),
        request.format()
    );

    let scratch = create_temp_dir("rasterform-")?;
    log::debug!("Scratch workspace: {}", scratch.path().display());

    let input = if is_zip_archive(request.input()) {
        extract_input(request.input(), scratch.path())?
    } else {
        request.input().to_path_buf()
    };

    let scene = locator_for(request.sensor()).locate(&input, request, backend)?;
    if scene.tiles.is_empty() {
        return Err(CoreError::EmptyResult(format!(
            "No tiles were found under {}",
            input.display()
        )));
    }

    let mut mosaics = Vec::with_capacity(scene.tiles.len());
    for (index, tile) in scene.tiles.iter().enumerate() {
        mosaics.push(assemble_tile(backend, tile, scratch.path(), index)?);
    }

    let projection = request
        .projection()
        .map(str::to_string)
        .or_else(|| scene.projection.clone());
    let metadata_source = scene.metadata_source.as_deref();

    let output = resolve_output_paths(
        request.output(),
        &scene.base_name,
        request.format(),
        metadata_source,
    );
    let sources = scene
        .tiles
        .iter()
        .flat_map(|tile| tile.ordered_files.iter().map(PathBuf::as_path))
        .chain(metadata_source);
    ensure_outputs_distinct(&output, sources)?;

    materialize(
        backend,
        &mosaics,
        &output,
        request.format(),
        projection.as_deref(),
        metadata_source,
    )?;

    log::info!("Conversion complete: {}", output.raster_path.display());

    Ok(ConversionReport {
        output,
        tiles: scene.tiles,
        warnings: scene.warnings,
        projection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensorKind;
    use crate::external::{DatasetInfo, RecordingBackend};
    use std::fs::File;
    use std::path::PathBuf;

    #[test]
    fn test_requested_projection_wins() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        File::create(input.path().join("scene.tif")).unwrap();

        let request = ConversionRequest::builder()
            .input(input.path())
            .output(output.path())
            .sensor("spot")
            .projection("EPSG:4326")
            .build()
            .unwrap();
        let backend = RecordingBackend::new();

        let report = convert(&request, &backend).unwrap();

        assert_eq!(report.projection.as_deref(), Some("EPSG:4326"));
        assert_eq!(report.output.raster_path, output.path().join("scene.tif"));
        assert_eq!(report.band_count(), None);
        let warps = backend.warp_calls();
        assert_eq!(warps[0].options.dst_projection.as_deref(), Some("EPSG:4326"));
    }

    #[test]
    fn test_scratch_workspace_removed_after_run() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        File::create(input.path().join("scene.tif")).unwrap();

        let request = ConversionRequest::builder()
            .input(input.path())
            .output(output.path())
            .sensor(SensorKind::Spot.to_string())
            .build()
            .unwrap();
        let backend = RecordingBackend::new();
        convert(&request, &backend).unwrap();

        let mosaic: PathBuf = backend.mosaic_calls()[0].destination.clone();
        assert!(!mosaic.exists());
        assert!(!mosaic.parent().unwrap().exists());
    }

    #[test]
    fn test_unopenable_sentinel2_dataset() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        File::create(input.path().join("S2A_OPER_MTD_SAFL1C_PDMC_20200101.xml")).unwrap();

        let request = ConversionRequest::builder()
            .input(input.path())
            .output(output.path())
            .sensor("sentinel_2")
            .build()
            .unwrap();
        let backend = RecordingBackend::new().with_dataset("elsewhere", DatasetInfo::default());

        let err = convert(&request, &backend).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert!(backend.warp_calls().is_empty());
    }
}

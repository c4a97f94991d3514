//! Sentinel-2 L1C products.
//!
//! A full dataset is recognised by its `2A_OPER_MTD_SAFL1C_*.xml` metadata
//! file; its tiles are the sub-directories of the sibling `GRANULE` folder,
//! each holding band files under `IMG_DATA`. Without that metadata file the
//! input is treated as a single tile directory.

use super::{DatasetLocator, LocatedScene};
use crate::catalog::profile_for;
use crate::config::{ConversionRequest, SensorKind};
use crate::discovery::{find_file_matching, list_files, list_subdirectories};
use crate::error::{CoreError, CoreResult};
use crate::external::RasterBackend;
use crate::naming::{file_stem_string, scene_base_name};
use crate::resolver::{ResolvedTile, resolve};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static DATASET_METADATA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"2A_OPER_MTD_SAFL1C_(.*)\.xml").expect("dataset metadata pattern is valid")
});

const GRANULE_DIR: &str = "GRANULE";
const IMAGE_DATA_DIR: &str = "IMG_DATA";
const TILE_METADATA_FILE: &str = "metadata.xml";

#[derive(Debug, Clone, Copy, Default)]
pub struct Sentinel2Locator;

/// Resolves and checks the band files of one `IMG_DATA`-like directory.
fn resolve_tile(image_dir: &Path) -> CoreResult<ResolvedTile> {
    log::info!("Resolving Sentinel-2 tile: {}", image_dir.display());
    let profile = profile_for(SensorKind::Sentinel2);
    let tile = resolve(image_dir, &list_files(image_dir)?, profile);
    tile.enforce(SensorKind::Sentinel2, profile.missing_band_policy)?;
    Ok(tile)
}

impl Sentinel2Locator {
    fn locate_tile(&self, tile_dir: &Path) -> CoreResult<LocatedScene> {
        log::info!("Converting Sentinel-2 tile...");

        // A granule directory may be given instead of its IMG_DATA folder.
        let nested = tile_dir.join(IMAGE_DATA_DIR);
        let image_dir = if nested.is_dir() { nested } else { tile_dir.to_path_buf() };

        let tile = resolve_tile(&image_dir)?;
        let base_name = scene_base_name(SensorKind::Sentinel2, &tile.ordered_files[0]);

        let metadata = tile_dir.join(TILE_METADATA_FILE);
        let metadata_source = metadata.is_file().then_some(metadata);

        Ok(LocatedScene {
            tiles: vec![tile],
            base_name,
            projection: None,
            metadata_source,
            warnings: Vec::new(),
        })
    }

    fn locate_dataset(
        &self,
        metadata_file: &Path,
        request: &ConversionRequest,
        backend: &dyn RasterBackend,
    ) -> CoreResult<LocatedScene> {
        log::info!("Converting from Sentinel-2 dataset: {}", metadata_file.display());

        let dataset = backend.open(metadata_file)?.ok_or_else(|| {
            CoreError::InvalidInput(format!(
                "{} cannot be opened as a Sentinel-2 dataset",
                metadata_file.display()
            ))
        })?;

        let projection = match request.projection() {
            Some(_) => None,
            None => inherited_projection(&dataset.sub_datasets, backend)?,
        };

        let product_dir = metadata_file.parent().unwrap_or_else(|| Path::new("."));
        let granule_dir = product_dir.join(GRANULE_DIR);
        if !granule_dir.is_dir() {
            return Err(CoreError::StructuralMismatch(format!(
                "Cannot find GRANULE folder in the input dataset {}",
                product_dir.display()
            )));
        }

        let mut tiles = Vec::new();
        for granule in list_subdirectories(&granule_dir)? {
            let image_dir = granule.join(IMAGE_DATA_DIR);
            if !image_dir.is_dir() {
                return Err(CoreError::StructuralMismatch(format!(
                    "Cannot find the image folder (IMG_DATA) for the following granule: {}",
                    granule.display()
                )));
            }
            tiles.push(resolve_tile(&image_dir)?);
        }

        if tiles.is_empty() {
            return Err(CoreError::EmptyResult(format!(
                "The GRANULE folder {} contains no tiles",
                granule_dir.display()
            )));
        }

        Ok(LocatedScene {
            tiles,
            base_name: file_stem_string(metadata_file),
            projection,
            metadata_source: Some(metadata_file.to_path_buf()),
            warnings: Vec::new(),
        })
    }
}

/// Projection of the first declared sub-dataset.
fn inherited_projection(
    sub_datasets: &[crate::external::SubDataset],
    backend: &dyn RasterBackend,
) -> CoreResult<Option<String>> {
    let first = sub_datasets.first().ok_or_else(|| {
        CoreError::StructuralMismatch(
            "The specified input is not a valid Sentinel-2 dataset: it declares no sub-datasets"
                .to_string(),
        )
    })?;

    let info = backend.open(Path::new(&first.name))?.ok_or_else(|| {
        CoreError::StructuralMismatch(format!("Cannot open sub-dataset {}", first.name))
    })?;

    log::debug!("Inherited projection from sub-dataset {}", first.name);
    Ok(Some(info.projection).filter(|p| !p.trim().is_empty()))
}

impl DatasetLocator for Sentinel2Locator {
    fn sensor(&self) -> SensorKind {
        SensorKind::Sentinel2
    }

    fn locate(
        &self,
        input: &Path,
        request: &ConversionRequest,
        backend: &dyn RasterBackend,
    ) -> CoreResult<LocatedScene> {
        if input.is_dir() {
            let metadata: Option<PathBuf> = find_file_matching(input, &DATASET_METADATA_PATTERN)?;
            match metadata {
                Some(metadata_file) => self.locate_dataset(&metadata_file, request, backend),
                None => self.locate_tile(input),
            }
        } else {
            self.locate_dataset(input, request, backend)
        }
    }
}

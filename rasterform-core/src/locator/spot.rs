//! SPOT products: one pre-merged GeoTIFF, optionally with an XML or DIMAP
//! metadata file next to it. No band stacking takes place.

use super::{DatasetLocator, LocatedScene, warn};
use crate::catalog::profile_for;
use crate::config::{ConversionRequest, SensorKind};
use crate::discovery::{has_extension, list_files};
use crate::error::{CoreError, CoreResult};
use crate::external::RasterBackend;
use crate::naming::scene_base_name;
use crate::resolver::ResolvedTile;
use std::path::{Path, PathBuf};

const FALLBACK_METADATA_FILE: &str = "metadata.dim";

#[derive(Debug, Clone, Copy, Default)]
pub struct SpotLocator;

fn find_raster(input: &Path) -> CoreResult<PathBuf> {
    let extension = profile_for(SensorKind::Spot).raster_extension;

    if input.is_dir() {
        let mut rasters: Vec<PathBuf> = list_files(input)?
            .into_iter()
            .filter(|path| has_extension(path, extension))
            .collect();
        return match rasters.len() {
            0 => Err(CoreError::InvalidInput(format!(
                "Cannot find the input image file in {}",
                input.display()
            ))),
            1 => Ok(rasters.remove(0)),
            n => Err(CoreError::InvalidInput(format!(
                "Expected exactly one image file in {}, found {}",
                input.display(),
                n
            ))),
        };
    }

    if !has_extension(input, extension) {
        return Err(CoreError::InvalidInput(format!(
            "The specified input file is not a GeoTiff file: {}",
            input.display()
        )));
    }
    Ok(input.to_path_buf())
}

/// `<stem>.xml` next to the raster, falling back to a sibling `metadata.dim`.
fn find_metadata(raster: &Path) -> Option<PathBuf> {
    let xml = raster.with_extension("xml");
    if xml.is_file() {
        return Some(xml);
    }
    let dim = raster.parent()?.join(FALLBACK_METADATA_FILE);
    dim.is_file().then_some(dim)
}

impl DatasetLocator for SpotLocator {
    fn sensor(&self) -> SensorKind {
        SensorKind::Spot
    }

    fn locate(
        &self,
        input: &Path,
        _request: &ConversionRequest,
        _backend: &dyn RasterBackend,
    ) -> CoreResult<LocatedScene> {
        log::info!("Converting SPOT data under the specified path: {}", input.display());
        let raster = find_raster(input)?;

        let mut warnings = Vec::new();
        let metadata_source = find_metadata(&raster);
        if metadata_source.is_none() {
            warn(
                &mut warnings,
                format!("Cannot find metadata for the input file {}", raster.display()),
            );
        }

        Ok(LocatedScene {
            base_name: scene_base_name(SensorKind::Spot, &raster),
            tiles: vec![ResolvedTile::passthrough(raster)],
            projection: None,
            metadata_source,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::external::RecordingBackend;
    use std::fs::File;

    fn request(input: &Path) -> ConversionRequest {
        ConversionRequest::builder()
            .input(input)
            .output("out/")
            .sensor("spot")
            .build()
            .unwrap()
    }

    fn locate(input: &Path) -> CoreResult<LocatedScene> {
        SpotLocator.locate(input, &request(input), &RecordingBackend::new())
    }

    #[test]
    fn test_directory_with_xml_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("SPOT6_20200101.tif")).unwrap();
        File::create(dir.path().join("SPOT6_20200101.xml")).unwrap();

        let scene = locate(dir.path()).unwrap();
        assert_eq!(scene.tiles[0].ordered_files, vec![dir.path().join("SPOT6_20200101.tif")]);
        assert!(!scene.tiles[0].separate_bands);
        assert_eq!(scene.base_name, "SPOT6_20200101");
        assert_eq!(scene.metadata_source, Some(dir.path().join("SPOT6_20200101.xml")));
        assert!(scene.warnings.is_empty());
    }

    #[test]
    fn test_dim_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let raster = dir.path().join("IMAGERY.TIF");
        File::create(&raster).unwrap();
        File::create(dir.path().join("metadata.dim")).unwrap();

        let scene = locate(&raster).unwrap();
        assert_eq!(scene.metadata_source, Some(dir.path().join("metadata.dim")));
    }

    #[test]
    fn test_missing_metadata_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("scene.tif")).unwrap();

        let scene = locate(dir.path()).unwrap();
        assert_eq!(scene.metadata_source, None);
        assert_eq!(scene.warnings.len(), 1);
    }

    #[test]
    fn test_directory_without_raster() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("scene.xml")).unwrap();
        assert_eq!(locate(dir.path()).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_directory_with_two_rasters() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.tif")).unwrap();
        File::create(dir.path().join("b.tif")).unwrap();
        assert_eq!(locate(dir.path()).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_non_tiff_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scene.jp2");
        File::create(&file).unwrap();
        assert!(locate(&file).unwrap_err().to_string().contains("GeoTiff"));
    }
}

//! Landsat scenes: flat directories of `<scene>_<band>.TIF` files plus a
//! `<scene>_MTL.TXT` metadata file. There is always exactly one tile.

use super::{DatasetLocator, LocatedScene, warn};
use crate::catalog::profile_for;
use crate::config::{ConversionRequest, SensorKind};
use crate::discovery::{has_extension, list_files};
use crate::error::CoreResult;
use crate::external::RasterBackend;
use crate::naming::{landsat_scene_prefix, scene_base_name};
use crate::resolver::resolve;
use std::path::{Path, PathBuf};

const METADATA_SUFFIX: &str = "_MTL.TXT";

#[derive(Debug, Clone, Copy, Default)]
pub struct LandsatLocator;

/// Collects the files of the scene `input` belongs to.
///
/// A file input selects its siblings sharing the scene prefix; a directory
/// input selects everything directly inside it.
fn scene_files(input: &Path) -> CoreResult<(PathBuf, Vec<PathBuf>)> {
    if input.is_file() {
        let directory = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let prefix = format!("{}_", landsat_scene_prefix(input));
        let mut files: Vec<PathBuf> = list_files(&directory)?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();
        // A stem without an underscore yields a prefix its own file lacks.
        if files.is_empty() {
            log::debug!(
                "No files share the prefix {} with {}; using the input file alone",
                prefix,
                input.display()
            );
            files.push(input.to_path_buf());
        }
        Ok((directory, files))
    } else {
        Ok((input.to_path_buf(), list_files(input)?))
    }
}

impl DatasetLocator for LandsatLocator {
    fn sensor(&self) -> SensorKind {
        SensorKind::Landsat
    }

    fn locate(
        &self,
        input: &Path,
        _request: &ConversionRequest,
        _backend: &dyn RasterBackend,
    ) -> CoreResult<LocatedScene> {
        log::info!("Converting Landsat data under the specified path: {}", input.display());
        let profile = profile_for(SensorKind::Landsat);
        let (directory, files) = scene_files(input)?;

        let metadata_source = files
            .iter()
            .find(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.to_ascii_uppercase().ends_with(METADATA_SUFFIX))
            })
            .cloned();

        let candidates: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| has_extension(path, profile.raster_extension))
            .collect();

        let tile = resolve(&directory, &candidates, profile);
        let mut warnings = tile.enforce(SensorKind::Landsat, profile.missing_band_policy)?;

        if metadata_source.is_none() {
            warn(
                &mut warnings,
                format!("Cannot find the metadata file in {}", directory.display()),
            );
        }

        let base_name = scene_base_name(SensorKind::Landsat, &tile.ordered_files[0]);

        Ok(LocatedScene {
            tiles: vec![tile],
            base_name,
            projection: None,
            metadata_source,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::bands_for;
    use crate::error::ErrorKind;
    use crate::external::RecordingBackend;
    use std::fs::File;

    fn write_scene(dir: &Path, scene: &str, skip: &[&str], with_metadata: bool) {
        for band in bands_for(SensorKind::Landsat) {
            if !skip.contains(band) {
                File::create(dir.join(format!("{scene}_{band}.TIF"))).unwrap();
            }
        }
        if with_metadata {
            File::create(dir.join(format!("{scene}_MTL.TXT"))).unwrap();
        }
    }

    fn request(input: &Path) -> ConversionRequest {
        ConversionRequest::builder()
            .input(input)
            .output("out/")
            .sensor("landsat")
            .build()
            .unwrap()
    }

    #[test]
    fn test_complete_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path(), "LC8_20200101", &[], true);

        let scene = LandsatLocator
            .locate(dir.path(), &request(dir.path()), &RecordingBackend::new())
            .unwrap();

        assert_eq!(scene.tiles.len(), 1);
        assert_eq!(scene.tiles[0].ordered_files.len(), 12);
        assert_eq!(scene.base_name, "LC8_20200101");
        assert_eq!(scene.metadata_source, Some(dir.path().join("LC8_20200101_MTL.TXT")));
        assert!(scene.warnings.is_empty());
    }

    #[test]
    fn test_file_input_selects_scene_siblings() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path(), "LC8_20200101", &[], true);
        write_scene(dir.path(), "LC8_20200202", &[], true);

        let input = dir.path().join("LC8_20200101_MTL.TXT");
        let scene = LandsatLocator
            .locate(&input, &request(&input), &RecordingBackend::new())
            .unwrap();

        let tile = &scene.tiles[0];
        assert!(tile.is_complete());
        assert!(tile.ordered_files.iter().all(|f| {
            f.file_name().unwrap().to_string_lossy().starts_with("LC8_20200101_")
        }));
        assert_eq!(scene.metadata_source, Some(input));
    }

    #[test]
    fn test_missing_band_and_metadata_are_warnings() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path(), "LC8_20200101", &["B9"], false);

        let scene = LandsatLocator
            .locate(dir.path(), &request(dir.path()), &RecordingBackend::new())
            .unwrap();

        assert_eq!(scene.tiles[0].missing_bands, vec!["B9"]);
        assert_eq!(scene.tiles[0].ordered_files.len(), 11);
        assert_eq!(scene.warnings.len(), 2);
        assert!(scene.warnings[0].contains("B9"));
        assert!(scene.warnings[1].contains("metadata"));
        assert_eq!(scene.metadata_source, None);
    }

    #[test]
    fn test_file_input_without_scene_prefix_keeps_itself() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sceneB1.TIF");
        File::create(&input).unwrap();
        File::create(dir.path().join("other_B2.TIF")).unwrap();

        let scene = LandsatLocator
            .locate(&input, &request(&input), &RecordingBackend::new())
            .unwrap();

        assert_eq!(scene.tiles[0].ordered_files, vec![input]);
        assert_eq!(scene.tiles[0].missing_bands.len(), 11);
        assert!(scene.warnings.iter().any(|w| w.contains("metadata")));
    }

    #[test]
    fn test_no_bands_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("LC8_20200101_MTL.TXT")).unwrap();

        let err = LandsatLocator
            .locate(dir.path(), &request(dir.path()), &RecordingBackend::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
    }
}

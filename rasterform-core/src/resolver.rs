//! Band file resolution.
//!
//! Matches every band of a sensor catalog to exactly one candidate file. A
//! band with no candidate, or with more than one, is recorded as missing;
//! ambiguity is never resolved by picking one of the files.

use crate::catalog::{MissingBandPolicy, SensorProfile};
use crate::config::SensorKind;
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Outcome of matching one catalog band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandMatch {
    pub band_suffix: String,
    /// Present only when exactly one candidate matched.
    pub file_path: Option<PathBuf>,
    /// Number of candidates that matched the band.
    pub candidates: usize,
}

/// The band files of one tile, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTile {
    pub directory_path: PathBuf,
    pub ordered_files: Vec<PathBuf>,
    /// Bands that could not be matched, in catalog order.
    pub missing_bands: Vec<String>,
    pub matches: Vec<BandMatch>,
    /// Whether the files are stacked as separate bands of the mosaic.
    pub separate_bands: bool,
}

impl ResolvedTile {
    /// A tile made of a single already merged raster.
    pub fn passthrough(file: PathBuf) -> Self {
        let directory_path = file.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            directory_path,
            ordered_files: vec![file],
            missing_bands: Vec::new(),
            matches: Vec::new(),
            separate_bands: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_bands.is_empty()
    }

    /// Applies the sensor's missing band policy.
    ///
    /// Returns the warnings to report when the tile is still usable.
    pub fn enforce(&self, sensor: SensorKind, policy: MissingBandPolicy) -> CoreResult<Vec<String>> {
        let mut warnings = Vec::new();

        if !self.missing_bands.is_empty() {
            match policy {
                MissingBandPolicy::Fatal => {
                    return Err(CoreError::BandResolution {
                        sensor,
                        missing: self.missing_bands.clone(),
                    });
                }
                MissingBandPolicy::Warn => {
                    let warning = format!(
                        "Cannot find the appropriate file for {} band(s) in {}",
                        self.missing_bands.join(", "),
                        self.directory_path.display()
                    );
                    log::warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        if self.ordered_files.is_empty() {
            return Err(CoreError::EmptyResult(format!(
                "There are no image files to convert from in {}",
                self.directory_path.display()
            )));
        }

        Ok(warnings)
    }
}

fn file_name_upper(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_ascii_uppercase)
}

/// Matches the catalog bands of `profile` against `candidates`.
///
/// All bands are matched before anything is reported, so `missing_bands`
/// always names every problem band at once.
pub fn resolve(directory: &Path, candidates: &[PathBuf], profile: &SensorProfile) -> ResolvedTile {
    let extension = profile.raster_extension.to_ascii_uppercase();
    let names: Vec<(Option<String>, &PathBuf)> = candidates
        .iter()
        .map(|path| (file_name_upper(path), path))
        .collect();

    let mut ordered_files = Vec::new();
    let mut missing_bands = Vec::new();
    let mut matches = Vec::with_capacity(profile.bands.len());

    for band in profile.bands {
        let wanted = format!("{band}{extension}");
        let found: Vec<&PathBuf> = names
            .iter()
            .filter(|(name, _)| name.as_deref().is_some_and(|n| n.ends_with(&wanted)))
            .map(|(_, path)| *path)
            .collect();

        let file_path = if found.len() == 1 {
            ordered_files.push(found[0].clone());
            Some(found[0].clone())
        } else {
            if found.len() > 1 {
                log::debug!(
                    "Band {} is ambiguous in {}: {} candidates",
                    band,
                    directory.display(),
                    found.len()
                );
            }
            missing_bands.push(band.to_string());
            None
        };

        matches.push(BandMatch {
            band_suffix: band.to_string(),
            file_path,
            candidates: found.len(),
        });
    }

    ResolvedTile {
        directory_path: directory.to_path_buf(),
        ordered_files,
        missing_bands,
        matches,
        separate_bands: profile.separate_bands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::profile_for;

    fn landsat_files(dir: &Path, bands: &[&str]) -> Vec<PathBuf> {
        bands
            .iter()
            .map(|b| dir.join(format!("LC8_20200101_{b}.TIF")))
            .collect()
    }

    #[test]
    fn test_complete_landsat_scene_in_catalog_order() {
        let dir = Path::new("/scenes/lc8");
        let profile = profile_for(SensorKind::Landsat);
        // Reverse the listing order; output must follow the catalog.
        let mut candidates = landsat_files(dir, profile.bands);
        candidates.reverse();
        candidates.push(dir.join("LC8_20200101_MTL.TXT"));

        let tile = resolve(dir, &candidates, profile);

        assert!(tile.is_complete());
        assert_eq!(tile.ordered_files, landsat_files(dir, profile.bands));
        assert!(tile.matches.iter().all(|m| m.candidates == 1));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let dir = Path::new("/tile");
        let profile = profile_for(SensorKind::Sentinel2);
        let candidates: Vec<PathBuf> = profile
            .bands
            .iter()
            .map(|b| dir.join(format!("t32ule_20200101_{}.JP2", b.to_lowercase())))
            .collect();

        let tile = resolve(dir, &candidates, profile);
        assert!(tile.is_complete());
        assert_eq!(tile.ordered_files.len(), 13);
    }

    #[test]
    fn test_missing_band_is_reported() {
        let dir = Path::new("/scenes/lc8");
        let profile = profile_for(SensorKind::Landsat);
        let bands: Vec<&str> = profile.bands.iter().copied().filter(|b| *b != "B9").collect();

        let tile = resolve(dir, &landsat_files(dir, &bands), profile);

        assert_eq!(tile.missing_bands, vec!["B9"]);
        assert_eq!(tile.ordered_files.len(), 11);
        let warnings = tile.enforce(SensorKind::Landsat, profile.missing_band_policy).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("B9"));
    }

    #[test]
    fn test_ambiguous_band_is_missing() {
        let dir = Path::new("/tile");
        let profile = profile_for(SensorKind::Sentinel2);
        let mut candidates: Vec<PathBuf> = profile
            .bands
            .iter()
            .map(|b| dir.join(format!("T32ULE_{b}.jp2")))
            .collect();
        candidates.push(dir.join("COPY_T32ULE_B04.jp2"));

        let tile = resolve(dir, &candidates, profile);

        assert_eq!(tile.missing_bands, vec!["B04"]);
        let b04 = tile.matches.iter().find(|m| m.band_suffix == "B04").unwrap();
        assert_eq!(b04.candidates, 2);
        assert!(b04.file_path.is_none());

        let err = tile
            .enforce(SensorKind::Sentinel2, profile.missing_band_policy)
            .unwrap_err();
        assert!(matches!(err, CoreError::BandResolution { ref missing, .. } if missing == &vec!["B04".to_string()]));
    }

    #[test]
    fn test_wrong_extension_does_not_match() {
        let dir = Path::new("/tile");
        let profile = profile_for(SensorKind::Sentinel2);
        let candidates = vec![dir.join("T32ULE_B01.tif")];
        let tile = resolve(dir, &candidates, profile);
        assert_eq!(tile.missing_bands.len(), 13);
    }

    #[test]
    fn test_landsat_without_any_band_is_fatal() {
        let dir = Path::new("/empty");
        let profile = profile_for(SensorKind::Landsat);
        let tile = resolve(dir, &[dir.join("LC8_20200101_MTL.TXT")], profile);
        let err = tile
            .enforce(SensorKind::Landsat, profile.missing_band_policy)
            .unwrap_err();
        assert!(matches!(err, CoreError::EmptyResult(_)));
    }

    #[test]
    fn test_b1_does_not_match_b11() {
        let dir = Path::new("/scenes");
        let profile = profile_for(SensorKind::Landsat);
        let tile = resolve(dir, &landsat_files(dir, &["B11"]), profile);
        let b1 = tile.matches.iter().find(|m| m.band_suffix == "B1").unwrap();
        assert_eq!(b1.candidates, 0);
        let b11 = tile.matches.iter().find(|m| m.band_suffix == "B11").unwrap();
        assert_eq!(b11.candidates, 1);
    }
}

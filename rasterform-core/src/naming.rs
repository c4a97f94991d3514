//! Scene base-name derivation.
//!
//! One explicit rule per sensor recovers the scene name from a band or
//! metadata file name. The base name decides the output file name when the
//! destination is a directory.

use crate::catalog::profile_for;
use crate::config::SensorKind;
use std::path::Path;

/// Suffix tokens that mark Landsat scene files which are not bands.
const LANDSAT_AUXILIARY_TOKENS: &[&str] = &["MTL", "ANG", "BQA"];

/// File name without its final extension.
pub fn file_stem_string(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn strip_token<'a>(stem: &'a str, token: &str) -> &'a str {
    let cut = stem.len() - token.len() - 1;
    &stem[..cut]
}

/// Derives the scene base name from the first band file of a tile.
///
/// For band-stacking sensors the trailing `_<band>` token is removed
/// (`LC8_20200101_B1.TIF` gives `LC8_20200101`). For SPOT the file stem is
/// the scene name.
pub fn scene_base_name(sensor: SensorKind, first_file: &Path) -> String {
    let stem = file_stem_string(first_file);
    match sensor {
        SensorKind::Spot => stem,
        SensorKind::Landsat | SensorKind::Sentinel2 => {
            match profile_for(sensor).band_token_suffix(&stem) {
                Some(token) => strip_token(&stem, token).to_string(),
                None => stem,
            }
        }
    }
}

/// Derives the file name prefix shared by all files of a Landsat scene.
///
/// Any file of the scene may be given: a band, the `_MTL.TXT` metadata or
/// another auxiliary file. Unknown suffixes fall back to cutting at the last
/// underscore.
pub fn landsat_scene_prefix(file: &Path) -> String {
    let stem = file_stem_string(file);
    let upper = stem.to_ascii_uppercase();

    if let Some(token) = profile_for(SensorKind::Landsat).band_token_suffix(&stem) {
        return strip_token(&stem, token).to_string();
    }
    if let Some(token) = LANDSAT_AUXILIARY_TOKENS
        .iter()
        .find(|token| upper.ends_with(&format!("_{token}")))
    {
        return strip_token(&stem, token).to_string();
    }

    match stem.rfind('_') {
        Some(idx) if idx > 0 => stem[..idx].to_string(),
        _ => stem,
    }
}

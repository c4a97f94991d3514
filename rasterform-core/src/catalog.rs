//! Static band knowledge for each supported sensor family.
//!
//! The order of the band tokens is the channel order of the output raster:
//! band 1 of the output is catalog index 0, and so on.

use crate::config::SensorKind;

const LANDSAT_BANDS: &[&str] = &[
    "B1", "B2", "B3", "B4", "B5", "B6", "B7", "B8", "B9", "B10", "B11", "BQA",
];

const SENTINEL2_BANDS: &[&str] = &[
    "B01", "B02", "B03", "B04", "B05", "B06", "B07", "B08", "B8A", "B09", "B10", "B11", "B12",
];

/// What to do when some catalog bands cannot be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingBandPolicy {
    /// Any missing band aborts the run.
    Fatal,
    /// Missing bands are reported; only an empty result aborts the run.
    Warn,
}

/// Immutable description of a sensor's band layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorProfile {
    pub sensor: SensorKind,
    pub bands: &'static [&'static str],
    /// Raster file extension of band files, including the dot.
    pub raster_extension: &'static str,
    pub missing_band_policy: MissingBandPolicy,
    /// Whether band files are stacked as separate bands (false means passthrough).
    pub separate_bands: bool,
}

const SENTINEL2_PROFILE: SensorProfile = SensorProfile {
    sensor: SensorKind::Sentinel2,
    bands: SENTINEL2_BANDS,
    raster_extension: ".jp2",
    missing_band_policy: MissingBandPolicy::Fatal,
    separate_bands: true,
};

const LANDSAT_PROFILE: SensorProfile = SensorProfile {
    sensor: SensorKind::Landsat,
    bands: LANDSAT_BANDS,
    raster_extension: ".tif",
    missing_band_policy: MissingBandPolicy::Warn,
    separate_bands: true,
};

// SPOT products arrive as a single pre-merged raster.
const SPOT_PROFILE: SensorProfile = SensorProfile {
    sensor: SensorKind::Spot,
    bands: &[],
    raster_extension: ".tif",
    missing_band_policy: MissingBandPolicy::Fatal,
    separate_bands: false,
};

/// Returns the profile of the given sensor.
pub fn profile_for(sensor: SensorKind) -> &'static SensorProfile {
    match sensor {
        SensorKind::Sentinel2 => &SENTINEL2_PROFILE,
        SensorKind::Landsat => &LANDSAT_PROFILE,
        SensorKind::Spot => &SPOT_PROFILE,
    }
}

/// Ordered band suffix tokens making up a complete scene of the sensor.
pub fn bands_for(sensor: SensorKind) -> &'static [&'static str] {
    profile_for(sensor).bands
}

impl SensorProfile {
    /// Returns the catalog token `name` ends with, if any (case-insensitive).
    ///
    /// Longer tokens win so that `B11` is not mistaken for `B1`.
    pub fn band_token_suffix(&self, name: &str) -> Option<&'static str> {
        let upper = name.to_ascii_uppercase();
        self.bands
            .iter()
            .copied()
            .filter(|band| upper.ends_with(&format!("_{band}")))
            .max_by_key(|band| band.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landsat_order() {
        let bands = bands_for(SensorKind::Landsat);
        assert_eq!(bands.len(), 12);
        assert_eq!(bands[0], "B1");
        assert_eq!(bands[9], "B10");
        assert_eq!(bands[11], "BQA");
    }

    #[test]
    fn test_sentinel2_order() {
        let bands = bands_for(SensorKind::Sentinel2);
        assert_eq!(bands.len(), 13);
        assert_eq!(bands[7], "B08");
        assert_eq!(bands[8], "B8A");
        assert_eq!(bands[9], "B09");
        assert_eq!(bands[12], "B12");
    }

    #[test]
    fn test_order_is_stable() {
        for sensor in SensorKind::ALL {
            assert_eq!(bands_for(sensor), bands_for(sensor));
        }
    }

    #[test]
    fn test_spot_is_passthrough() {
        let profile = profile_for(SensorKind::Spot);
        assert!(profile.bands.is_empty());
        assert!(!profile.separate_bands);
    }

    #[test]
    fn test_policies() {
        assert_eq!(
            profile_for(SensorKind::Sentinel2).missing_band_policy,
            MissingBandPolicy::Fatal
        );
        assert_eq!(
            profile_for(SensorKind::Landsat).missing_band_policy,
            MissingBandPolicy::Warn
        );
    }

    #[test]
    fn test_band_token_suffix_prefers_longest() {
        let landsat = profile_for(SensorKind::Landsat);
        assert_eq!(landsat.band_token_suffix("LC8_20200101_B11"), Some("B11"));
        assert_eq!(landsat.band_token_suffix("LC8_20200101_b1"), Some("B1"));
        assert_eq!(landsat.band_token_suffix("LC8_20200101_MTL"), None);
    }
}

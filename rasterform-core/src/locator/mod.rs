//! Sensor-specific scene discovery.
//!
//! Each sensor family lays its products out differently on disk. A
//! [`DatasetLocator`] knows one layout and turns an input path into resolved
//! tiles, plus the projection and metadata that travel with them. Band
//! matching itself is shared through [`crate::resolver`].

mod landsat;
mod sentinel2;
mod spot;

pub use landsat::LandsatLocator;
pub use sentinel2::Sentinel2Locator;
pub use spot::SpotLocator;

use crate::config::{ConversionRequest, SensorKind};
use crate::error::CoreResult;
use crate::external::RasterBackend;
use crate::resolver::ResolvedTile;
use std::path::{Path, PathBuf};

/// Everything discovered about one input product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedScene {
    /// Tiles to assemble, in processing order.
    pub tiles: Vec<ResolvedTile>,
    /// Name used for the output raster when the destination is a directory.
    pub base_name: String,
    /// Projection inherited from the product itself.
    pub projection: Option<String>,
    /// Metadata file to copy next to the output.
    pub metadata_source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Discovers the tiles of a product for one sensor family.
pub trait DatasetLocator {
    fn sensor(&self) -> SensorKind;

    /// Locates the scene rooted at `input`.
    ///
    /// `input` may differ from `request.input()` when the product was
    /// extracted or staged first.
    fn locate(
        &self,
        input: &Path,
        request: &ConversionRequest,
        backend: &dyn RasterBackend,
    ) -> CoreResult<LocatedScene>;
}

/// Returns the locator for a sensor family.
pub fn locator_for(sensor: SensorKind) -> Box<dyn DatasetLocator> {
    match sensor {
        SensorKind::Sentinel2 => Box::new(Sentinel2Locator),
        SensorKind::Landsat => Box::new(LandsatLocator),
        SensorKind::Spot => Box::new(SpotLocator),
    }
}

/// Records a warning in the log and in `warnings`.
pub(crate) fn warn(warnings: &mut Vec<String>, message: String) {
    log::warn!("{}", message);
    warnings.push(message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_for_each_sensor() {
        for sensor in SensorKind::ALL {
            assert_eq!(locator_for(sensor).sensor(), sensor);
        }
    }
}

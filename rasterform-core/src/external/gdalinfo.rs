//! Parsing of `gdalinfo -json` output into [`DatasetInfo`].

use super::{DatasetInfo, SubDataset};
use crate::error::{CoreError, CoreResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

const SUBDATASETS_DOMAIN: &str = "SUBDATASETS";

#[derive(Debug, Deserialize)]
struct GdalInfoJson {
    #[serde(default)]
    metadata: HashMap<String, Value>,
    #[serde(rename = "coordinateSystem", default)]
    coordinate_system: Option<CoordinateSystemJson>,
}

#[derive(Debug, Deserialize)]
struct CoordinateSystemJson {
    #[serde(default)]
    wkt: String,
}

/// Splits `SUBDATASET_3_NAME` into `(3, "NAME")`.
fn parse_subdataset_key(key: &str) -> Option<(u32, &str)> {
    let rest = key.strip_prefix("SUBDATASET_")?;
    let (index, field) = rest.split_once('_')?;
    Some((index.parse().ok()?, field))
}

/// Parses the JSON document printed by `gdalinfo -json`.
///
/// Sub-datasets are returned in declaration order (by their numeric index).
pub fn parse_dataset_info(json: &str) -> CoreResult<DatasetInfo> {
    let info: GdalInfoJson =
        serde_json::from_str(json).map_err(|e| CoreError::RasterInfoParse(e.to_string()))?;

    let mut entries: BTreeMap<u32, (Option<String>, Option<String>)> = BTreeMap::new();
    if let Some(Value::Object(domain)) = info.metadata.get(SUBDATASETS_DOMAIN) {
        for (key, value) in domain {
            let (Some((index, field)), Some(text)) = (parse_subdataset_key(key), value.as_str()) else {
                continue;
            };
            let entry = entries.entry(index).or_default();
            match field {
                "NAME" => entry.0 = Some(text.to_string()),
                "DESC" => entry.1 = Some(text.to_string()),
                _ => {}
            }
        }
    }

    let sub_datasets = entries
        .into_values()
        .filter_map(|(name, description)| {
            name.map(|name| SubDataset {
                name,
                description: description.unwrap_or_default(),
            })
        })
        .collect();

    Ok(DatasetInfo {
        sub_datasets,
        projection: info.coordinate_system.map(|cs| cs.wkt).unwrap_or_default(),
    })
}

use std::collections::HashMap;
use std::convert::TryInto;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::bail;
use flate2::bufread::GzDecoder;
use geo::Geometry;
use geojson::feature::Id;

use crate::feature::{Feature, FeatureCollection, PropertyValue};


const FEATURE_FILES: [&str; 2] = ["features.geojson.gz", "features.geojson"];

/// Loads the layer's features from `features.geojson.gz` or `features.geojson` in `input_path`.
pub fn load_features(input_path: &Path) -> anyhow::Result<FeatureCollection> {
    for file_name in FEATURE_FILES {
        let path = input_path.join(file_name);
        if !path.is_file() {
            continue;
        }

        let buf = BufReader::new(File::open(&path)?);
        return if file_name.ends_with(".gz") {
            read_geo_json_features(GzDecoder::new(buf))
        } else {
            read_geo_json_features(buf)
        };
    }

    bail!("Couldn't find {}", FEATURE_FILES.join(" or "))
}

/// Reads a JSON array of GeoJSON features. Features without geometry are skipped, features
/// without id are named after their position in the array.
pub fn read_geo_json_features<R: Read>(reader: R) -> anyhow::Result<FeatureCollection> {
    let geo_json_features: Vec<geojson::Feature> = serde_json::from_reader(reader)?;

    let mut fc = FeatureCollection::new();
    for (index, f) in geo_json_features.into_iter().enumerate() {
        let gj_geo = match f.geometry {
            Some(g) => g,
            None => continue,
        };

        let geometry: Geometry<f64> = gj_geo
            .try_into()
            .map_err(|e| anyhow::Error::msg(format!("feature #{} has an unsupported geometry: {}", index, e)))?;

        let id = match f.id {
            Some(Id::String(s)) => s,
            Some(Id::Number(n)) => n.to_string(),
            None => index.to_string(),
        };

        let properties: HashMap<String, PropertyValue> = match f.properties {
            Some(map) => map.into_iter().map(|(key, val)| (key, val.into())).collect(),
            None => HashMap::new(),
        };

        fc.push(Feature::new(id, geometry).with_properties(properties));
    }

    log::debug!("read {} features", fc.len());

    Ok(fc)
}

/// GeoJSON of the features' render geometries.
pub fn to_geo_json(features: &FeatureCollection) -> geojson::FeatureCollection {
    let features = features
        .iter()
        .map(|feature| {
            let mut properties: geojson::JsonObject = feature
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v.clone())))
                .collect();
            if feature.is_clipped() {
                properties.insert("clipped".to_string(), serde_json::Value::Bool(true));
            }

            geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(feature.render_geometry()))),
                id: Some(Id::String(feature.id.clone())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

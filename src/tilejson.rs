use serde::Serialize;

use std::{collections::BTreeMap, fs::File, path::Path};

use serde_json::to_string_pretty;

use std::io::{Error, Write};

use crate::config::LayerJSON;
use crate::feature::{FeatureCollection, PropertyValue};

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use geo::{Geometry, Point};
    use tempdir::TempDir;
    use crate::config::LayerJSON;
    use crate::feature::{Feature, FeatureCollection, PropertyValue};
    use crate::tilejson::{layer_fields, write};

    fn layer() -> LayerJSON {
        LayerJSON {
            name: "roads".to_string(),
            max_extent: [0.0, 0.0, 1000.0, 500.0],
            tile_size: 256,
            min_level: 1,
            max_level: 4,
            pan_origin: None,
            rounding_tolerance: None,
            max_screen_coordinate: None,
        }
    }

    fn features() -> FeatureCollection {
        let mut first = HashMap::new();
        first.insert("lanes".to_string(), PropertyValue::Number(2.0));
        first.insert("name".to_string(), PropertyValue::Null);
        let mut second = HashMap::new();
        second.insert("name".to_string(), PropertyValue::String("Main St".to_string()));
        second.insert("paved".to_string(), PropertyValue::Bool(true));

        FeatureCollection(vec![
            Feature::new("a", Geometry::Point(Point::new(1.0, 1.0))).with_properties(first),
            Feature::new("b", Geometry::Point(Point::new(2.0, 2.0))).with_properties(second),
        ])
    }

    #[test]
    fn fields_take_the_first_non_null_type() {
        let fields = layer_fields(&features());

        assert_eq!(3, fields.len());
        assert_eq!("Number", fields["lanes"]);
        assert_eq!("String", fields["name"]);
        assert_eq!("Boolean", fields["paved"]);
    }

    #[test]
    fn writes_tile_json() {
        let dir = TempDir::new("vector-tiler-tilejson").unwrap();

        write(dir.path(), &layer(), &features()).unwrap();

        let content = fs::read_to_string(dir.path().join("tile.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!("2.2.0", json["tilejson"]);
        assert_eq!("tms", json["scheme"]);
        assert_eq!(1, json["minzoom"]);
        assert_eq!(4, json["maxzoom"]);
        assert_eq!(serde_json::json!([0.0, 0.0, 1000.0, 500.0]), json["bounds"]);
        assert_eq!("roads", json["vector_layers"][0]["id"]);
        assert_eq!("Number", json["vector_layers"][0]["fields"]["lanes"]);
    }
}

#[derive(Debug, Serialize)]
pub struct TileJSONLayer {
    pub id: String,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct TileJSON {
    #[serde(rename = "tilejson")]
    pub tile_json: String,
    pub name: String,
    pub description: String,
    pub scheme: String,
    #[serde(rename = "minzoom")]
    pub min_zoom: u8,
    #[serde(rename = "maxzoom")]
    pub max_zoom: u8,
    pub bounds: [f64; 4],
    pub tiles: Vec<String>,
    pub vector_layers: Option<Vec<TileJSONLayer>>,
}

/// Writes `tile.json` describing the tile set of `layer` to `dir`.
pub fn write(dir: &Path, layer: &LayerJSON, features: &FeatureCollection) -> Result<(), Error> {
    let tile_json = TileJSON {
        tile_json: String::from("2.2.0"),
        name: format!("{} Vector Tiles", layer.name),
        description: format!(
            "GeoJSON tiles of the layer '{}', levels {} to {}",
            layer.name, layer.min_level, layer.max_level
        ),
        // rows are counted from the extent's minimum
        scheme: String::from("tms"),
        min_zoom: layer.min_level,
        max_zoom: layer.max_level,
        bounds: layer.max_extent,
        tiles: vec![String::from("{z}/{x}/{y}.geojson")],
        vector_layers: Some(vec![TileJSONLayer {
            id: layer.name.clone(),
            fields: layer_fields(features),
        }]),
    };

    let mut file = File::create(dir.join("tile.json"))?;
    let json = to_string_pretty(&tile_json)?;

    file.write_all(json.as_bytes())
}

fn layer_fields(features: &FeatureCollection) -> BTreeMap<String, String> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();

    for (key, value) in features.iter().flat_map(|f| f.properties.iter()) {
        let kind = match value {
            PropertyValue::Null => continue,
            PropertyValue::Bool(_) => "Boolean",
            PropertyValue::String(_) => "String",
            PropertyValue::Number(_) => "Number",
            PropertyValue::Array(_) => "Array",
        };
        fields.entry(key.clone()).or_insert_with(|| kind.to_string());
    }

    // keys that only ever held null
    for key in features.iter().flat_map(|f| f.properties.keys()) {
        fields.entry(key.clone()).or_insert_with(|| String::from("Null"));
    }

    fields
}

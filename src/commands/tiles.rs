use crate::commands::TileDataCommand;
use crate::config::LayerJsonParser;
use crate::feature::load_features;
use crate::service::TileService;
use crate::utils::build_tile_set;

use std::path::Path;

use std::time::Instant;


pub struct VectorTiles {
    layer_json: Box<dyn LayerJsonParser>,
}
impl VectorTiles {
    pub fn new(layer_json: Box<dyn LayerJsonParser>) -> Self {
        VectorTiles { layer_json }
    }
}
impl TileDataCommand for VectorTiles {
    fn get_description(&self) -> &str {
        "Split a layer's features into GeoJSON tiles of every level."
    }

    fn exec(&self, input_path: &Path, output_path: &Path) -> anyhow::Result<()> {
        let start = Instant::now();

        println!("▶️  Loading layer.json");
        let layer_path = input_path.join("layer.json");
        let layer = self.layer_json.parse(&layer_path)?;
        let config = layer.tiling_config()?;
        let levels = layer.levels()?;
        println!("✔️  Loaded layer.json");

        // features
        let now = Instant::now();
        println!("▶️  Loading features");
        let features = load_features(input_path)?;
        println!("✔️  Loaded {} features in {}ms", features.len(), now.elapsed().as_millis());

        let pan_origin = layer.pan_origin();
        println!(
            "ℹ️  Building levels {} to {} of layer {} around ({}, {})",
            layer.min_level, layer.max_level, layer.name, pan_origin.x, pan_origin.y
        );

        let service = TileService::new(config);

        for level in levels {
            let now = Instant::now();
            let scale = layer.scale_for_level(level);
            println!("▶️  Building level {}", level);
            let summary = build_tile_set(output_path, &service, &features, level, scale, pan_origin)
                .map_err(|e| anyhow::Error::msg(e.to_string()))?;
            println!(
                "✔️  Built level {} ({} tiles, {} features, {} clipped) in {}ms",
                level,
                summary.tiles,
                summary.features,
                summary.clipped_features,
                now.elapsed().as_millis()
            );
        }

        // tile.json
        let now = Instant::now();
        println!("▶️  Creating tile.json");
        crate::tilejson::write(output_path, &layer, &features)?;
        println!("✔️  Created tile.json in {}ms", now.elapsed().as_millis());

        println!("\n    🎉  Finished in {}ms", start.elapsed().as_millis());

        Ok(())
    }
}

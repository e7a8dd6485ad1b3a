mod calculator;
mod code;

use std::collections::BTreeSet;

use geo::Rect;

use crate::config::TilingConfig;
use crate::feature::FeatureCollection;

pub use calculator::{bounds, layer_size, screen_size};
pub use code::{tiles_per_side, TileCode, TileCodeParseError, MAX_LEVEL};

#[cfg(test)]
mod tests {
    use geo::{Coordinate, Rect};
    use crate::config::TilingConfig;
    use crate::tile::{Tile, TileCode};

    fn config() -> TilingConfig {
        TilingConfig::new(Rect::new(Coordinate { x: 0.0, y: 0.0 }, Coordinate { x: 1000.0, y: 1000.0 }))
    }

    #[test]
    fn new_tile_carries_world_and_screen_size() {
        let tile = Tile::new(TileCode::new(1, 1, 0), &config(), 0.5).unwrap();

        assert_eq!((500.0, 500.0), tile.layer_size);
        assert_eq!((250, 250), tile.screen_size);
        assert_eq!(Coordinate { x: 500.0, y: 0.0 }, tile.bounds.min());
        assert!(tile.features.is_empty());
        assert!(tile.dependents.is_empty());
        assert!(!tile.clipped);
        assert!(tile.clip_bounds.is_none());
    }

    #[test]
    fn new_tile_is_none_for_degenerate_scale() {
        assert!(Tile::new(TileCode::new(1, 1, 0), &config(), 0.0).is_none());
    }

    #[test]
    fn dependents_are_deduplicated_and_ordered() {
        let mut tile = Tile::new(TileCode::new(2, 1, 1), &config(), 1.0).unwrap();

        tile.add_dependent(TileCode::new(2, 3, 0));
        tile.add_dependent(TileCode::new(2, 0, 0));
        tile.add_dependent(TileCode::new(2, 3, 0));

        let dependents: Vec<TileCode> = tile.dependents.iter().cloned().collect();
        assert_eq!(vec![TileCode::new(2, 0, 0), TileCode::new(2, 3, 0)], dependents);
    }
}

/// One request-scoped tile of a layer.
#[derive(Debug, Clone)]
pub struct Tile {
    pub code: TileCode,
    /// world bounds
    pub bounds: Rect<f64>,
    /// tile width and height in world units
    pub layer_size: (f64, f64),
    /// tile width and height in pixels
    pub screen_size: (u32, u32),
    pub features: FeatureCollection,
    /// other tiles implicated while resolving ownership of this tile's candidates
    pub dependents: BTreeSet<TileCode>,
    /// set as soon as one feature had to be clipped
    pub clipped: bool,
    /// rectangle oversized features were clipped against, if any
    pub clip_bounds: Option<Rect<f64>>,
}

impl Tile {
    /// Empty tile for `code`, or `None` if the layer has no size at this scale.
    pub fn new(code: TileCode, config: &TilingConfig, scale: f64) -> Option<Self> {
        let tile_bounds = bounds(&code, &config.max_extent, scale)?;
        let size = layer_size(&code, &config.max_extent, scale);

        Some(Tile {
            code,
            bounds: tile_bounds,
            layer_size: size,
            screen_size: screen_size(size, scale),
            features: FeatureCollection::new(),
            dependents: BTreeSet::new(),
            clipped: false,
            clip_bounds: None,
        })
    }

    pub fn add_dependent(&mut self, code: TileCode) {
        self.dependents.insert(code);
    }

    pub fn tile_width(&self) -> f64 {
        self.layer_size.0
    }

    pub fn tile_height(&self) -> f64 {
        self.layer_size.1
    }
}

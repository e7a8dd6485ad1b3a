mod candidates;

use geo::coords_iter::CoordsIter;
use geo::{Coordinate, Geometry, Rect};

use crate::config::TilingConfig;
use crate::feature::{Feature, FeatureCollection};
use crate::tile::{Tile, TileCode};

pub use candidates::{candidate_indices, CandidateIndices};


/// First coordinate of `geometry`, in enumeration order, lying inside `max_extent`
/// (edges included).
pub fn qualifying_coordinate(geometry: &Geometry<f64>, max_extent: &Rect<f64>) -> Option<Coordinate<f64>> {
    geometry.coords_iter().find(|c| contains(max_extent, c))
}

fn contains(rect: &Rect<f64>, coord: &Coordinate<f64>) -> bool {
    coord.x >= rect.min().x
        && coord.x <= rect.max().x
        && coord.y >= rect.min().y
        && coord.y <= rect.max().y
}

/// Decides which of `candidates` belong to `tile`.
///
/// A feature is owned by the tile its first coordinate inside the layer's extent falls in.
/// Features owned elsewhere are dropped and their owner is recorded as a dependent of the
/// tile. Features without any coordinate inside the extent belong to the level's origin
/// tile. The tile's previous features are replaced.
pub fn assign_tile(mut tile: Tile, candidates: FeatureCollection, config: &TilingConfig) -> Tile {
    let mut retained = FeatureCollection::new();

    for feature in candidates {
        match owner_of(&feature, &tile, config) {
            Owner::This => retained.push(feature),
            Owner::Other(code) => {
                log::debug!("feature {} of tile {} belongs to tile {}", feature.id, tile.code, code);
                tile.add_dependent(code);
            }
        }
    }

    log::debug!(
        "tile {} keeps {} features, {} dependent tiles",
        tile.code,
        retained.len(),
        tile.dependents.len()
    );

    tile.features = retained;
    tile
}

enum Owner {
    This,
    Other(TileCode),
}

fn owner_of(feature: &Feature, tile: &Tile, config: &TilingConfig) -> Owner {
    let indices = qualifying_coordinate(&feature.geometry, &config.max_extent).and_then(|coord| {
        candidate_indices(
            &coord,
            &config.max_extent,
            tile.layer_size,
            tile.code.tiles_per_side(),
            config.rounding_tolerance,
        )
    });

    match indices {
        Some(indices) if indices.contains(tile.code.x, tile.code.y) => Owner::This,
        Some(indices) => Owner::Other(TileCode::new(tile.code.level, indices.primary.0, indices.primary.1)),
        None if tile.code.is_origin() => Owner::This,
        None => Owner::Other(TileCode::origin(tile.code.level)),
    }
}

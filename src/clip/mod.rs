mod clip_error;
mod clip_feature;

use geo::{Coordinate, Rect};

use crate::config::TilingConfig;
use crate::feature::{empty_geometry, Feature, FeatureCollection};
use crate::tile::Tile;
use crate::utils::TileError;

pub use clip_error::ClipError;
pub use clip_feature::{Clip, ClipFloat, FromF64, CLIPPER_FACTOR};


/// Whether `feature` spans more than `max_screen_coordinate` pixels on either axis at `scale`.
pub fn exceeds_screen_dimensions(feature: &Feature, scale: f64, max_screen_coordinate: u32) -> bool {
    let max = max_screen_coordinate as f64;
    match feature.envelope() {
        Some(envelope) => envelope.width() * scale > max || envelope.height() * scale > max,
        None => false,
    }
}

/// Largest rectangle around `pan_origin` that stays within the rendering surface's precision,
/// but never less than one tile in each direction.
pub fn max_screen_envelope(tile: &Tile, pan_origin: Coordinate<f64>, max_screen_coordinate: u32) -> Rect<f64> {
    let (screen_width, screen_height) = tile.screen_size;
    let tiles_x = margin_in_tiles(max_screen_coordinate, screen_width) as f64;
    let tiles_y = margin_in_tiles(max_screen_coordinate, screen_height) as f64;

    let dx = tiles_x * tile.tile_width();
    let dy = tiles_y * tile.tile_height();

    Rect::new(
        Coordinate { x: pan_origin.x - dx, y: pan_origin.y - dy },
        Coordinate { x: pan_origin.x + dx, y: pan_origin.y + dy },
    )
}

fn margin_in_tiles(max_screen_coordinate: u32, tile_screen_size: u32) -> u32 {
    max_screen_coordinate.checked_div(tile_screen_size).unwrap_or(0).max(1)
}

/// Replaces the rendering geometry of every oversized feature of `tile` by its intersection
/// with the envelope around `pan_origin`.
///
/// The envelope only depends on the tile, `pan_origin` and the configured maximum, so panning
/// changes the clipped geometries but zooming in and out at the same origin does not.
/// Fails on the first feature that cannot be clipped; the tile is lost in that case.
pub fn clip_tile(mut tile: Tile, scale: f64, pan_origin: Coordinate<f64>, config: &TilingConfig) -> Result<Tile, TileError> {
    let features = std::mem::take(&mut tile.features);
    let mut clip_bounds: Option<Rect<f64>> = None;
    let mut output = FeatureCollection::new();

    for feature in features {
        if !exceeds_screen_dimensions(&feature, scale, config.max_screen_coordinate) {
            output.push(feature);
            continue;
        }

        log::debug!("feature {} of tile {} exceeds screen dimensions", feature.id, tile.code);
        let bounds = *clip_bounds
            .get_or_insert_with(|| max_screen_envelope(&tile, pan_origin, config.max_screen_coordinate));

        let clipped = feature.geometry.clip(&bounds).map_err(|e| TileError::new(tile.code, e))?;
        output.push(feature.with_clipped_geometry(clipped.unwrap_or_else(empty_geometry)));
    }

    if clip_bounds.is_some() {
        tile.clipped = true;
        tile.clip_bounds = clip_bounds;
    }
    tile.features = output;

    Ok(tile)
}

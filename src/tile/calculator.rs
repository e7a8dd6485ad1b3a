use geo::{Coordinate, Rect};

use crate::tile::TileCode;


/// World size of one tile of `code.level`.
///
/// The extent is divided by `2^level` and rounded up to whole pixels at `scale`, so tile
/// edges always land on pixel boundaries.
pub fn layer_size(code: &TileCode, max_extent: &Rect<f64>, scale: f64) -> (f64, f64) {
    let div = code.tiles_per_side() as f64;
    let width = (scale * max_extent.width() / div).ceil() / scale;
    let height = (scale * max_extent.height() / div).ceil() / scale;
    (width, height)
}

pub fn screen_size(world_size: (f64, f64), scale: f64) -> (u32, u32) {
    let (width, height) = world_size;
    ((scale * width).round() as u32, (scale * height).round() as u32)
}

/// World bounds of the tile at `code`, or `None` for a degenerate layer or scale.
pub fn bounds(code: &TileCode, max_extent: &Rect<f64>, scale: f64) -> Option<Rect<f64>> {
    if !(scale > 0.0) {
        return None;
    }
    let (width, height) = layer_size(code, max_extent, scale);
    if width == 0.0 || !width.is_finite() || !height.is_finite() {
        return None;
    }

    let origin = max_extent.min();
    let min = Coordinate {
        x: origin.x + code.x as f64 * width,
        y: origin.y + code.y as f64 * height,
    };
    Some(Rect::new(min, Coordinate { x: min.x + width, y: min.y + height }))
}

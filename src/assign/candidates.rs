use geo::{Coordinate, Rect};


/// The one or two grid cells a coordinate may belong to.
///
/// `secondary` is only set when adding the rounding tolerance pushes the coordinate over a
/// tile edge, i.e. when the coordinate sits right below that edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateIndices {
    pub primary: (u32, u32),
    pub secondary: Option<(u32, u32)>,
}

impl CandidateIndices {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.iter().any(|candidate| candidate == (x, y))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

/// Normalizes `coord` into grid indices of a level with `tiles_per_side` tiles of
/// `tile_size` (world units) per axis, starting at the extent's minimum corner.
pub fn candidate_indices(
    coord: &Coordinate<f64>,
    max_extent: &Rect<f64>,
    tile_size: (f64, f64),
    tiles_per_side: u64,
    tolerance: f64,
) -> Option<CandidateIndices> {
    let (tile_width, tile_height) = tile_size;
    if !(tile_width > 0.0 && tile_height > 0.0) || !coord.x.is_finite() || !coord.y.is_finite() {
        return None;
    }

    let xd = (coord.x - max_extent.min().x) / tile_width;
    let yd = (coord.y - max_extent.min().y) / tile_height;

    let primary = (grid_index(xd, tiles_per_side), grid_index(yd, tiles_per_side));
    let tolerant = (grid_index(xd + tolerance, tiles_per_side), grid_index(yd + tolerance, tiles_per_side));

    Some(CandidateIndices {
        primary,
        secondary: if tolerant != primary { Some(tolerant) } else { None },
    })
}

fn grid_index(d: f64, tiles_per_side: u64) -> u32 {
    let last = tiles_per_side.saturating_sub(1).min(u32::MAX as u64);
    if d <= 0.0 {
        0
    } else {
        // float to int casts saturate
        (d.floor() as u64).min(last) as u32
    }
}

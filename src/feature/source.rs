use geo::Rect;

use crate::assign::qualifying_coordinate;
use crate::feature::FeatureCollection;


/// Upstream query producing the candidate features of a tile.
pub trait FeatureSource {
    /// all features whose geometry may overlap `bounds`
    fn query(&self, bounds: &Rect<f64>) -> anyhow::Result<FeatureCollection>;

    /// all features without any coordinate inside `max_extent`, empty geometries included
    fn unplaceable(&self, max_extent: &Rect<f64>) -> anyhow::Result<FeatureCollection>;
}

fn overlaps(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x && a.max().x >= b.min().x && a.min().y <= b.max().y && a.max().y >= b.min().y
}

/// Linear scan over an in-memory layer, comparing envelopes.
impl FeatureSource for FeatureCollection {
    fn query(&self, bounds: &Rect<f64>) -> anyhow::Result<FeatureCollection> {
        Ok(self
            .iter()
            .filter(|f| f.envelope().map_or(false, |envelope| overlaps(&envelope, bounds)))
            .cloned()
            .collect())
    }

    fn unplaceable(&self, max_extent: &Rect<f64>) -> anyhow::Result<FeatureCollection> {
        Ok(self
            .iter()
            .filter(|f| qualifying_coordinate(&f.geometry, max_extent).is_none())
            .cloned()
            .collect())
    }
}

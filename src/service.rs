use geo::Coordinate;

use crate::assign::{assign_tile, qualifying_coordinate};
use crate::clip::clip_tile;
use crate::config::TilingConfig;
use crate::feature::{FeatureCollection, FeatureSource};
use crate::tile::{Tile, TileCode};
use crate::utils::TileError;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use geo::{Coordinate, Geometry, Line, LineString, Point, Rect};
    use crate::config::TilingConfig;
    use crate::feature::{Feature, FeatureCollection, FeatureSource};
    use crate::service::TileService;
    use crate::tile::TileCode;

    struct FailingSource {}
    impl FeatureSource for FailingSource {
        fn query(&self, _: &Rect<f64>) -> anyhow::Result<FeatureCollection> {
            Err(anyhow::Error::msg("source is offline"))
        }

        fn unplaceable(&self, _: &Rect<f64>) -> anyhow::Result<FeatureCollection> {
            Err(anyhow::Error::msg("source is offline"))
        }
    }

    fn service() -> TileService {
        TileService::new(TilingConfig::new(Rect::new(
            Coordinate { x: 0.0, y: 0.0 },
            Coordinate { x: 100000.0, y: 100000.0 },
        )))
    }

    fn source() -> FeatureCollection {
        FeatureCollection(vec![
            Feature::new("west", Geometry::Point(Point::new(10000.0, 10000.0))),
            Feature::new("east", Geometry::Point(Point::new(90000.0, 10000.0))),
            Feature::new(
                "road",
                Geometry::Line(Line::new(Coordinate { x: 20000.0, y: 20000.0 }, Coordinate { x: 80000.0, y: 20000.0 })),
            ),
        ])
    }

    #[test]
    fn every_feature_is_kept_somewhere_in_the_covering() {
        let service = TileService::new(TilingConfig::new(Rect::new(
            Coordinate { x: 0.0, y: 0.0 },
            Coordinate { x: 1000.0, y: 1000.0 },
        )));
        let source = FeatureCollection(vec![
            Feature::new("empty", Geometry::LineString(LineString(vec![]))),
            Feature::new("outside", Geometry::Point(Point::new(-50.0, -50.0))),
            Feature::new(
                "skirting",
                Geometry::Line(Line::new(Coordinate { x: -10.0, y: 500.0 }, Coordinate { x: 500.0, y: 1010.0 })),
            ),
            Feature::new(
                "corner",
                Geometry::Line(Line::new(Coordinate { x: -10.0, y: -10.0 }, Coordinate { x: 100.0, y: 100.0 })),
            ),
            Feature::new("inside", Geometry::Point(Point::new(700.0, 800.0))),
        ]);

        let mut owners: HashMap<String, Vec<TileCode>> = HashMap::new();
        for code in TileCode::covering(2) {
            let tile = service.fetch_tile(code, 1.0, Coordinate { x: 500.0, y: 500.0 }, &source).unwrap().unwrap();
            for feature in tile.features.iter() {
                owners.entry(feature.id.clone()).or_default().push(code);
            }
        }

        assert_eq!(5, owners.len());
        for id in ["empty", "outside", "skirting", "corner"] {
            assert_eq!(&vec![TileCode::origin(2)], owners.get(id).unwrap(), "{}", id);
        }
        assert_eq!(&vec![TileCode::new(2, 2, 3)], owners.get("inside").unwrap());
    }

    #[test]
    fn tile_is_none_for_degenerate_scale() {
        assert!(service().tile(TileCode::new(1, 0, 0), -1.0).is_none());
        assert!(service().tile(TileCode::new(1, 0, 0), 1.0).is_some());
    }

    #[test]
    fn fetch_tile_assigns_and_clips() {
        let tile = service()
            .fetch_tile(TileCode::new(1, 0, 0), 1.0, Coordinate { x: 25000.0, y: 25000.0 }, &source())
            .unwrap()
            .unwrap();

        assert_eq!(vec!["west", "road"], tile.features.ids());
        assert!(tile.dependents.is_empty());

        // the road is 60000 px long at scale 1
        assert!(tile.clipped);
        assert!(tile.features[1].is_clipped());
        assert!(!tile.features[0].is_clipped());
    }

    #[test]
    fn fetch_tile_records_owner_of_features_it_drops() {
        let tile = service()
            .fetch_tile(TileCode::new(1, 1, 0), 0.001, Coordinate { x: 75000.0, y: 25000.0 }, &source())
            .unwrap()
            .unwrap();

        assert_eq!(vec!["east"], tile.features.ids());
        assert_eq!(vec![TileCode::new(1, 0, 0)], tile.dependents.into_iter().collect::<Vec<_>>());
        assert!(!tile.clipped);
    }

    #[test]
    fn fetch_tile_skips_degenerate_tiles() {
        let tile = service()
            .fetch_tile(TileCode::new(1, 0, 0), 0.0, Coordinate { x: 0.0, y: 0.0 }, &source())
            .unwrap();

        assert!(tile.is_none());
    }

    #[test]
    fn fetch_tile_wraps_source_errors() {
        let err = service()
            .fetch_tile(TileCode::new(2, 3, 1), 1.0, Coordinate { x: 0.0, y: 0.0 }, &FailingSource {})
            .unwrap_err();

        assert_eq!(TileCode::new(2, 3, 1), err.code());
        assert_eq!("tile 2-3-1 failed: source is offline", err.to_string());
    }
}

/// Produces request-scoped tiles of one layer.
pub struct TileService {
    config: TilingConfig,
}

impl TileService {
    pub fn new(config: TilingConfig) -> Self {
        TileService { config }
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    /// Empty tile for `code` at `scale`.
    pub fn tile(&self, code: TileCode, scale: f64) -> Option<Tile> {
        Tile::new(code, &self.config, scale)
    }

    /// Queries `source` for the candidates of the tile, keeps the features the tile owns and
    /// clips the oversized ones around `pan_origin`.
    ///
    /// Returns `Ok(None)` if the tile has no extent at `scale`.
    pub fn fetch_tile(
        &self,
        code: TileCode,
        scale: f64,
        pan_origin: Coordinate<f64>,
        source: &dyn FeatureSource,
    ) -> Result<Option<Tile>, TileError> {
        let tile = match self.tile(code, scale) {
            Some(tile) => tile,
            None => {
                log::warn!("skipping tile {}: no extent at scale {}", code, scale);
                return Ok(None);
            }
        };

        let candidates = self.candidates(&tile, source).map_err(|e| TileError::new(code, e))?;
        let tile = assign_tile(tile, candidates, &self.config);

        clip_tile(tile, scale, pan_origin, &self.config).map(Some)
    }

    /// Features overlapping the tile. The origin tile also receives every feature that has no
    /// coordinate inside the extent, since no query by bounds would ever hand those out.
    fn candidates(&self, tile: &Tile, source: &dyn FeatureSource) -> anyhow::Result<FeatureCollection> {
        let mut candidates = source.query(&tile.bounds)?;
        if !tile.code.is_origin() {
            return Ok(candidates);
        }

        let max_extent = &self.config.max_extent;
        candidates.retain(|f| qualifying_coordinate(&f.geometry, max_extent).is_some());
        candidates.extend(source.unplaceable(max_extent)?);

        Ok(candidates)
    }
}

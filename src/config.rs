use std::fs::File;
use std::io::{BufReader, Error, ErrorKind};
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::bail;
use geo::{Coordinate, Rect};
use serde::Deserialize;

use crate::utils::MAX_TILE_SET_LEVEL;


/// Tolerance, in fractions of a tile, used to absorb rounding at tile edges.
pub const DEFAULT_ROUNDING_TOLERANCE: f64 = 1e-6;

/// Largest screen distance, in pixels, a rendering surface handles without losing precision.
pub const DEFAULT_MAX_SCREEN_COORDINATE: u32 = 10000;

/// Everything the tiling and clipping passes need to know about a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingConfig {
    pub max_extent: Rect<f64>,
    pub rounding_tolerance: f64,
    pub max_screen_coordinate: u32,
}

impl TilingConfig {
    pub fn new(max_extent: Rect<f64>) -> Self {
        TilingConfig {
            max_extent,
            rounding_tolerance: DEFAULT_ROUNDING_TOLERANCE,
            max_screen_coordinate: DEFAULT_MAX_SCREEN_COORDINATE,
        }
    }
}

///
/// `layer.json`, describing the layer to tile:
/// ```ts
/// interface LayerJSON {
///     name: string,
///     maxExtent: [number, number, number, number], // minX, minY, maxX, maxY
///     tileSize: number, // pixels per tile edge
///     minLevel: number,
///     maxLevel: number,
///     panOrigin?: [number, number],
///     roundingTolerance?: number,
///     maxScreenCoordinate?: number,
/// }
/// ```
///
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerJSON {
    pub name: String,
    pub max_extent: [f64; 4],
    pub tile_size: u32,
    pub min_level: u8,
    pub max_level: u8,
    pub pan_origin: Option<[f64; 2]>,
    pub rounding_tolerance: Option<f64>,
    pub max_screen_coordinate: Option<u32>,
}

impl LayerJSON {
    pub fn extent(&self) -> Rect<f64> {
        let [min_x, min_y, max_x, max_y] = self.max_extent;
        Rect::new(Coordinate { x: min_x, y: min_y }, Coordinate { x: max_x, y: max_y })
    }

    pub fn tiling_config(&self) -> anyhow::Result<TilingConfig> {
        let [min_x, min_y, max_x, max_y] = self.max_extent;
        if !self.max_extent.iter().all(|v| v.is_finite()) {
            bail!("maxExtent contains non-finite values");
        }
        if max_x <= min_x || max_y <= min_y {
            bail!("maxExtent must be given as [minX, minY, maxX, maxY] with a non-empty area");
        }

        let mut config = TilingConfig::new(self.extent());
        if let Some(tolerance) = self.rounding_tolerance {
            if !(tolerance >= 0.0 && tolerance < 1.0) {
                bail!("roundingTolerance must be within [0, 1), got {}", tolerance);
            }
            config.rounding_tolerance = tolerance;
        }
        if let Some(max) = self.max_screen_coordinate {
            config.max_screen_coordinate = max;
        }

        Ok(config)
    }

    /// Levels to build, at most up to [`MAX_TILE_SET_LEVEL`].
    pub fn levels(&self) -> anyhow::Result<RangeInclusive<u8>> {
        if self.min_level > self.max_level {
            bail!("minLevel {} is above maxLevel {}", self.min_level, self.max_level);
        }
        if self.max_level > MAX_TILE_SET_LEVEL {
            bail!("maxLevel {} exceeds the supported maximum of {}", self.max_level, MAX_TILE_SET_LEVEL);
        }

        Ok(self.min_level..=self.max_level)
    }

    /// scale at which one tile of `level` is `tile_size` pixels wide
    pub fn scale_for_level(&self, level: u8) -> f64 {
        let pixels = self.tile_size as f64 * (1_u64 << level.min(62)) as f64;
        pixels / self.extent().width()
    }

    pub fn pan_origin(&self) -> Coordinate<f64> {
        match self.pan_origin {
            Some([x, y]) => Coordinate { x, y },
            None => self.extent().center(),
        }
    }
}

pub trait LayerJsonParser {
    fn parse(&self, path: &Path) -> Result<LayerJSON, Box<Error>>;
}

pub struct DummyLayerJsonParser {
    pub succeeds: bool,
}
impl LayerJsonParser for DummyLayerJsonParser {
    fn parse(&self, _: &Path) -> Result<LayerJSON, Box<Error>> {
        if self.succeeds {
            Ok(LayerJSON {
                name: "dummy".to_string(),
                max_extent: [0.0, 0.0, 1000.0, 1000.0],
                tile_size: 256,
                min_level: 0,
                max_level: 1,
                pan_origin: None,
                rounding_tolerance: None,
                max_screen_coordinate: None,
            })
        } else {
            Err(Box::new(Error::new(ErrorKind::Other, "dummy error")))
        }
    }
}

pub struct SerdeLayerJsonParser {}
impl LayerJsonParser for SerdeLayerJsonParser {
    fn parse(&self, path: &Path) -> Result<LayerJSON, Box<Error>> {
        if !path.is_file() {
            return Err(Box::new(Error::new(
                ErrorKind::NotFound,
                "Couldn't find layer.json",
            )));
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);

        match serde_json::from_reader(reader) {
            Ok(layer) => Ok(layer),
            Err(err) => Err(Box::new(Error::new(ErrorKind::Other, err.to_string()))),
        }
    }
}

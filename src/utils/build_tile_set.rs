use std::{
    collections::BTreeMap,
    fs::{create_dir_all, File},
    io::{BufWriter, Error, ErrorKind, Write},
    path::Path,
};

use geo::Coordinate;
use geojson::GeoJson;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use super::TileError;
use crate::feature::{to_geo_json, FeatureSource};
use crate::service::TileService;
use crate::tile::{Tile, TileCode};


/// Highest level a tile set is built for; level 12 already has 2^24 tiles.
pub const MAX_TILE_SET_LEVEL: u8 = 12;

/// What a tile set build produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TileSetSummary {
    pub tiles: usize,
    pub features: usize,
    pub clipped_features: usize,
}

/// Fetches every tile of `level` from `service` in parallel and writes it as
/// `<level>/<x>/<y>.geojson` below `set_base_path`. Dependents of all tiles are written to
/// `<level>/dependents.json`.
///
/// Failing tiles do not stop the others; they are reported together at the end.
pub fn build_tile_set<S: FeatureSource + Sync>(
    set_base_path: &Path,
    service: &TileService,
    source: &S,
    level: u8,
    scale: f64,
    pan_origin: Coordinate<f64>,
) -> Result<TileSetSummary, Box<dyn std::error::Error>> {
    if level > MAX_TILE_SET_LEVEL {
        return Err(Box::new(Error::new(
            ErrorKind::InvalidInput,
            format!("Level {} exceeds the maximum tile set level {}", level, MAX_TILE_SET_LEVEL),
        )));
    }

    let tiles_per_row_col = TileCode::origin(level).tiles_per_side();
    let level_path = set_base_path.join(level.to_string());

    // generate all column directories
    (0..tiles_per_row_col)
        .into_par_iter()
        .map(|col| create_dir_all(level_path.join(col.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    let results: Vec<_> = TileCode::covering(level)
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|code| -> Result<Option<Tile>, TileError> {
            let tile = service.fetch_tile(code, scale, pan_origin, source)?;
            if let Some(tile) = &tile {
                write_tile(set_base_path, tile).map_err(|e| TileError::new(code, e))?;
            }
            Ok(tile)
        })
        .collect();

    let mut summary = TileSetSummary::default();
    let mut dependents: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut errors: Vec<TileError> = vec![];

    for result in results {
        match result {
            Ok(Some(tile)) => {
                summary.tiles += 1;
                summary.features += tile.features.len();
                summary.clipped_features += tile.features.iter().filter(|f| f.is_clipped()).count();
                if !tile.dependents.is_empty() {
                    dependents.insert(
                        tile.code.to_string(),
                        tile.dependents.iter().map(TileCode::to_string).collect(),
                    );
                }
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    if errors.len() > 0 {
        let mut error_string: Vec<String> = errors
            .iter()
            .take(10)
            .map(|e| -> String { format!("\t{}", e) })
            .collect();

        if errors.len() > 10 {
            error_string.push(format!("\t... and {} more Tiles", errors.len() - 10))
        }

        return Err(Box::new(Error::new(
            ErrorKind::Other,
            format!(
                "Failed to generate (multiple) tile(s):\n{}",
                error_string.join("\n")
            ),
        )));
    }

    let file = File::create(level_path.join("dependents.json"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &dependents)?;

    Ok(summary)
}

fn write_tile(set_base_path: &Path, tile: &Tile) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file_path = set_base_path
        .join(tile.code.level.to_string())
        .join(tile.code.x.to_string())
        .join(format!("{}.geojson", tile.code.y));

    let geo_json = GeoJson::FeatureCollection(to_geo_json(&tile.features));
    let mut buf = BufWriter::new(File::create(file_path)?);
    buf.write_all(geo_json.to_string().as_bytes())?;
    buf.flush()?;

    Ok(())
}

mod build_tile_set;
mod tile_error;

pub use build_tile_set::{build_tile_set, TileSetSummary, MAX_TILE_SET_LEVEL};
pub use tile_error::TileError;

#[cfg(test)]
pub use test_helper::with_input_and_output_paths;

#[cfg(test)]
mod test_helper {
    use std::fs::DirBuilder;
    use std::path::PathBuf;
    use tempdir::TempDir;

    pub fn with_input_and_output_paths(f: fn(PathBuf, PathBuf) -> ()) -> std::io::Result<()> {
        let dir = TempDir::new("vector-tiler-in")?;
        let temp_dir_path = dir.path();
        let input_path = temp_dir_path.join("input");
        let output_path = temp_dir_path.join("output");
        DirBuilder::new().create(&input_path)?;
        DirBuilder::new().create(&output_path)?;

        f(input_path, output_path);

        dir.close()
    }
}

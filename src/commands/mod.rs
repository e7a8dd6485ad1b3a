mod clap_command;
mod tiles;

use std::path::Path;

pub use clap_command::ClapCommand;
pub use tiles::VectorTiles;

pub trait TileDataCommand {
    fn get_description(&self) -> &str;
    fn exec(&self, input_path: &Path, output_path: &Path) -> anyhow::Result<()>;
}

#[cfg(test)]
pub struct DummyTileDataCommand {}

#[cfg(test)]
impl TileDataCommand for DummyTileDataCommand {
    fn get_description(&self) -> &str {
        "dummy"
    }

    fn exec(&self, _: &Path, _: &Path) -> anyhow::Result<()> {
        Ok(())
    }
}

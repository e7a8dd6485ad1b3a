use clap::{App, arg};
use std::path::PathBuf;
use anyhow::bail;
use crate::commands::TileDataCommand;


pub struct ClapCommand {
    pub identifier: String,
    pub exec: Box<dyn TileDataCommand>,
}

impl ClapCommand {
    pub fn new(identifier: &str, exec: Box<dyn TileDataCommand>) -> Self {
        ClapCommand { identifier: identifier.to_string(), exec }
    }

    pub fn register(&self) -> App<'_> {
        let app = App::new(self.identifier.as_str())
            .about(self.exec.get_description());

        app
            .arg(arg!(-i --input <INPUT_DIR> "Path to layer directory containing layer.json and features.geojson(.gz)"))
            .arg(arg!(-o --output <OUTPUT_DIR> "Path to output directory"))
    }

    pub fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
        let input_path = existing_dir(args, "input")?;
        let output_path = existing_dir(args, "output")?;

        self.exec.exec(&input_path, &output_path)
    }
}

fn existing_dir(args: &clap::ArgMatches, name: &str) -> anyhow::Result<PathBuf> {
    let path = match args.value_of(name) {
        Some(s) => PathBuf::from(s),
        None => bail!("Missing {} path", name),
    };

    if !path.is_dir() {
        bail!("{} path {} is not a directory", name, path.display());
    }

    Ok(path)
}

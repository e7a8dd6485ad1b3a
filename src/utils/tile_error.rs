use std::error::Error;
use std::fmt;

use crate::tile::TileCode;

type Cause = Box<dyn Error + Send + Sync>;


/// Failure of a single tile, tagged with its code so a tile set build can report it next to
/// the others.
#[derive(Debug)]
pub struct TileError {
    code: TileCode,
    cause: Cause,
}

impl TileError {
    pub fn new(code: TileCode, cause: impl Into<Cause>) -> Self {
        TileError { code, cause: cause.into() }
    }

    pub fn code(&self) -> TileCode {
        self.code
    }
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tile {} failed: {}", self.code, self.cause)
    }
}

impl Error for TileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.cause)
    }
}

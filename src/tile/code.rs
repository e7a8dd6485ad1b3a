use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use crate::tile::TileCode;

    #[test]
    fn display_uses_dashes() {
        assert_eq!("3-5-1", TileCode::new(3, 5, 1).to_string());
    }

    #[rstest]
    #[case("0-0-0", TileCode::new(0, 0, 0))]
    #[case("1-1-0", TileCode::new(1, 1, 0))]
    #[case("12-4095-7", TileCode::new(12, 4095, 7))]
    fn parses_what_it_displays(#[case] input: &str, #[case] expected: TileCode) {
        let parsed: TileCode = input.parse().unwrap();
        assert_eq!(expected, parsed);
        assert_eq!(input, parsed.to_string());
    }

    #[rstest]
    #[case("")]
    #[case("1-1")]
    #[case("1-1-1-1")]
    #[case("a-1-1")]
    #[case("1-2-0")]
    #[case("1-0--1")]
    fn rejects_malformed_codes(#[case] input: &str) {
        assert!(input.parse::<TileCode>().is_err());
    }

    #[test]
    fn covering_enumerates_whole_level() {
        let codes: Vec<TileCode> = TileCode::covering(2).collect();

        assert_eq!(16, codes.len());
        assert_eq!(TileCode::new(2, 0, 0), codes[0]);
        assert_eq!(TileCode::new(2, 3, 3), codes[15]);
        assert!(codes.iter().all(|c| c.level == 2 && c.x < 4 && c.y < 4));
    }

    #[test]
    fn covering_level_zero_is_single_origin_tile() {
        let codes: Vec<TileCode> = TileCode::covering(0).collect();
        assert_eq!(vec![TileCode::new(0, 0, 0)], codes);
        assert!(codes[0].is_origin());
    }

    #[test]
    fn tiles_per_side_doubles_each_level() {
        assert_eq!(1, TileCode::new(0, 0, 0).tiles_per_side());
        assert_eq!(2, TileCode::new(1, 0, 0).tiles_per_side());
        assert_eq!(1024, TileCode::new(10, 0, 0).tiles_per_side());
    }
}

/// Deepest level whose grid indices still fit into a `u32`.
pub const MAX_LEVEL: u8 = 32;

/// Address of a tile in the power-of-two grid of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCode {
    pub level: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCode {
    pub fn new(level: u8, x: u32, y: u32) -> Self {
        TileCode { level, x, y }
    }

    /// the tile every unplaceable feature falls back to
    pub fn origin(level: u8) -> Self {
        TileCode::new(level, 0, 0)
    }

    pub fn is_origin(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    pub fn tiles_per_side(&self) -> u64 {
        tiles_per_side(self.level)
    }

    /// All codes of `level`, column by column.
    pub fn covering(level: u8) -> impl Iterator<Item = TileCode> {
        let n = tiles_per_side(level.min(MAX_LEVEL)).min(u32::MAX as u64 + 1);
        (0..n).flat_map(move |x| (0..n).map(move |y| TileCode::new(level, x as u32, y as u32)))
    }
}

pub fn tiles_per_side(level: u8) -> u64 {
    1_u64.checked_shl(level as u32).unwrap_or(u64::MAX)
}

impl Display for TileCode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.level, self.x, self.y)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TileCodeParseError {
    #[error("Expected a tile code like <level>-<x>-<y>, got '{}'", .0)]
    Malformed(String),

    #[error("Index {} is outside of level {}", .1, .0)]
    OutOfGrid(u8, u32),
}

impl FromStr for TileCode {
    type Err = TileCodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TileCodeParseError::Malformed(s.to_string());

        let parts: Vec<&str> = s.split('-').collect();
        let (level, x, y) = match parts.as_slice() {
            [level, x, y] => (
                level.parse::<u8>().map_err(|_| malformed())?,
                x.parse::<u32>().map_err(|_| malformed())?,
                y.parse::<u32>().map_err(|_| malformed())?,
            ),
            _ => return Err(malformed()),
        };

        if level > MAX_LEVEL {
            return Err(malformed());
        }

        let n = tiles_per_side(level);
        for index in [x, y] {
            if index as u64 >= n {
                return Err(TileCodeParseError::OutOfGrid(level, index));
            }
        }

        Ok(TileCode::new(level, x, y))
    }
}

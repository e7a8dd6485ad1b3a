#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ClipError {
    #[error("Coordinate ({}, {}) is not a finite number", .0, .1)]
    NonFiniteCoordinate(f64, f64),

    // the polygon clipper works on scaled 64 bit integers
    #[error("Coordinate ({}, {}) is too large to be clipped", .0, .1)]
    CoordinateOutOfRange(f64, f64),
}

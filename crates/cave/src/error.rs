//! Error type shared by grid construction, parsing and simulation.

use thiserror::Error;

use crate::cell::Coord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaveError {
    #[error("cannot draw line from {from} to {to}: segment is not axis-aligned")]
    MalformedSegment { from: Coord, to: Coord },
    #[error("cave has no rock to measure from")]
    EmptyMap,
    #[error("no cell recorded at {0}")]
    MissingCell(Coord),
    #[error("line {line}: cannot parse vertex {text:?}")]
    InvalidVertex { line: usize, text: String },
    #[error("line {line}: a path needs at least two vertices")]
    PathTooShort { line: usize },
    #[error("source {origin} is not above the limiting row {limit}")]
    SourceOutOfBounds { origin: Coord, limit: i32 },
    #[error("row {row} offset by {offset} leaves the coordinate range")]
    RowOutOfRange { row: i32, offset: i32 },
}

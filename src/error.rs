//! Error types for board construction, loading and search.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejection of a board description, or a comparison between boards of different sizes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no tiles")]
    Empty,
    #[error("{len} tiles do not form a square grid")]
    NotSquare { len: usize },
    #[error("dimension {dimension} is too small, need at least 2")]
    DimensionTooSmall { dimension: usize },
    #[error("dimension {dimension} is too large, at most {max} is supported")]
    DimensionTooLarge { dimension: usize, max: usize },
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("tile {value} at position {index} is outside 0..{limit}")]
    TileOutOfRange {
        index: usize,
        value: u32,
        limit: usize,
    },
    #[error("tile {value} appears more than once")]
    DuplicateTile { value: u32 },
    #[error("expected {expected} tile values, found {found}")]
    TokenCount { expected: usize, found: usize },
    #[error("`{token}` is not a non-negative integer")]
    InvalidToken { token: String },
    #[error("boards of dimension {left} and {right} cannot be compared")]
    DimensionMismatch { left: usize, right: usize },
}

impl BoardError {
    /// True for every variant describing bad input, i.e. all but `DimensionMismatch`.
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, BoardError::DimensionMismatch { .. })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("gave up after expanding {limit} nodes")]
    ExpansionLimit { limit: usize },
    #[error("frontier emptied before either search reached the goal")]
    FrontierExhausted,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
}

//! Tile alphabet and adjacency rules for the dungeon generators.
//!
//! Holds the built-in dungeon compatibility table and loaders for
//! replacement tables written as RON or JSON rule files.

use thiserror::Error;

pub mod formats;
pub mod loader;
pub mod types;

pub use types::{AdjacencyRules, Direction, Tile, TileParseError, TileRule, DUNGEON_RULES};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rules format (e.g., RON/JSON): {0}")]
    ParseError(String),
    #[error("Invalid rule data: {0}")]
    InvalidData(String),
    #[error("Unsupported rule file format: {0}")]
    UnsupportedFormat(String),
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),
}

impl From<TileParseError> for LoadError {
    fn from(error: TileParseError) -> Self {
        Self::InvalidData(error.to_string())
    }
}

//! Module defining parsers for different rule file formats.

pub mod parser;
pub use parser::FormatParser;

pub mod json_format;
pub mod ron_format;

pub use json_format::JsonFormatParser;
pub use ron_format::RonFormatParser;

#[cfg(feature = "serde")]
use crate::{AdjacencyRules, Direction, LoadError, Tile};
#[cfg(feature = "serde")]
use log::debug;
#[cfg(feature = "serde")]
use std::collections::HashSet;

/// One tile's allowed neighbours, as written in a rule file.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct RuleEntry {
    tile: String,
    #[serde(default)]
    north: Vec<String>,
    #[serde(default)]
    east: Vec<String>,
    #[serde(default)]
    south: Vec<String>,
    #[serde(default)]
    west: Vec<String>,
}

#[cfg(feature = "serde")]
impl RuleEntry {
    fn toward(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }
}

/// Top-level structure shared by every rule file format.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct RuleFile {
    rules: Vec<RuleEntry>,
}

/// Converts a deserialized rule file into [`AdjacencyRules`].
///
/// Tiles without an entry inherit the `Empty` entry, which is therefore
/// mandatory.
#[cfg(feature = "serde")]
pub(crate) fn build_rules(file: &RuleFile) -> Result<AdjacencyRules, LoadError> {
    let mut rules = AdjacencyRules::empty();
    let mut defined = HashSet::new();

    for entry in &file.rules {
        let tile: Tile = entry.tile.parse()?;
        if !defined.insert(tile) {
            return Err(LoadError::InvalidData(format!(
                "Duplicate rule for tile: {}",
                entry.tile
            )));
        }
        for direction in Direction::ALL {
            for name in entry.toward(direction) {
                let neighbor: Tile = name.parse()?;
                rules.allow(tile, neighbor, direction);
            }
        }
    }

    if !defined.contains(&Tile::Empty) {
        return Err(LoadError::InvalidData(
            "A rule for the Empty tile is required.".to_owned(),
        ));
    }

    for tile in Tile::ALL {
        if !defined.contains(&tile) {
            debug!("No rule for {tile}, inheriting the Empty rule");
            rules.copy_rule(Tile::Empty, tile);
        }
    }

    Ok(rules)
}

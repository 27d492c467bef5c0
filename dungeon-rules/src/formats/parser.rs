use crate::{AdjacencyRules, LoadError};

/// Trait defining the interface for format-specific rule parsers.
///
/// Implementors parse a dungeon adjacency table from one file format.
pub trait FormatParser {
    /// Parses rule content into [`AdjacencyRules`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::ParseError`] for malformed content and
    /// [`LoadError::InvalidData`] for well-formed content naming unknown or
    /// duplicate tiles.
    fn parse(&self, content: &str) -> Result<AdjacencyRules, LoadError>;

    /// Returns a descriptive name for this parser format.
    fn format_name(&self) -> &'static str;
}

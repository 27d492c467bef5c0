use crate::formats::FormatParser;
#[cfg(feature = "serde")]
use crate::formats::{build_rules, RuleFile};
use crate::{AdjacencyRules, LoadError};

/// A parser implementation for RON (Rusty Object Notation) format rules.
pub struct RonFormatParser;

impl Default for RonFormatParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RonFormatParser {
    /// Creates a new RON format parser
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for RonFormatParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    #[cfg(feature = "serde")]
    fn parse(&self, ron_content: &str) -> Result<AdjacencyRules, LoadError> {
        let rule_file: RuleFile = ron::from_str(ron_content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        build_rules(&rule_file)
    }

    /// Stub implementation when the `serde` feature is not enabled.
    #[cfg(not(feature = "serde"))]
    fn parse(&self, _ron_content: &str) -> Result<AdjacencyRules, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for RON parsing)".to_string(),
        ))
    }
}

/// Parses dungeon rules defined in a RON string.
pub fn parse_ron_rules(ron_content: &str) -> Result<AdjacencyRules, LoadError> {
    RonFormatParser::new().parse(ron_content)
}

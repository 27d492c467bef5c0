use crate::formats::FormatParser;
#[cfg(feature = "serde")]
use crate::formats::{build_rules, RuleFile};
use crate::{AdjacencyRules, LoadError};

/// A parser implementation for JSON format rules.
#[derive(Default)]
pub struct JsonFormatParser;

impl JsonFormatParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for JsonFormatParser {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    #[cfg(feature = "serde")]
    fn parse(&self, json_content: &str) -> Result<AdjacencyRules, LoadError> {
        let rule_file: RuleFile = serde_json::from_str(json_content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))?;
        build_rules(&rule_file)
    }

    #[cfg(not(feature = "serde"))]
    fn parse(&self, _json_content: &str) -> Result<AdjacencyRules, LoadError> {
        Err(LoadError::FeatureNotEnabled(
            "serde (required for JSON parsing)".to_string(),
        ))
    }
}

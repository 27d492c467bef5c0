use crate::formats::{FormatParser, JsonFormatParser, RonFormatParser};
use crate::{AdjacencyRules, LoadError};
use log::info;
use std::path::Path;

/// Picks the parser for a rule file based on its extension.
///
/// # Errors
///
/// Returns [`LoadError::UnsupportedFormat`] for anything other than `.ron`
/// or `.json`.
pub fn parser_for_path(path: &Path) -> Result<Box<dyn FormatParser>, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("ron") => Ok(Box::new(RonFormatParser::new())),
        Some("json") => Ok(Box::new(JsonFormatParser::new())),
        other => Err(LoadError::UnsupportedFormat(format!(
            "{} (extension {:?})",
            path.display(),
            other.unwrap_or("")
        ))),
    }
}

/// Loads an adjacency table from a rule file.
///
/// # Arguments
///
/// * `path` - The path to the rule definition file (`.ron` or `.json`).
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read, has an unsupported
/// extension, or does not describe a valid table.
pub fn load_from_file(path: &Path) -> Result<AdjacencyRules, LoadError> {
    let parser = parser_for_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let rules = parser.parse(&content)?;
    info!(
        "Loaded {} adjacency rules from {}",
        parser.format_name(),
        path.display()
    );
    Ok(rules)
}

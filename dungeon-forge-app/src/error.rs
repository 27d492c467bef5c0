use dungeon_core::GenerationError;
use dungeon_rules::LoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generation Error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Rule File Error: {0}")]
    Rules(#[from] LoadError),

    #[error("Settings Error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Visualization Error: {0}")]
    Visualization(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Prefix of environment variables that override layered settings.
pub const ENV_PREFIX: &str = "DUNGEON_FORGE_";

/// Which generator produces the dungeon.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    /// Rectangular rooms joined by corridors.
    Rooms,
    /// Wave Function Collapse over the dungeon tile set.
    #[default]
    Wfc,
}

#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One glyph per cell followed by a short summary.
    #[default]
    Text,
    Json,
}

/// Represents the different visualization modes available.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum VisualizationMode {
    #[default]
    None,
    /// Coloured rendering in the terminal.
    Terminal,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Log level used for solver progress reports.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgressLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
}

/// Settings that can come from defaults, a TOML file, the environment or
/// the command line, in increasing order of precedence.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub generator: GeneratorKind,
    pub width: usize,
    pub height: usize,
    /// Room density for the room generator, in `(0, 1]`.
    pub complexity: f64,
    /// Seed for the run. Taken from the clock when absent.
    pub seed: Option<i64>,
    pub portal_count: usize,
    /// Adjacency table for the WFC generator (`.ron` or `.json`).
    pub rule_file: Option<PathBuf>,
    pub output_format: OutputFormat,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            generator: GeneratorKind::Wfc,
            width: 40,
            height: 40,
            complexity: 0.25,
            seed: None,
            portal_count: 4,
            rule_file: None,
            output_format: OutputFormat::Text,
        }
    }
}

/// Layered settings given explicitly on the command line.
#[derive(Serialize, Debug, Default)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    generator: Option<GeneratorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    complexity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    portal_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_format: Option<OutputFormat>,
}

/// Configuration for the Dungeon Forge application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Optional TOML file with generation settings.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Generator to run [default: wfc].
    #[arg(short, long, value_enum)]
    pub generator: Option<GeneratorKind>,

    /// Width of the dungeon grid [default: 40].
    #[arg(long)]
    pub width: Option<usize>,

    /// Height of the dungeon grid [default: 40].
    #[arg(long)]
    pub height: Option<usize>,

    /// Room density for the room generator [default: 0.25].
    #[arg(long)]
    pub complexity: Option<f64>,

    /// Seed for the random number generator.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Number of portals placed by the WFC generator [default: 4].
    #[arg(long)]
    pub portal_count: Option<usize>,

    /// Path to a RON or JSON adjacency table for the WFC generator.
    #[arg(short, long, value_name = "FILE")]
    pub rule_file: Option<PathBuf>,

    /// Output format [default: text].
    #[arg(long, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Path to save the generated dungeon. Printed to stdout when absent.
    #[arg(short, long, value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Choose the visualization mode.
    #[arg(long, value_enum, default_value_t = VisualizationMode::None)]
    pub visualization_mode: VisualizationMode,

    /// Report progress updates every specified interval (e.g., "1s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub report_progress_interval: Option<Duration>,

    /// Generate this many layouts from consecutive seeds and report timings.
    #[arg(long, value_name = "N")]
    pub batch_runs: Option<usize>,

    /// Optional: Path to save batch results as a CSV file.
    /// Only used if batch_runs is also set.
    #[arg(long, value_name = "CSV_FILE")]
    pub batch_csv_output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = GlobalLogLevel::Info)]
    pub global_log_level: GlobalLogLevel,

    #[arg(long, value_enum, default_value_t = ProgressLogLevel::Info)]
    pub progress_log_level: ProgressLogLevel,
}

impl AppConfig {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            generator: self.generator,
            width: self.width,
            height: self.height,
            complexity: self.complexity,
            seed: self.seed,
            portal_count: self.portal_count,
            rule_file: self.rule_file.clone(),
            output_format: self.output_format,
        }
    }

    /// Builds the layered figment: defaults, config file, environment, flags.
    pub fn figment(&self) -> Result<Figment, AppError> {
        let mut figment = Figment::from(Serialized::defaults(GenerationSettings::default()));
        if let Some(path) = &self.config {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(self.overrides())))
    }

    /// Resolves the effective generation settings.
    pub fn settings(&self) -> Result<GenerationSettings, AppError> {
        let settings: GenerationSettings = self.figment()?.extract().map_err(Box::new)?;
        log::debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }
}

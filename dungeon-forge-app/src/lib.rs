//! Dungeon Forge Application Library
//!
//! Configuration, logging, output and batch tooling around the
//! `dungeon-core` generators.

pub mod benchmark;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod setup;
pub mod visualization;

pub use config::AppConfig;
pub use error::AppError;

use clap::Parser;

/// Parses the command line, sets up logging and runs the requested mode.
pub fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    logging::init_logger(&config);

    log::info!("Dungeon Forge starting");
    log::debug!("Loaded Config: {:?}", config);

    setup::execution::run(&config)?;

    log::info!("Dungeon Forge finished");
    Ok(())
}

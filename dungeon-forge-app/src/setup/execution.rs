//! Handles the core execution logic for standard and batch modes.

use crate::{
    benchmark,
    config::{AppConfig, GenerationSettings, VisualizationMode},
    output,
    progress::{ConsoleProgressReporter, ProgressReporter},
    setup::{self, GeneratedDungeon},
    visualization::{TerminalVisualizer, Visualizer},
};
use anyhow::{Context, Result};
use dungeon_rules::AdjacencyRules;
use log::{error, info, warn};
use std::sync::{Arc, Mutex};

/// Resolves settings and dispatches to the standard or batch mode.
pub fn run(config: &AppConfig) -> Result<()> {
    let settings = config.settings()?;
    let rules = setup::load_rules(&settings)?;
    let seed = settings.seed.unwrap_or_else(|| {
        let seed = setup::clock_seed();
        info!("No seed configured, using {}", seed);
        seed
    });

    match config.batch_runs {
        Some(runs) => run_batch_mode(config, &settings, &rules, seed, runs),
        None => run_standard_mode(config, &settings, &rules, seed).map(|_| ()),
    }
}

/// Generates one dungeon, writes it out and optionally draws it.
pub fn run_standard_mode(
    config: &AppConfig,
    settings: &GenerationSettings,
    rules: &AdjacencyRules,
    seed: i64,
) -> Result<GeneratedDungeon> {
    info!(
        "Generating {:?} dungeon {}x{} with seed {}",
        settings.generator, settings.width, settings.height, seed
    );

    let reporter = config.report_progress_interval.map(|interval| {
        Arc::new(Mutex::new(ConsoleProgressReporter::new(
            interval,
            config.progress_log_level,
        )))
    });
    let callback = reporter
        .as_ref()
        .map(|reporter| ConsoleProgressReporter::into_callback(Arc::clone(reporter)));

    let result = setup::generate(settings, rules, seed, callback);
    if let Some(Ok(mut reporter)) = reporter.as_ref().map(|r| r.lock()) {
        match &result {
            Ok(_) => reporter.finish(),
            Err(e) => reporter.fail(e),
        }
    }
    let dungeon = result.context("Dungeon generation failed")?;
    info!("{}", output::summary(&dungeon));

    output::write_dungeon(
        &dungeon,
        settings.output_format,
        config.output_path.as_deref(),
    )?;

    if config.visualization_mode == VisualizationMode::Terminal {
        TerminalVisualizer::stdout().display(&dungeon)?;
    }

    Ok(dungeon)
}

/// Generates `runs` dungeons from consecutive seeds and reports timings.
pub fn run_batch_mode(
    config: &AppConfig,
    settings: &GenerationSettings,
    rules: &AdjacencyRules,
    seed: i64,
    runs: usize,
) -> Result<()> {
    if runs == 0 {
        warn!("Batch mode requested with zero runs, nothing to do");
        return Ok(());
    }
    if config.output_path.is_some() || config.visualization_mode != VisualizationMode::None {
        warn!("Output path and visualization are ignored in batch mode");
    }

    info!("Running batch of {} layouts from seed {}", runs, seed);
    let results = benchmark::run_batch(settings, rules, seed, runs);
    for (run, result) in results.iter().enumerate() {
        if let Err(e) = result {
            error!("Run {} failed: {}", run, e);
        }
    }

    let summary = benchmark::summarize(&results);
    benchmark::report_summary(settings, &summary);

    if let Some(csv_path) = &config.batch_csv_output {
        info!("Writing batch results to {}", csv_path.display());
        let records: Vec<_> = results.into_iter().filter_map(Result::ok).collect();
        benchmark::write_records_to_csv(&records, csv_path)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
        info!("Batch results successfully written to {}", csv_path.display());
    }

    if summary.successful_runs == 0 {
        anyhow::bail!("All {} batch runs failed", summary.runs);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn standard_mode_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let config = AppConfig::try_parse_from([
            "dungeon-forge",
            "--output-format",
            "json",
            "--output-path",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let settings = GenerationSettings {
            width: 20,
            height: 20,
            output_format: crate::config::OutputFormat::Json,
            ..GenerationSettings::default()
        };

        let dungeon =
            run_standard_mode(&config, &settings, &AdjacencyRules::dungeon(), 11).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["generator"], "wfc");
        assert_eq!(written["seed"], 11);
        assert_eq!(serde_json::to_value(&dungeon).unwrap(), written);
    }

    #[test]
    fn batch_mode_with_zero_runs_is_a_no_op() {
        let config = AppConfig::try_parse_from(["dungeon-forge"]).unwrap();
        let settings = GenerationSettings::default();
        run_batch_mode(&config, &settings, &AdjacencyRules::dungeon(), 0, 0).unwrap();
    }
}

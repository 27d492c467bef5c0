//! Batch re-rolls: many layouts from consecutive seeds, generated in
//! parallel, with per-run metrics and timing statistics.

use crate::config::{GenerationSettings, GeneratorKind};
use crate::error::AppError;
use crate::setup::{self, GeneratedDungeon};
use dungeon_core::GenerationError;
use dungeon_rules::AdjacencyRules;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

/// Metrics for one generated layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    pub run: usize,
    pub seed: i64,
    pub generator: GeneratorKind,
    pub width: usize,
    pub height: usize,
    pub elapsed_ms: f64,
    pub floor_ratio: f64,
    pub rooms: Option<usize>,
    pub decorations: Option<usize>,
    pub walkable: Option<usize>,
    pub portals: Option<usize>,
    pub iterations: Option<u64>,
    pub contradictions: Option<usize>,
}

impl BatchRecord {
    fn from_dungeon(run: usize, seed: i64, elapsed_ms: f64, dungeon: &GeneratedDungeon) -> Self {
        let mut record = Self {
            run,
            seed,
            generator: dungeon.kind(),
            width: 0,
            height: 0,
            elapsed_ms,
            floor_ratio: dungeon.floor_ratio(),
            rooms: None,
            decorations: None,
            walkable: None,
            portals: None,
            iterations: None,
            contradictions: None,
        };
        match dungeon {
            GeneratedDungeon::Rooms(d) => {
                record.width = d.width;
                record.height = d.height;
                record.rooms = Some(d.rooms.len());
                record.decorations = Some(d.decorations.len());
            }
            GeneratedDungeon::Wfc(d) => {
                record.width = d.width;
                record.height = d.height;
                record.walkable = Some(d.walkable_count);
                record.portals = Some(d.portal_positions.len());
                record.iterations = Some(d.stats.iterations);
                record.contradictions = Some(d.stats.contradictions);
            }
        }
        record
    }
}

/// Timing statistics over a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub runs: usize,
    pub successful_runs: usize,
    pub failed_runs: usize,
    pub avg_time_ms: Option<f64>,
    pub median_time_ms: Option<f64>,
    pub stddev_time_ms: Option<f64>,
}

/// Generates `runs` layouts for seeds `base_seed, base_seed + 1, ...` in
/// parallel. Results come back in run order.
pub fn run_batch(
    settings: &GenerationSettings,
    rules: &AdjacencyRules,
    base_seed: i64,
    runs: usize,
) -> Vec<Result<BatchRecord, GenerationError>> {
    (0..runs)
        .into_par_iter()
        .map(|run| {
            let seed = base_seed.wrapping_add(i64::try_from(run).unwrap_or(i64::MAX));
            let start = Instant::now();
            let dungeon = setup::generate(settings, rules, seed, None)?;
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            Ok(BatchRecord::from_dungeon(run, seed, elapsed_ms, &dungeon))
        })
        .collect()
}

pub fn summarize(results: &[Result<BatchRecord, GenerationError>]) -> BatchSummary {
    let times: Vec<f64> = results
        .iter()
        .filter_map(|result| result.as_ref().ok())
        .map(|record| record.elapsed_ms)
        .collect();
    let avg_time_ms = if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<f64>() / times.len() as f64)
    };
    let mut sorted = times.clone();

    BatchSummary {
        runs: results.len(),
        successful_runs: times.len(),
        failed_runs: results.len() - times.len(),
        avg_time_ms,
        median_time_ms: calculate_median(&mut sorted),
        stddev_time_ms: avg_time_ms.and_then(|avg| calculate_std_dev(&times, avg)),
    }
}

fn calculate_median(data: &mut [f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.sort_unstable_by(f64::total_cmp);
    let mid = data.len() / 2;
    if data.len() % 2 == 0 {
        Some((data[mid - 1] + data[mid]) / 2.0)
    } else {
        Some(data[mid])
    }
}

/// Sample standard deviation; needs at least two values.
fn calculate_std_dev(data: &[f64], mean: f64) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let variance = data
        .iter()
        .map(|value| {
            let diff = mean - value;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Writes one CSV row per successful run.
pub fn write_records_to_csv(records: &[BatchRecord], path: &Path) -> Result<(), AppError> {
    let file = File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn report_summary(settings: &GenerationSettings, summary: &BatchSummary) {
    let fmt = |value: Option<f64>| value.map_or_else(|| "N/A".to_string(), |t| format!("{t:.3}"));
    log::info!(
        "Batch of {} {:?} runs at {}x{}: {} ok, {} failed | avg {} ms | median {} ms | std dev {} ms",
        summary.runs,
        settings.generator,
        settings.width,
        settings.height,
        summary.successful_runs,
        summary.failed_runs,
        fmt(summary.avg_time_ms),
        fmt(summary.median_time_ms),
        fmt(summary.stddev_time_ms)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_and_std_dev() {
        assert_eq!(calculate_median(&mut []), None);
        assert_eq!(calculate_median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(calculate_median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));

        assert_eq!(calculate_std_dev(&[1.0], 1.0), None);
        let sd = calculate_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 5.0).unwrap();
        assert!((sd - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn batch_runs_consecutive_seeds_in_order() {
        let settings = GenerationSettings {
            width: 16,
            height: 16,
            ..GenerationSettings::default()
        };
        let results = run_batch(&settings, &AdjacencyRules::dungeon(), 100, 6);
        assert_eq!(results.len(), 6);
        for (run, result) in results.iter().enumerate() {
            let record = result.as_ref().unwrap();
            assert_eq!(record.run, run);
            assert_eq!(record.seed, 100 + run as i64);
            assert!(record.iterations.is_some());
            assert!(record.rooms.is_none());
        }

        let summary = summarize(&results);
        assert_eq!(summary.successful_runs, 6);
        assert_eq!(summary.failed_runs, 0);
        assert!(summary.median_time_ms.is_some());
    }

    #[test]
    fn failed_runs_are_counted() {
        let settings = GenerationSettings {
            generator: GeneratorKind::Rooms,
            complexity: 0.0,
            ..GenerationSettings::default()
        };
        let results = run_batch(&settings, &AdjacencyRules::dungeon(), 0, 3);
        let summary = summarize(&results);
        assert_eq!(summary.failed_runs, 3);
        assert_eq!(summary.avg_time_ms, None);
    }

    #[test]
    fn csv_has_header_and_rows() {
        let settings = GenerationSettings {
            generator: GeneratorKind::Rooms,
            width: 20,
            height: 20,
            ..GenerationSettings::default()
        };
        let records: Vec<BatchRecord> = run_batch(&settings, &AdjacencyRules::dungeon(), 1, 4)
            .into_iter()
            .map(Result::unwrap)
            .collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.csv");
        write_records_to_csv(&records, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("run,seed,generator,width,height,elapsed_ms"));
        assert_eq!(lines.count(), 4);
    }
}

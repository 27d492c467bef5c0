// dungeon-forge-app/src/progress.rs

use crate::config::ProgressLogLevel;
use dungeon_core::runner::ProgressCallback;
use dungeon_core::{GenerationError, ProgressInfo};
use log::Level;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Trait for reporting the progress of the WFC solver.
pub trait ProgressReporter: Send {
    /// Called after every collapse with updated progress information.
    fn report(&mut self, info: &ProgressInfo);

    /// Called when generation completes successfully.
    fn finish(&mut self);

    /// Called when generation fails with an error.
    fn fail(&mut self, error: &GenerationError);
}

/// A `ProgressReporter` that logs throttled status lines.
pub struct ConsoleProgressReporter {
    start_time: Instant,
    last_report_time: Option<Instant>,
    report_interval: Duration,
    level: Level,
    reports: usize,
}

impl ConsoleProgressReporter {
    /// Creates a reporter that logs at most once per `report_interval`.
    pub fn new(report_interval: Duration, level: ProgressLogLevel) -> Self {
        Self {
            start_time: Instant::now(),
            last_report_time: None,
            report_interval,
            level: match level {
                ProgressLogLevel::Trace => Level::Trace,
                ProgressLogLevel::Debug => Level::Debug,
                ProgressLogLevel::Info => Level::Info,
                ProgressLogLevel::Warn => Level::Warn,
            },
            reports: 0,
        }
    }

    /// Number of status lines emitted so far.
    pub const fn reports(&self) -> usize {
        self.reports
    }

    fn format_duration(duration: Duration) -> String {
        format!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
    }

    /// Wraps the reporter into a callback the solver can call.
    pub fn into_callback(reporter: Arc<Mutex<Self>>) -> ProgressCallback {
        Box::new(move |info: &ProgressInfo| {
            if let Ok(mut reporter) = reporter.lock() {
                reporter.report(info);
            }
        })
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&mut self, info: &ProgressInfo) {
        let now = Instant::now();
        let due = self
            .last_report_time
            .map_or(true, |last| now.duration_since(last) >= self.report_interval);
        if !due {
            return;
        }

        let percentage = info.percentage();
        let eta = if info.collapsed_cells > 0 && percentage < 100.0 {
            let per_cell = info.elapsed_time.as_secs_f64() / info.collapsed_cells as f64;
            let remaining = info.total_cells.saturating_sub(info.collapsed_cells);
            format!(
                " | ETA: {}",
                Self::format_duration(Duration::from_secs_f64(per_cell * remaining as f64))
            )
        } else {
            String::new()
        };

        log::log!(
            self.level,
            "Progress: Iter: {} | Collapsed: {}/{} ({:.1}%) | Elapsed: {}{}",
            info.iterations,
            info.collapsed_cells,
            info.total_cells,
            percentage,
            Self::format_duration(self.start_time.elapsed()),
            eta
        );
        self.last_report_time = Some(now);
        self.reports += 1;
    }

    fn finish(&mut self) {
        log::log!(
            self.level,
            "Generation finished. Total time: {}",
            Self::format_duration(self.start_time.elapsed())
        );
    }

    fn fail(&mut self, error: &GenerationError) {
        log::error!(
            "Generation failed: {}. Total time: {}",
            error,
            Self::format_duration(self.start_time.elapsed())
        );
    }
}

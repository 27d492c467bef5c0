use crate::{
    entropy::EntropyCalculator, grid::PossibilityGrid, propagator::ConstraintPropagator,
    rng::SeededRandom, GenerationError, ProgressInfo,
};
use dungeon_rules::{AdjacencyRules, Tile};
use log::{debug, warn};
use std::time::Instant;

/// Alias for the progress callback function type.
pub type ProgressCallback = Box<dyn Fn(&ProgressInfo) + Send + Sync>;

/// Configuration options for the WFC runner.
#[derive(Default)]
pub struct WfcConfig {
    /// Iteration cap. `None` means twice the cell count.
    pub max_iterations: Option<u64>,
    pub progress_callback: Option<ProgressCallback>,
}

impl WfcConfig {
    /// Creates a new builder for `WfcConfig`.
    pub fn builder() -> WfcConfigBuilder {
        WfcConfigBuilder::default()
    }

    /// The cap that applies to a grid of `total_cells` cells.
    pub fn iteration_cap(&self, total_cells: usize) -> u64 {
        self.max_iterations
            .unwrap_or_else(|| {
                u64::try_from(total_cells).map_or(u64::MAX, |cells| cells.saturating_mul(2))
            })
    }
}

impl std::fmt::Debug for WfcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WfcConfig")
            .field("max_iterations", &self.max_iterations)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

/// Builder for `WfcConfig`.
#[derive(Default)]
pub struct WfcConfigBuilder {
    max_iterations: Option<u64>,
    progress_callback: Option<ProgressCallback>,
}

impl WfcConfigBuilder {
    /// Sets the maximum number of iterations allowed.
    pub const fn max_iterations(mut self, max: u64) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Sets the progress callback function.
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn build(self) -> WfcConfig {
        WfcConfig {
            max_iterations: self.max_iterations,
            progress_callback: self.progress_callback,
        }
    }
}

/// Outcome of a solver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunStats {
    pub iterations: u64,
    pub collapsed_cells: usize,
    /// Option sets that emptied during propagation and fell back to `Empty`.
    pub contradictions: usize,
    /// `true` when the cap stopped the loop with cells still uncollapsed.
    pub hit_iteration_cap: bool,
}

/// Runs the collapse loop until every cell is decided or the cap is reached.
///
/// Each iteration asks `entropy_calculator` for the least constrained
/// cells, picks one at random, collapses it to one of its remaining options
/// (also at random) and lets `propagator` narrow the rest of the grid. The
/// random draws come only from `rng`, so equal seeds replay equal runs.
///
/// Reaching the cap is not an error: the grid is returned as it stands and
/// [`RunStats::hit_iteration_cap`] is set.
///
/// # Errors
///
/// Only propagation errors are surfaced, and the runner never produces the
/// conditions that trigger them.
pub fn run(
    grid: &mut PossibilityGrid,
    rules: &AdjacencyRules,
    propagator: &mut dyn ConstraintPropagator,
    entropy_calculator: &dyn EntropyCalculator,
    rng: &mut SeededRandom,
    config: &WfcConfig,
) -> Result<RunStats, GenerationError> {
    let start_time = Instant::now();
    let total_cells = grid.len();
    let max_iterations = config.iteration_cap(total_cells);
    let mut stats = RunStats::default();
    let mut finished = false;

    debug!(
        "Starting WFC run on {}x{} grid, iteration cap {}",
        grid.width, grid.height, max_iterations
    );

    while stats.iterations < max_iterations {
        let candidates = entropy_calculator.lowest_entropy_cells(grid);
        if candidates.is_empty() {
            finished = true;
            break;
        }
        let point = candidates[rng.next_index(candidates.len())];

        let Some(cell) = grid.get_mut(point.x, point.y) else {
            break;
        };
        let options: Vec<Tile> = cell.option_tiles().collect();
        let tile = options[rng.next_index(options.len())];
        cell.collapse(tile);

        let propagation = propagator.propagate(grid, vec![point], rules)?;
        stats.contradictions += propagation.contradictions.len();
        stats.iterations += 1;
        stats.collapsed_cells += 1;

        if let Some(callback) = &config.progress_callback {
            callback(&ProgressInfo {
                collapsed_cells: stats.collapsed_cells,
                total_cells,
                elapsed_time: start_time.elapsed(),
                iterations: stats.iterations,
            });
        }
    }

    if !finished && !entropy_calculator.lowest_entropy_cells(grid).is_empty() {
        stats.hit_iteration_cap = true;
        warn!(
            "WFC gave up after {} iterations with {} of {} cells collapsed",
            stats.iterations, stats.collapsed_cells, total_cells
        );
    }

    debug!(
        "WFC run finished: {} iterations, {} contradictions, {:?}",
        stats.iterations,
        stats.contradictions,
        start_time.elapsed()
    );
    Ok(stats)
}

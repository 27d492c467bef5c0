//! Wave Function Collapse dungeon generator.

use crate::{
    entropy::CpuEntropyCalculator,
    grid::{cell_count, GridPoint, PossibilityGrid, TileGrid},
    layout::{self, PortalPlacement},
    propagator::CpuConstraintPropagator,
    rng::SeededRandom,
    runner::{self, ProgressCallback, RunStats, WfcConfig},
    GenerationError,
};
use dungeon_rules::{AdjacencyRules, Tile};
use log::debug;

/// Tuning for [`WfcGenerator`].
#[derive(Debug, Clone)]
pub struct WfcOptions {
    pub rules: AdjacencyRules,
    pub portals: PortalPlacement,
    /// Border excluded when looking for spawn and portal cells.
    pub spawn_margin: usize,
    /// Overrides the default cap of twice the cell count.
    pub max_iterations: Option<u64>,
}

impl Default for WfcOptions {
    fn default() -> Self {
        Self {
            rules: AdjacencyRules::dungeon(),
            portals: PortalPlacement::default(),
            spawn_margin: 5,
            max_iterations: None,
        }
    }
}

/// Output of the WFC generator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WfcDungeon {
    pub width: usize,
    pub height: usize,
    pub seed: i64,
    pub grid: TileGrid,
    pub spawn_point: GridPoint,
    pub portal_positions: Vec<GridPoint>,
    /// Walkable cells inside the spawn margin.
    pub walkable_count: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub stats: RunStats,
}

impl WfcDungeon {
    pub fn tile(&self, point: GridPoint) -> Option<Tile> {
        self.grid.get(point.x, point.y).copied()
    }

    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y).is_some_and(|tile| tile.is_walkable())
    }
}

#[derive(Default)]
pub struct WfcGenerator {
    options: WfcOptions,
    progress_callback: Option<ProgressCallback>,
}

impl WfcGenerator {
    pub const fn new(options: WfcOptions) -> Self {
        Self {
            options,
            progress_callback: None,
        }
    }

    /// Reports solver progress after every collapse.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub const fn options(&self) -> &WfcOptions {
        &self.options
    }

    /// Generates a dungeon. Equal arguments always give equal dungeons.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidDimensions`] for a zero-sized grid
    /// or one whose cell count overflows `usize`.
    pub fn generate(
        &mut self,
        width: usize,
        height: usize,
        seed: i64,
    ) -> Result<WfcDungeon, GenerationError> {
        if cell_count(width, height).is_none() {
            return Err(GenerationError::InvalidDimensions { width, height });
        }

        let mut rng = SeededRandom::new(seed);
        let mut grid = PossibilityGrid::new(width, height);
        let config = WfcConfig {
            max_iterations: self.options.max_iterations,
            progress_callback: self.progress_callback.take(),
        };

        let stats = runner::run(
            &mut grid,
            &self.options.rules,
            &mut CpuConstraintPropagator::new(),
            &CpuEntropyCalculator::new(),
            &mut rng,
            &config,
        );
        self.progress_callback = config.progress_callback;
        let stats = stats?;

        let tiles = layout::fill_walls(&grid);
        let candidates = layout::walkable_cells(&tiles, self.options.spawn_margin);
        let portal_positions = layout::select_portals(&candidates, &mut rng, self.options.portals);
        let spawn_point = layout::select_spawn(&candidates, &mut rng, width, height);

        debug!(
            "WFC dungeon {}x{} seed {}: {} walkable, spawn {:?}, {} portals",
            width,
            height,
            seed,
            candidates.len(),
            spawn_point,
            portal_positions.len()
        );

        Ok(WfcDungeon {
            width,
            height,
            seed,
            grid: tiles,
            spawn_point,
            portal_positions,
            walkable_count: candidates.len(),
            stats,
        })
    }
}

/// Generates a dungeon with the default [`WfcOptions`].
///
/// # Errors
///
/// See [`WfcGenerator::generate`].
pub fn generate_wfc(width: usize, height: usize, seed: i64) -> Result<WfcDungeon, GenerationError> {
    WfcGenerator::default().generate(width, height, seed)
}

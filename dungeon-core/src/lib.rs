//! Core library for procedural dungeon generation.
//!
//! Two independent generators live here:
//!
//! - [`rooms`]: rectangular rooms joined by L-shaped corridors, driven by any
//!   [`rand::Rng`].
//! - [`wfc`]: a Wave Function Collapse solver over the tile alphabet from
//!   `dungeon-rules`, driven by the deterministic [`SeededRandom`] so a seed
//!   always replays the same dungeon.

use std::time::Duration;
use thiserror::Error;

/// Entropy calculation logic and traits.
pub mod entropy;
/// Generic 2D grid and the WFC possibility grid.
pub mod grid;
/// Wall fill, spawn and portal placement for solved grids.
pub mod layout;
/// Constraint propagation logic and traits.
pub mod propagator;
pub mod rng;
pub mod rooms;
/// The WFC collapse loop.
pub mod runner;
pub mod walls;
pub mod wfc;

pub use crate::entropy::{CpuEntropyCalculator, EntropyCalculator};
pub use crate::grid::{Grid, GridPoint, PossibilityGrid, TileGrid, WaveCell};
pub use crate::layout::PortalPlacement;
pub use crate::propagator::{ConstraintPropagator, CpuConstraintPropagator, PropagationError};
pub use crate::rng::SeededRandom;
pub use crate::rooms::{
    generate_rooms, Cell, CellGrid, Decoration, DecorationKind, Room, RoomConfig, RoomDungeon,
    RoomGenerator,
};
pub use crate::runner::{run, ProgressCallback, RunStats, WfcConfig};
pub use crate::walls::{wall_profile, WallKind, WallProfile};
pub use crate::wfc::{generate_wfc, WfcDungeon, WfcGenerator, WfcOptions};

/// Errors that can occur while generating a dungeon.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// A zero side, or a cell count that does not fit in `usize`.
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Room complexity outside `(0, 1]`.
    #[error("Complexity must be in (0, 1], got {0}")]
    InvalidComplexity(f64),
    /// An error occurred during the constraint propagation phase.
    #[error("Propagation error: {0}")]
    Propagation(#[from] PropagationError),
}

/// Information about the current state of the WFC algorithm execution.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// The total number of cells that have been collapsed.
    pub collapsed_cells: usize,
    /// The total number of cells in the grid.
    pub total_cells: usize,
    /// Time elapsed since the WFC run started.
    pub elapsed_time: Duration,
    /// The number of iterations completed so far.
    pub iterations: u64,
}

impl ProgressInfo {
    /// Share of cells collapsed, in percent.
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total_cells == 0 {
            100.0
        } else {
            self.collapsed_cells as f64 / self.total_cells as f64 * 100.0
        }
    }
}

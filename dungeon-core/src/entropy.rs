use crate::grid::{GridPoint, PossibilityGrid};

pub mod cpu;
pub use cpu::CpuEntropyCalculator;

/// Strategy for locating the next cell to collapse.
pub trait EntropyCalculator: std::fmt::Debug {
    /// Returns every uncollapsed cell with a non-empty option set whose
    /// option count equals the grid-wide minimum, in row-major order.
    ///
    /// An empty result means nothing is left to collapse.
    #[must_use]
    fn lowest_entropy_cells(&self, grid: &PossibilityGrid) -> Vec<GridPoint>;
}

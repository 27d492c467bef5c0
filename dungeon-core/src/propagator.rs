//! Constraint propagation logic and traits.
use crate::grid::{GridPoint, PossibilityGrid};
use dungeon_rules::AdjacencyRules;
use std::fmt::Debug;
use thiserror::Error;

pub mod cpu;
pub use cpu::CpuConstraintPropagator;

/// Errors that can occur during the constraint propagation phase of WFC.
///
/// Contradictions are not errors: they are resolved in place by resetting
/// the cell to the fallback tile and reported through [`PropagationStats`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropagationError {
    /// An update coordinate does not lie on the grid.
    #[error("Propagation started from ({0}, {1}), which is outside the grid")]
    OutOfBounds(usize, usize),
}

/// Bookkeeping from one propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Cells popped from the work stack.
    pub visited: usize,
    /// Neighbour option sets that shrank.
    pub narrowed: usize,
    /// Cells whose option set emptied and fell back to `Empty`.
    pub contradictions: Vec<GridPoint>,
}

/// Trait defining the interface for a constraint propagation algorithm.
///
/// Implementors update the `PossibilityGrid` after cells change so that no
/// uncollapsed cell keeps an option its neighbours rule out.
pub trait ConstraintPropagator: Debug {
    /// Propagates constraints starting from a list of initially updated cells.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::OutOfBounds`] if a starting coordinate is
    /// not on the grid. The grid is left untouched in that case.
    fn propagate(
        &mut self,
        grid: &mut PossibilityGrid,
        updated_coords: Vec<GridPoint>,
        rules: &AdjacencyRules,
    ) -> Result<PropagationStats, PropagationError>;
}

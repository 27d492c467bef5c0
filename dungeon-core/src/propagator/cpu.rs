use crate::{
    grid::{GridPoint, PossibilityGrid},
    propagator::{ConstraintPropagator, PropagationError, PropagationStats},
};
use bitvec::prelude::*;
use dungeon_rules::{AdjacencyRules, Direction, Tile};
use log::trace;

/// Depth-first propagator driven by an explicit work stack.
#[derive(Debug, Clone, Default)]
pub struct CpuConstraintPropagator;

impl CpuConstraintPropagator {
    pub const fn new() -> Self {
        Self
    }

    /// Tiles allowed on the `direction` side of `tile`, as an option mask.
    fn supported_neighbors(tile: Tile, direction: Direction, rules: &AdjacencyRules) -> BitVec {
        let mut supported = bitvec![0; Tile::COUNT];
        for neighbor in rules.allowed_neighbors(tile, direction) {
            supported.set(neighbor.index(), true);
        }
        supported
    }
}

impl ConstraintPropagator for CpuConstraintPropagator {
    fn propagate(
        &mut self,
        grid: &mut PossibilityGrid,
        updated_coords: Vec<GridPoint>,
        rules: &AdjacencyRules,
    ) -> Result<PropagationStats, PropagationError> {
        if let Some(bad) = updated_coords
            .iter()
            .find(|p| grid.get(p.x, p.y).is_none())
        {
            return Err(PropagationError::OutOfBounds(bad.x, bad.y));
        }

        let mut stats = PropagationStats::default();
        let mut propagation_stack = updated_coords;

        while let Some(point) = propagation_stack.pop() {
            stats.visited += 1;
            // Only collapsed cells constrain their neighbours. Narrowed cells
            // are still pushed but stop here until they collapse.
            let Some(source) = grid.get(point.x, point.y).and_then(|cell| cell.value) else {
                continue;
            };

            for direction in Direction::ALL {
                let Some(target) = grid.offset(point.x, point.y, direction.offset()) else {
                    continue;
                };
                let Some(neighbor) = grid.get_mut(target.x, target.y) else {
                    continue;
                };
                if neighbor.is_collapsed() {
                    continue;
                }
                let before = neighbor.entropy();
                if before == 0 {
                    continue;
                }

                let supported = Self::supported_neighbors(source, direction, rules);
                for index in 0..Tile::COUNT {
                    if neighbor.options[index] && !supported[index] {
                        neighbor.options.set(index, false);
                    }
                }

                let after = neighbor.entropy();
                if after == before {
                    continue;
                }
                stats.narrowed += 1;
                if after == 0 {
                    trace!(
                        "Contradiction at ({}, {}), falling back to Empty",
                        target.x,
                        target.y
                    );
                    neighbor.force_fallback();
                    stats.contradictions.push(target);
                } else {
                    propagation_stack.push(target);
                }
            }
        }

        Ok(stats)
    }
}

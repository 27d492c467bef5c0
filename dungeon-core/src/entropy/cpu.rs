use crate::entropy::EntropyCalculator;
use crate::grid::{GridPoint, PossibilityGrid};

/// Scans the whole grid on every call. Entropy is the plain option count.
#[derive(Debug, Clone, Default)]
pub struct CpuEntropyCalculator;

impl CpuEntropyCalculator {
    pub const fn new() -> Self {
        Self
    }
}

impl EntropyCalculator for CpuEntropyCalculator {
    fn lowest_entropy_cells(&self, grid: &PossibilityGrid) -> Vec<GridPoint> {
        let mut min_entropy = usize::MAX;
        let mut candidates = Vec::new();

        for (point, cell) in grid.iter() {
            if cell.is_collapsed() {
                continue;
            }
            let entropy = cell.entropy();
            if entropy == 0 {
                continue;
            }
            if entropy < min_entropy {
                min_entropy = entropy;
                candidates.clear();
                candidates.push(point);
            } else if entropy == min_entropy {
                candidates.push(point);
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_rules::Tile;

    #[test]
    fn fresh_grid_ties_everywhere() {
        let grid = PossibilityGrid::new(3, 2);
        let cells = CpuEntropyCalculator::new().lowest_entropy_cells(&grid);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], GridPoint::new(0, 0));
        assert_eq!(cells[5], GridPoint::new(2, 1));
    }

    #[test]
    fn picks_most_constrained_and_skips_collapsed() {
        let mut grid = PossibilityGrid::new(3, 1);
        grid.get_mut(0, 0).unwrap().collapse(Tile::Wall);
        let cell = grid.get_mut(2, 0).unwrap();
        cell.options.set(Tile::Wall.index(), false);
        cell.options.set(Tile::Room.index(), false);

        let cells = CpuEntropyCalculator::new().lowest_entropy_cells(&grid);
        assert_eq!(cells, vec![GridPoint::new(2, 0)]);
    }

    #[test]
    fn fully_collapsed_grid_has_no_candidates() {
        let mut grid = PossibilityGrid::new(2, 2);
        for y in 0..2 {
            for x in 0..2 {
                grid.get_mut(x, y).unwrap().collapse(Tile::Empty);
            }
        }
        assert!(CpuEntropyCalculator::new()
            .lowest_entropy_cells(&grid)
            .is_empty());
    }
}

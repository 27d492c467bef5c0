use crate::rooms::CellGrid;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WallKind {
    /// Exposed on two or more sides; rendered taller.
    Corner,
    Regular,
}

/// How a renderer should extrude one wall cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WallProfile {
    pub kind: WallKind,
    /// Height multiplier relative to a standard wall.
    pub height: f32,
}

/// Number of 4-connected floor neighbours. Cells off the grid are not floor.
pub fn floor_neighbors(grid: &CellGrid, x: usize, z: usize) -> usize {
    grid.neighbors4(x, z)
        .filter(|p| grid.get(p.x, p.y).is_some_and(|cell| cell.is_floor()))
        .count()
}

/// Classifies a wall cell and draws its height.
///
/// Walls with at least two floor neighbours are corners, `1.3..1.5` times
/// as tall; the rest are regular walls at `1.0..1.15`.
pub fn wall_profile<R: Rng + ?Sized>(grid: &CellGrid, x: usize, z: usize, rng: &mut R) -> WallProfile {
    if floor_neighbors(grid, x, z) >= 2 {
        WallProfile {
            kind: WallKind::Corner,
            height: rng.gen_range(1.3..1.5),
        }
    } else {
        WallProfile {
            kind: WallKind::Regular,
            height: rng.gen_range(1.0..1.15),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::Cell;
    use crate::rng::SeededRandom;

    #[test]
    fn classifies_by_floor_neighbors() {
        let mut grid = CellGrid::filled(3, 3, Cell::Wall);
        grid.set(1, 0, Cell::Floor);
        grid.set(0, 1, Cell::Floor);
        let mut rng = SeededRandom::new(5);

        let corner = wall_profile(&grid, 0, 0, &mut rng);
        assert_eq!(corner.kind, WallKind::Corner);
        assert!((1.3..1.5).contains(&corner.height));

        let regular = wall_profile(&grid, 2, 2, &mut rng);
        assert_eq!(regular.kind, WallKind::Regular);
        assert!((1.0..1.15).contains(&regular.height));

        assert_eq!(floor_neighbors(&grid, 1, 1), 2);
    }
}

//! Post-processing of a solved WFC grid: wall fill, spawn and portal placement.

use crate::grid::{GridPoint, PossibilityGrid, TileGrid};
use crate::rng::SeededRandom;
use dungeon_rules::Tile;
use log::{debug, warn};

/// A cell the solver never really decided: still uncollapsed, or reset to
/// the fallback tile after a contradiction.
fn is_undetermined(grid: &PossibilityGrid, point: GridPoint) -> bool {
    grid.get(point.x, point.y)
        .is_some_and(|cell| cell.value.is_none() || cell.forced)
}

/// Converts solver cells into final tiles.
///
/// Undetermined cells default to [`Tile::Empty`], except those touching
/// (8-connected) a decided walkable tile, which become [`Tile::Wall`] so
/// that leftover space closes into a boundary around the walkable area.
///
/// Decided tiles, `Empty` included, are copied unchanged. Only cells the
/// solver gave up on (`forced` or still uncollapsed) can turn into walls,
/// so this is the one place the final grid differs from the raw collapse
/// result.
pub fn fill_walls(grid: &PossibilityGrid) -> TileGrid {
    let mut tiles = grid.map(|cell| {
        if cell.forced {
            Tile::Empty
        } else {
            cell.value.unwrap_or(Tile::Empty)
        }
    });
    let mut walled = 0usize;

    for (point, cell) in grid.iter() {
        let decided_walkable = !cell.forced && cell.value.is_some_and(Tile::is_walkable);
        if !decided_walkable {
            continue;
        }
        for neighbor in grid.neighbors8(point.x, point.y) {
            if is_undetermined(grid, neighbor) && tiles.set(neighbor.x, neighbor.y, Tile::Wall) {
                walled += 1;
            }
        }
    }

    debug!("Wall fill closed {walled} neighbour cells");
    tiles
}

/// Walkable cells at least `margin` cells away from every edge, row-major.
pub fn walkable_cells(tiles: &TileGrid, margin: usize) -> Vec<GridPoint> {
    let x_end = tiles.width.saturating_sub(margin);
    let y_end = tiles.height.saturating_sub(margin);
    let mut cells = Vec::new();
    for y in margin..y_end {
        for x in margin..x_end {
            if tiles.get(x, y).is_some_and(|tile| tile.is_walkable()) {
                cells.push(GridPoint::new(x, y));
            }
        }
    }
    cells
}

/// Knobs for [`select_portals`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalPlacement {
    pub count: usize,
    /// Target separation; a sampled candidate is accepted when it is at
    /// least half this far from every chosen portal.
    pub min_distance: f64,
    /// Candidates sampled per portal after the first.
    pub samples: usize,
}

impl Default for PortalPlacement {
    fn default() -> Self {
        Self {
            count: 4,
            min_distance: 15.0,
            samples: 20,
        }
    }
}

/// Greedily spreads `placement.count` portals over `candidates`.
///
/// The first portal is random. Each further portal is the best of
/// `placement.samples` random candidates by distance to its nearest chosen
/// portal; when even the best one is closer than half the target
/// separation, any random candidate is taken instead.
///
/// With fewer candidates than portals the leading candidates are returned
/// as they are.
pub fn select_portals(
    candidates: &[GridPoint],
    rng: &mut SeededRandom,
    placement: PortalPlacement,
) -> Vec<GridPoint> {
    if candidates.len() < placement.count {
        warn!(
            "Only {} walkable cells for {} portals",
            candidates.len(),
            placement.count
        );
        return candidates.to_vec();
    }
    let mut portals = Vec::with_capacity(placement.count);
    if placement.count == 0 {
        return portals;
    }

    if let Some(&first) = rng.choose(candidates) {
        portals.push(first);
    }

    while portals.len() < placement.count {
        let mut best_point = None;
        let mut best_min_dist = 0.0;

        for _ in 0..placement.samples {
            let Some(&candidate) = rng.choose(candidates) else {
                break;
            };
            let min_dist = portals
                .iter()
                .map(|portal| candidate.distance(*portal))
                .fold(f64::INFINITY, f64::min);
            if min_dist > best_min_dist {
                best_min_dist = min_dist;
                best_point = Some(candidate);
            }
        }

        match best_point {
            Some(point) if best_min_dist >= placement.min_distance / 2.0 => portals.push(point),
            _ => {
                if let Some(&fallback) = rng.choose(candidates) {
                    portals.push(fallback);
                }
            }
        }
    }

    portals
}

/// Picks the spawn point among `candidates`, or the grid centre if there
/// are none.
pub fn select_spawn(
    candidates: &[GridPoint],
    rng: &mut SeededRandom,
    width: usize,
    height: usize,
) -> GridPoint {
    rng.choose(candidates).copied().unwrap_or_else(|| {
        warn!("No walkable spawn candidates, using the grid centre");
        GridPoint::new(width / 2, height / 2)
    })
}

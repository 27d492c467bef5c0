//! Room-and-corridor generator.
//!
//! Rooms are rejection-sampled into an all-wall grid, chained together with
//! L-shaped corridors in placement order, and cross-linked with a few extra
//! corridors so the layout has loops. Decorations are derived afterwards.

use crate::grid::{cell_count, Grid, GridPoint};
use crate::GenerationError;
use log::{debug, warn};
use rand::Rng;

/// Cell of a room-corridor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(into = "u8"))]
#[repr(u8)]
pub enum Cell {
    Floor = 0,
    #[default]
    Wall = 1,
}

impl Cell {
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Floor)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell as Self
    }
}

pub type CellGrid = Grid<Cell>;

/// An accepted room. Immutable once placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub center_x: usize,
    pub center_y: usize,
}

impl Room {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            center_x: x + width / 2,
            center_y: y + height / 2,
        }
    }

    pub const fn center(&self) -> GridPoint {
        GridPoint::new(self.center_x, self.center_y)
    }

    /// Whether the two rooms come within `padding` cells of each other.
    pub const fn overlaps(&self, other: &Self, padding: usize) -> bool {
        !(self.x + self.width + padding < other.x
            || other.x + other.width + padding < self.x
            || self.y + self.height + padding < other.y
            || other.y + other.height + padding < self.y)
    }

    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DecorationKind {
    Torch,
    Pillar,
}

/// A prop position. `z` is the grid row, matching the renderer's ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Decoration {
    pub x: usize,
    pub z: usize,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: DecorationKind,
}

/// Output of the room-corridor generator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoomDungeon {
    pub width: usize,
    pub height: usize,
    pub grid: CellGrid,
    pub rooms: Vec<Room>,
    pub decorations: Vec<Decoration>,
}

impl RoomDungeon {
    pub fn is_floor(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y).is_some_and(|cell| cell.is_floor())
    }

    pub fn floor_count(&self) -> usize {
        self.grid.iter().filter(|(_, cell)| cell.is_floor()).count()
    }
}

/// Tuning for [`RoomGenerator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomConfig {
    /// Smallest room side, inclusive.
    pub min_room_size: usize,
    /// Largest room side, inclusive.
    pub max_room_size: usize,
    /// Minimum gap kept between rooms.
    pub padding: usize,
    /// Placement attempts allowed per wanted room.
    pub attempts_per_room: usize,
    /// Grid area per wanted room at complexity 1.0.
    pub area_per_room: f64,
    /// Rooms at least this size on both sides get a centre pillar.
    pub pillar_min_size: usize,
    /// One extra corridor per this many rooms.
    pub extra_corridor_divisor: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_room_size: 4,
            max_room_size: 9,
            padding: 2,
            attempts_per_room: 3,
            area_per_room: 50.0,
            pillar_min_size: 6,
            extra_corridor_divisor: 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoomGenerator {
    config: RoomConfig,
}

impl RoomGenerator {
    pub const fn new(config: RoomConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Number of rooms the generator aims for on a grid of this size.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn target_room_count(&self, width: usize, height: usize, complexity: f64) -> usize {
        (width as f64 * height as f64 * complexity / self.config.area_per_room).floor() as usize
    }

    /// Generates a dungeon.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidDimensions`] for a zero-sized grid
    /// or one whose cell count overflows `usize`,
    /// and [`GenerationError::InvalidComplexity`] unless `complexity` is in
    /// `(0, 1]`. Every other outcome, including a grid with no rooms, is a
    /// valid dungeon.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        complexity: f64,
        rng: &mut R,
    ) -> Result<RoomDungeon, GenerationError> {
        if cell_count(width, height).is_none() {
            return Err(GenerationError::InvalidDimensions { width, height });
        }
        if !complexity.is_finite() || complexity <= 0.0 || complexity > 1.0 {
            return Err(GenerationError::InvalidComplexity(complexity));
        }

        let mut grid = CellGrid::filled(width, height, Cell::Wall);
        let target = self.target_room_count(width, height, complexity);
        let rooms = self.place_rooms(&mut grid, target, rng);

        if rooms.is_empty() {
            warn!("No rooms placed on {width}x{height} grid (target {target})");
        } else {
            debug!("Placed {} of {} rooms", rooms.len(), target);
        }

        self.connect_rooms(&mut grid, &rooms, rng);
        let decorations = self.decorate(&grid, &rooms);

        Ok(RoomDungeon {
            width,
            height,
            grid,
            rooms,
            decorations,
        })
    }

    fn place_rooms<R: Rng + ?Sized>(
        &self,
        grid: &mut CellGrid,
        target: usize,
        rng: &mut R,
    ) -> Vec<Room> {
        let config = &self.config;
        let max_attempts = target.saturating_mul(config.attempts_per_room);
        let mut rooms: Vec<Room> = Vec::with_capacity(target);
        let mut attempts = 0;

        while rooms.len() < target && attempts < max_attempts {
            attempts += 1;

            let room_w = rng.gen_range(config.min_room_size..=config.max_room_size);
            let room_h = rng.gen_range(config.min_room_size..=config.max_room_size);
            // Origins keep a one-cell wall border on every side.
            let (Some(max_x), Some(max_y)) = (
                grid.width.checked_sub(room_w + 2),
                grid.height.checked_sub(room_h + 2),
            ) else {
                continue;
            };
            if max_x < 1 || max_y < 1 {
                continue;
            }
            let room_x = rng.gen_range(1..=max_x);
            let room_y = rng.gen_range(1..=max_y);

            let candidate = Room::new(room_x, room_y, room_w, room_h);
            if rooms
                .iter()
                .any(|room| room.overlaps(&candidate, config.padding))
            {
                continue;
            }

            carve_room(grid, &candidate);
            rooms.push(candidate);
        }

        debug!("Room placement used {attempts} of {max_attempts} attempts");
        rooms
    }

    fn connect_rooms<R: Rng + ?Sized>(&self, grid: &mut CellGrid, rooms: &[Room], rng: &mut R) {
        for pair in rooms.windows(2) {
            carve_corridor(grid, pair[0].center(), pair[1].center());
        }

        if rooms.is_empty() {
            return;
        }
        let extra = rooms.len() / self.config.extra_corridor_divisor.max(1);
        for _ in 0..extra {
            let first = rng.gen_range(0..rooms.len());
            let second = rng.gen_range(0..rooms.len());
            if first != second {
                carve_corridor(grid, rooms[first].center(), rooms[second].center());
            }
        }
    }

    fn decorate(&self, grid: &CellGrid, rooms: &[Room]) -> Vec<Decoration> {
        let mut decorations = Vec::new();

        for room in rooms {
            let left = room.x + 1;
            let top = room.y + 1;
            let right = (room.x + room.width).saturating_sub(2);
            let bottom = (room.y + room.height).saturating_sub(2);
            for (x, z) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
                if grid.get(x, z).is_some_and(|cell| cell.is_floor()) {
                    decorations.push(Decoration {
                        x,
                        z,
                        kind: DecorationKind::Torch,
                    });
                }
            }

            if room.width >= self.config.pillar_min_size
                && room.height >= self.config.pillar_min_size
            {
                decorations.push(Decoration {
                    x: room.center_x,
                    z: room.center_y,
                    kind: DecorationKind::Pillar,
                });
            }
        }

        decorations
    }
}

/// Generates a dungeon with the default [`RoomConfig`].
///
/// # Errors
///
/// See [`RoomGenerator::generate`].
pub fn generate_rooms<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    complexity: f64,
    rng: &mut R,
) -> Result<RoomDungeon, GenerationError> {
    RoomGenerator::default().generate(width, height, complexity, rng)
}

fn carve_room(grid: &mut CellGrid, room: &Room) {
    for y in room.y..room.y + room.height {
        for x in room.x..room.x + room.width {
            grid.set(x, y, Cell::Floor);
        }
    }
}

/// Carves an L-shaped corridor: along the row of `from` first, then along
/// the column of `to`. The end cell itself is left as it is.
fn carve_corridor(grid: &mut CellGrid, from: GridPoint, to: GridPoint) {
    let (mut x, mut y) = (from.x, from.y);

    while x != to.x {
        grid.set(x, y, Cell::Floor);
        if x < to.x {
            x += 1;
        } else {
            x -= 1;
        }
    }

    while y != to.y {
        grid.set(x, y, Cell::Floor);
        if y < to.y {
            y += 1;
        } else {
            y -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn overlap_honours_padding() {
        let a = Room::new(1, 1, 4, 4);
        // Right edge of `a` is x = 5; padding 2 reaches x = 7.
        assert!(a.overlaps(&Room::new(7, 1, 4, 4), 2));
        assert!(!a.overlaps(&Room::new(8, 1, 4, 4), 2));
        assert!(!a.overlaps(&Room::new(1, 8, 4, 4), 2));
    }

    #[test]
    fn corridor_carves_horizontal_then_vertical() {
        let mut grid = CellGrid::filled(6, 5, Cell::Wall);
        carve_corridor(&mut grid, GridPoint::new(1, 1), GridPoint::new(4, 3));
        let floor: Vec<(usize, usize)> = grid
            .iter()
            .filter(|(_, c)| c.is_floor())
            .map(|(p, _)| (p.x, p.y))
            .collect();
        assert_eq!(floor, vec![(1, 1), (2, 1), (3, 1), (4, 1), (4, 2)]);
    }

    #[test]
    fn tiny_grid_yields_no_rooms() {
        let dungeon = generate_rooms(5, 5, 1.0, &mut StepRng::new(0, 1)).unwrap();
        assert!(dungeon.rooms.is_empty());
        assert!(dungeon.decorations.is_empty());
        assert_eq!(dungeon.floor_count(), 0);
    }

    #[test]
    fn rejects_bad_input() {
        let mut rng = StepRng::new(0, 1);
        assert!(matches!(
            generate_rooms(0, 10, 0.5, &mut rng),
            Err(GenerationError::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(matches!(
            generate_rooms(usize::MAX, 3, 0.5, &mut rng),
            Err(GenerationError::InvalidDimensions { height: 3, .. })
        ));
        assert!(matches!(
            generate_rooms(10, 10, 0.0, &mut rng),
            Err(GenerationError::InvalidComplexity(_))
        ));
        assert!(matches!(
            generate_rooms(10, 10, f64::NAN, &mut rng),
            Err(GenerationError::InvalidComplexity(_))
        ));
    }

    #[test]
    fn large_rooms_get_a_pillar() {
        let generator = RoomGenerator::new(RoomConfig {
            min_room_size: 6,
            max_room_size: 6,
            ..RoomConfig::default()
        });
        let mut grid = CellGrid::filled(10, 10, Cell::Wall);
        let room = Room::new(2, 2, 6, 6);
        carve_room(&mut grid, &room);

        let decorations = generator.decorate(&grid, &[room]);
        let torches = decorations
            .iter()
            .filter(|d| d.kind == DecorationKind::Torch)
            .count();
        assert_eq!(torches, 4);
        assert!(decorations.contains(&Decoration {
            x: 5,
            z: 5,
            kind: DecorationKind::Pillar
        }));
    }
}

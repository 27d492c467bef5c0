use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single tile of the dungeon alphabet.
///
/// The discriminants are stable and double as the numeric ids handed to
/// rendering code, so they must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
#[repr(u8)]
pub enum Tile {
    /// Open floor. Also the fallback tile for contradictions.
    #[default]
    Empty = 0,
    /// Solid wall.
    Wall = 1,
    CornerNe = 2,
    CornerNw = 3,
    CornerSe = 4,
    CornerSw = 5,
    /// Corridor running east-west.
    CorridorH = 6,
    /// Corridor running north-south.
    CorridorV = 7,
    /// Room floor.
    Room = 8,
    /// Decorative pillar standing inside a room.
    Pillar = 9,
}

impl Tile {
    /// Number of tiles in the alphabet.
    pub const COUNT: usize = 10;

    /// Every tile, in id order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Empty,
        Self::Wall,
        Self::CornerNe,
        Self::CornerNw,
        Self::CornerSe,
        Self::CornerSw,
        Self::CorridorH,
        Self::CorridorV,
        Self::Room,
        Self::Pillar,
    ];

    /// Returns the numeric id of this tile.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Index of this tile in [`Tile::ALL`] and in option bitsets.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks a tile up by its index, returning `None` when out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether an avatar can stand on this tile.
    pub const fn is_walkable(self) -> bool {
        matches!(
            self,
            Self::Empty | Self::Room | Self::CorridorH | Self::CorridorV
        )
    }

    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::CornerNe | Self::CornerNw | Self::CornerSe | Self::CornerSw
        )
    }

    /// Height multiplier a renderer extrudes this tile to.
    pub const fn render_height(self) -> f32 {
        match self {
            Self::Wall => 3.0,
            Self::Pillar => 3.5,
            Self::CornerNe | Self::CornerNw | Self::CornerSe | Self::CornerSw => 4.0,
            _ => 0.1,
        }
    }

    /// Canonical name, as accepted by [`Tile::from_str`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Wall => "Wall",
            Self::CornerNe => "CornerNe",
            Self::CornerNw => "CornerNw",
            Self::CornerSe => "CornerSe",
            Self::CornerSw => "CornerSw",
            Self::CorridorH => "CorridorH",
            Self::CorridorV => "CorridorV",
            Self::Room => "Room",
            Self::Pillar => "Pillar",
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a tile name or id does not match the alphabet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileParseError {
    #[error("Unknown tile name: {0}")]
    UnknownName(String),
    #[error("Tile id {0} is outside the tile alphabet")]
    UnknownId(u8),
}

impl FromStr for Tile {
    type Err = TileParseError;

    /// Parses a tile name case-insensitively, ignoring underscores, so
    /// `CORNER_NE`, `corner_ne` and `CornerNe` all name the same tile.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|tile| tile.name().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| TileParseError::UnknownName(s.to_owned()))
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> Self {
        tile.id()
    }
}

impl TryFrom<u8> for Tile {
    type Error = TileParseError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_index(usize::from(id)).ok_or(TileParseError::UnknownId(id))
    }
}

/// One of the four grid directions. North is towards row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Number of directions rules are defined for.
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [Self::North, Self::East, Self::South, Self::West];

    /// Axis index used in [`AdjacencyRules`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column/row step taken when moving one cell in this direction.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// Allowed neighbours of a single tile, listed per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRule {
    pub north: &'static [Tile],
    pub east: &'static [Tile],
    pub south: &'static [Tile],
    pub west: &'static [Tile],
}

impl TileRule {
    pub const fn toward(&self, direction: Direction) -> &'static [Tile] {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }
}

use Tile::{
    CornerNe, CornerNw, CornerSe, CornerSw, CorridorH, CorridorV, Empty, Pillar, Room, Wall,
};

const OPEN_RULE: TileRule = TileRule {
    north: &[Empty, Room, CorridorV, CorridorH],
    east: &[Empty, Room, CorridorH, CorridorV],
    south: &[Empty, Room, CorridorV, CorridorH],
    west: &[Empty, Room, CorridorH, CorridorV],
};

/// The built-in dungeon compatibility table, indexed by tile id.
///
/// Corridors run straight, walls only meet walls or the corner facing them,
/// and corners have no table of their own so they reuse the open-floor rule.
pub const DUNGEON_RULES: [TileRule; Tile::COUNT] = [
    // Empty
    OPEN_RULE,
    // Wall
    TileRule {
        north: &[Wall, CornerNe, CornerNw],
        east: &[Wall, CornerNe, CornerSe],
        south: &[Wall, CornerSe, CornerSw],
        west: &[Wall, CornerNw, CornerSw],
    },
    // CornerNe
    OPEN_RULE,
    // CornerNw
    OPEN_RULE,
    // CornerSe
    OPEN_RULE,
    // CornerSw
    OPEN_RULE,
    // CorridorH
    TileRule {
        north: &[Wall, Empty],
        east: &[CorridorH, Room, Empty, CornerSe, CornerNe],
        south: &[Wall, Empty],
        west: &[CorridorH, Room, Empty, CornerSw, CornerNw],
    },
    // CorridorV
    TileRule {
        north: &[CorridorV, Room, Empty, CornerNe, CornerNw],
        east: &[Wall, Empty],
        south: &[CorridorV, Room, Empty, CornerSe, CornerSw],
        west: &[Wall, Empty],
    },
    // Room
    TileRule {
        north: &[Room, Empty, CorridorV, Pillar],
        east: &[Room, Empty, CorridorH, Pillar],
        south: &[Room, Empty, CorridorV, Pillar],
        west: &[Room, Empty, CorridorH, Pillar],
    },
    // Pillar
    TileRule {
        north: &[Room, Empty],
        east: &[Room, Empty],
        south: &[Room, Empty],
        west: &[Room, Empty],
    },
];

/// Represents adjacency rules between tiles for the four grid directions.
///
/// Stores the rules in a flattened boolean vector for fast lookup.
/// The indexing scheme assumes `allowed[direction][tile][neighbor]` layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRules {
    num_tiles: usize,
    /// Indexing: `direction * num_tiles * num_tiles + tile * num_tiles + neighbor`
    allowed: Vec<bool>,
}

impl AdjacencyRules {
    /// Creates new `AdjacencyRules` from a pre-flattened `allowed` vector.
    ///
    /// # Panics
    ///
    /// Panics if the length of `allowed` is not `4 * Tile::COUNT * Tile::COUNT`.
    pub fn new(allowed: Vec<bool>) -> Self {
        let num_tiles = Tile::COUNT;
        assert_eq!(
            allowed.len(),
            Direction::COUNT * num_tiles * num_tiles,
            "Provided 'allowed' vector has incorrect size."
        );
        Self { num_tiles, allowed }
    }

    /// Rules with no allowed adjacency at all.
    pub fn empty() -> Self {
        Self::new(vec![false; Direction::COUNT * Tile::COUNT * Tile::COUNT])
    }

    /// Builds rules from a list of `(direction, tile, neighbor)` triples.
    pub fn from_allowed_tuples(tuples: impl IntoIterator<Item = (Direction, Tile, Tile)>) -> Self {
        let mut rules = Self::empty();
        for (direction, tile, neighbor) in tuples {
            rules.allow(tile, neighbor, direction);
        }
        rules
    }

    /// Builds rules from one [`TileRule`] per tile, in id order.
    pub fn from_table(table: &[TileRule; Tile::COUNT]) -> Self {
        let tuples = Tile::ALL.into_iter().zip(table).flat_map(|(tile, rule)| {
            Direction::ALL.into_iter().flat_map(move |direction| {
                rule.toward(direction)
                    .iter()
                    .map(move |&neighbor| (direction, tile, neighbor))
            })
        });
        Self::from_allowed_tuples(tuples)
    }

    /// The built-in dungeon table, see [`DUNGEON_RULES`].
    pub fn dungeon() -> Self {
        Self::from_table(&DUNGEON_RULES)
    }

    /// Gets the number of different tile types these rules apply to.
    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    /// Marks `neighbor` as allowed on the `direction` side of `tile`.
    pub fn allow(&mut self, tile: Tile, neighbor: Tile, direction: Direction) {
        let index = self.index(tile, neighbor, direction);
        self.allowed[index] = true;
    }

    /// Checks if `neighbor` may sit on the `direction` side of `tile`.
    #[inline]
    pub fn check(&self, tile: Tile, neighbor: Tile, direction: Direction) -> bool {
        self.allowed
            .get(self.index(tile, neighbor, direction))
            .copied()
            .unwrap_or(false)
    }

    /// Iterates the tiles allowed on the `direction` side of `tile`, in id order.
    pub fn allowed_neighbors(
        &self,
        tile: Tile,
        direction: Direction,
    ) -> impl Iterator<Item = Tile> + '_ {
        Tile::ALL
            .into_iter()
            .filter(move |&neighbor| self.check(tile, neighbor, direction))
    }

    /// Copies every direction of `source`'s rule onto `target`, replacing it.
    pub fn copy_rule(&mut self, source: Tile, target: Tile) {
        for direction in Direction::ALL {
            for neighbor in Tile::ALL {
                let allowed = self.check(source, neighbor, direction);
                let index = self.index(target, neighbor, direction);
                self.allowed[index] = allowed;
            }
        }
    }

    #[inline]
    fn index(&self, tile: Tile, neighbor: Tile, direction: Direction) -> usize {
        direction.index() * self.num_tiles * self.num_tiles
            + tile.index() * self.num_tiles
            + neighbor.index()
    }
}

impl Default for AdjacencyRules {
    fn default() -> Self {
        Self::dungeon()
    }
}

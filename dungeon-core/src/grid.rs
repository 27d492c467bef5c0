use bitvec::prelude::*;
use dungeon_rules::Tile;

/// A point on a generator grid, `x` being the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GridPoint {
    pub x: usize,
    pub y: usize,
}

impl GridPoint {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

const SURROUNDING: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Number of cells in a `width` x `height` grid, or `None` when a side is
/// zero or the count does not fit in `usize`.
pub const fn cell_count(width: usize, height: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }
    width.checked_mul(height)
}

/// A fixed-size, row-major 2D grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    pub(crate) data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a new grid with every cell set to `value`.
    ///
    /// Callers validate the size with [`cell_count`] first; a size whose
    /// cell count overflows `usize` yields a 0x0 grid.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        match width.checked_mul(height) {
            Some(len) => Self {
                width,
                height,
                data: vec![value; len],
            },
            None => Self {
                width: 0,
                height: 0,
                data: Vec::new(),
            },
        }
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a new grid with the given dimensions, initialized with default values.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T> Grid<T> {
    /// Returns an immutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).and_then(|idx| self.data.get(idx))
    }

    /// Returns a mutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.index(x, y).and_then(move |idx| self.data.get_mut(idx))
    }

    /// Overwrites a cell. Out-of-bounds writes are ignored and return `false`.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        self.get_mut(x, y).map(|cell| *cell = value).is_some()
    }

    /// Like [`Grid::get`] but for signed coordinates, as produced by offsets.
    pub fn get_signed(&self, x: isize, y: isize) -> Option<&T> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.get(x, y)
    }

    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // `chunks` panics on zero, which only an empty grid could hit.
        self.data.chunks(self.width.max(1))
    }

    /// Iterates every cell together with its coordinates, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, &T)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (GridPoint::new(idx % width, idx / width), cell))
    }

    /// Copies the grid into nested rows, `height` rows of `width` values.
    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        self.rows().map(<[T]>::to_vec).collect()
    }

    /// Builds a grid of the same shape by mapping every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// In-bounds 4-connected neighbours of a cell.
    pub fn neighbors4(&self, x: usize, y: usize) -> impl Iterator<Item = GridPoint> + '_ {
        self.offset_points(x, y, &ORTHOGONAL)
    }

    /// In-bounds 8-connected neighbours of a cell.
    pub fn neighbors8(&self, x: usize, y: usize) -> impl Iterator<Item = GridPoint> + '_ {
        self.offset_points(x, y, &SURROUNDING)
    }

    /// Applies `(dx, dy)` to a cell, returning the target if it is in bounds.
    pub fn offset(&self, x: usize, y: usize, (dx, dy): (isize, isize)) -> Option<GridPoint> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then_some(GridPoint::new(nx, ny))
    }

    fn offset_points<'a>(
        &'a self,
        x: usize,
        y: usize,
        offsets: &'static [(isize, isize)],
    ) -> impl Iterator<Item = GridPoint> + 'a {
        offsets
            .iter()
            .filter_map(move |&offset| self.offset(x, y, offset))
    }

    /// Calculates the 1D index for the given coordinates.
    /// Returns None if the coordinates are out of bounds.
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Grid<T> {
    /// Grids serialize as `height` arrays of `width` values.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// Solver-side state of one WFC cell.
///
/// A cell starts with every tile as an option. Collapsing narrows it to a
/// single value; `forced` records that propagation emptied the option set
/// and it was reset to [`Tile::Empty`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveCell {
    pub options: BitVec,
    pub value: Option<Tile>,
    pub forced: bool,
}

impl WaveCell {
    /// An uncollapsed cell allowing every tile.
    pub fn new() -> Self {
        Self {
            options: bitvec![1; Tile::COUNT],
            value: None,
            forced: false,
        }
    }

    pub const fn is_collapsed(&self) -> bool {
        self.value.is_some()
    }

    /// Number of remaining options.
    pub fn entropy(&self) -> usize {
        self.options.count_ones()
    }

    /// Remaining options in tile-id order.
    pub fn option_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.options.iter_ones().filter_map(Tile::from_index)
    }

    pub fn allows(&self, tile: Tile) -> bool {
        self.options.get(tile.index()).is_some_and(|bit| *bit)
    }

    /// Fixes the cell to `tile`.
    pub fn collapse(&mut self, tile: Tile) {
        self.options.fill(false);
        self.options.set(tile.index(), true);
        self.value = Some(tile);
    }

    /// Resets an emptied option set to the fallback tile.
    pub fn force_fallback(&mut self) {
        self.options.fill(false);
        self.options.set(Tile::Empty.index(), true);
        self.forced = true;
    }
}

impl Default for WaveCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Grid of solver cells.
pub type PossibilityGrid = Grid<WaveCell>;

/// Finished WFC grid.
pub type TileGrid = Grid<Tile>;

use crate::error::AppError;
use crate::output::{room_rows, summary, wfc_rows};
use crate::setup::GeneratedDungeon;
use colored::{ColoredString, Colorize};
use dungeon_core::rooms::Cell;
use dungeon_rules::Tile;
use std::io::{self, Write};

/// Trait for types that can present a generated dungeon to the user.
pub trait Visualizer {
    /// Displays the dungeon.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Visualization`] if the target cannot be written.
    fn display(&mut self, dungeon: &GeneratedDungeon) -> Result<(), AppError>;
}

type Rgb = (u8, u8, u8);

const EMPTY: Rgb = (0x0a, 0x0a, 0x0a);
const WALL: Rgb = (0x2a, 0x2a, 0x2a);
const CORNER: Rgb = (0x33, 0x33, 0x33);
const CORRIDOR: Rgb = (0x15, 0x15, 0x15);
const ROOM: Rgb = (0x1a, 0x1a, 0x1a);
const PILLAR: Rgb = (0x3a, 0x3a, 0x3a);

/// Background colour of a tile.
pub const fn tile_color(tile: Tile) -> Rgb {
    match tile {
        Tile::Empty => EMPTY,
        Tile::Wall => WALL,
        Tile::CornerNe | Tile::CornerNw | Tile::CornerSe | Tile::CornerSw => CORNER,
        Tile::CorridorH | Tile::CorridorV => CORRIDOR,
        Tile::Room => ROOM,
        Tile::Pillar => PILLAR,
    }
}

const fn cell_color(cell: Cell) -> Rgb {
    match cell {
        Cell::Floor => ROOM,
        Cell::Wall => WALL,
    }
}

fn paint(glyph: char, background: Rgb) -> ColoredString {
    let (r, g, b) = background;
    let text = glyph.to_string();
    let styled = match glyph {
        'S' => text.bright_green().bold(),
        '1'..='9' | '*' => text.bright_magenta().bold(),
        'T' => text.yellow(),
        _ => text.truecolor(0xb0, 0xb0, 0xb0),
    };
    styled.on_truecolor(r, g, b)
}

/// Renders the dungeon with the tile palette as background colours.
pub struct TerminalVisualizer<W: Write> {
    writer: W,
}

impl TerminalVisualizer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalVisualizer<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_frame(&mut self, dungeon: &GeneratedDungeon) -> io::Result<()> {
        match dungeon {
            GeneratedDungeon::Rooms(d) => {
                for (glyphs, cells) in room_rows(d).iter().zip(d.grid.rows()) {
                    for (&glyph, &cell) in glyphs.iter().zip(cells) {
                        write!(self.writer, "{}", paint(glyph, cell_color(cell)))?;
                    }
                    writeln!(self.writer)?;
                }
            }
            GeneratedDungeon::Wfc(d) => {
                for (glyphs, tiles) in wfc_rows(d).iter().zip(d.grid.rows()) {
                    for (&glyph, &tile) in glyphs.iter().zip(tiles) {
                        write!(self.writer, "{}", paint(glyph, tile_color(tile)))?;
                    }
                    writeln!(self.writer)?;
                }
            }
        }
        writeln!(self.writer, "{}", summary(dungeon).dimmed())?;
        self.writer.flush()
    }
}

impl<W: Write> Visualizer for TerminalVisualizer<W> {
    fn display(&mut self, dungeon: &GeneratedDungeon) -> Result<(), AppError> {
        self.write_frame(dungeon)
            .map_err(|e| AppError::Visualization(format!("Failed to draw dungeon: {e}")))
    }
}

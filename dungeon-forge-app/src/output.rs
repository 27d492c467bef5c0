use crate::config::OutputFormat;
use crate::error::AppError;
use crate::setup::GeneratedDungeon;
use anyhow::{Context, Result};
use dungeon_core::rooms::{DecorationKind, RoomDungeon};
use dungeon_core::wfc::WfcDungeon;
use dungeon_rules::Tile;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Text glyph for a WFC tile.
pub const fn tile_glyph(tile: Tile) -> char {
    match tile {
        Tile::Empty => ' ',
        Tile::Wall => '#',
        Tile::CornerNe | Tile::CornerNw | Tile::CornerSe | Tile::CornerSw => '+',
        Tile::CorridorH => '-',
        Tile::CorridorV => '|',
        Tile::Room => '.',
        Tile::Pillar => 'O',
    }
}

/// Glyph rows of a room dungeon: `#` walls, `.` floor, `T` torches, `P` pillars.
pub fn room_rows(dungeon: &RoomDungeon) -> Vec<Vec<char>> {
    let mut rows: Vec<Vec<char>> = dungeon
        .grid
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| if cell.is_floor() { '.' } else { '#' })
                .collect()
        })
        .collect();
    for decoration in &dungeon.decorations {
        if let Some(glyph) = rows
            .get_mut(decoration.z)
            .and_then(|row| row.get_mut(decoration.x))
        {
            *glyph = match decoration.kind {
                DecorationKind::Torch => 'T',
                DecorationKind::Pillar => 'P',
            };
        }
    }
    rows
}

/// Glyph rows of a WFC dungeon with portals numbered from `1` and the spawn
/// point marked `S`.
pub fn wfc_rows(dungeon: &WfcDungeon) -> Vec<Vec<char>> {
    let mut rows: Vec<Vec<char>> = dungeon
        .grid
        .rows()
        .map(|row| row.iter().copied().map(tile_glyph).collect())
        .collect();
    let mut mark = |x: usize, y: usize, glyph: char| {
        if let Some(cell) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = glyph;
        }
    };
    for (i, portal) in dungeon.portal_positions.iter().enumerate() {
        let glyph = u32::try_from(i + 1)
            .ok()
            .and_then(|n| char::from_digit(n, 10))
            .unwrap_or('*');
        mark(portal.x, portal.y, glyph);
    }
    mark(dungeon.spawn_point.x, dungeon.spawn_point.y, 'S');
    rows
}

/// One-line description of a generated dungeon.
pub fn summary(dungeon: &GeneratedDungeon) -> String {
    match dungeon {
        GeneratedDungeon::Rooms(d) => format!(
            "rooms: {} | decorations: {} | floor: {}/{}",
            d.rooms.len(),
            d.decorations.len(),
            d.floor_count(),
            d.grid.len()
        ),
        GeneratedDungeon::Wfc(d) => format!(
            "seed: {} | walkable: {} | spawn: ({}, {}) | portals: {} | iterations: {}",
            d.seed,
            d.walkable_count,
            d.spawn_point.x,
            d.spawn_point.y,
            d.portal_positions.len(),
            d.stats.iterations
        ),
    }
}

pub fn render_text(dungeon: &GeneratedDungeon) -> String {
    let rows = match dungeon {
        GeneratedDungeon::Rooms(d) => room_rows(d),
        GeneratedDungeon::Wfc(d) => wfc_rows(d),
    };
    let mut text = String::new();
    for row in rows {
        text.extend(row);
        text.push('\n');
    }
    text.push_str(&summary(dungeon));
    text.push('\n');
    text
}

pub fn render_json(dungeon: &GeneratedDungeon) -> Result<String, AppError> {
    let mut json = serde_json::to_string_pretty(dungeon)?;
    json.push('\n');
    Ok(json)
}

/// Writes the dungeon in `format` to `output_path`, or to stdout when no
/// path is given.
pub fn write_dungeon(
    dungeon: &GeneratedDungeon,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(dungeon),
        OutputFormat::Json => render_json(dungeon)?,
    };

    match output_path {
        Some(path) => {
            log::info!("Saving dungeon to {}...", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            writer
                .write_all(rendered.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            writer
                .flush()
                .context("Failed to flush writer for output file")?;
            log::info!("Successfully saved dungeon to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(rendered.as_bytes())
                .context("Failed to write dungeon to stdout")?;
            handle.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_core::rooms::{Cell, CellGrid, Decoration, Room};
    use dungeon_core::{generate_wfc, GridPoint};

    fn small_rooms() -> RoomDungeon {
        let mut grid = CellGrid::filled(4, 3, Cell::Wall);
        grid.set(1, 1, Cell::Floor);
        grid.set(2, 1, Cell::Floor);
        RoomDungeon {
            width: 4,
            height: 3,
            grid,
            rooms: vec![Room::new(1, 1, 2, 1)],
            decorations: vec![Decoration {
                x: 2,
                z: 1,
                kind: DecorationKind::Torch,
            }],
        }
    }

    #[test]
    fn rooms_render_as_text() {
        let text = render_text(&GeneratedDungeon::Rooms(small_rooms()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(&lines[..3], &["####", "#.T#", "####"]);
        assert!(lines[3].starts_with("rooms: 1 | decorations: 1 | floor: 2/12"));
    }

    #[test]
    fn wfc_marks_spawn_and_portals() {
        let mut dungeon = generate_wfc(12, 12, 8).unwrap();
        dungeon.portal_positions = vec![GridPoint::new(0, 0), GridPoint::new(3, 0)];
        dungeon.spawn_point = GridPoint::new(1, 0);
        let rows = wfc_rows(&dungeon);
        assert_eq!(rows.len(), 12);
        assert_eq!(&rows[0][..4], &['1', 'S', rows[0][2], '2']);
    }

    #[test]
    fn json_includes_generator_tag() {
        let json = render_json(&GeneratedDungeon::Rooms(small_rooms())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["generator"], "rooms");
        assert_eq!(value["grid"][1], serde_json::json!([1, 0, 0, 1]));
        assert_eq!(value["rooms"][0]["centerX"], 2);
        assert_eq!(value["decorations"][0]["type"], "torch");
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dungeon.txt");
        write_dungeon(
            &GeneratedDungeon::Rooms(small_rooms()),
            OutputFormat::Text,
            Some(&path),
        )
        .unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("####\n#.T#\n"));
    }
}

//! Grid text reader.
//!
//! One line per row, cells separated by `,`. Each cell holds up to four
//! `\`-separated integers: terrain, decoration, direction code and special
//! flag. Missing or malformed values read as `-1`.

use tracing::warn;
use village_defence_core::{Tile, TileDirection, TileMap, TileMarker};

use crate::LoadError;

const CELL_SEPARATOR: char = ',';
const FIELD_SEPARATOR: char = '\\';
const ABSENT: i32 = -1;

/// Parses grid text into a rectangular tile map.
///
/// The first non-blank row fixes the width; shorter rows are padded with
/// plain tiles and longer rows are truncated.
pub fn parse_tile_map(text: &str) -> Result<TileMap, LoadError> {
    let mut width: Option<usize> = None;
    let mut rows = 0_u32;
    let mut tiles = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut row: Vec<Tile> = line.split(CELL_SEPARATOR).map(parse_tile).collect();
        let expected = *width.get_or_insert(row.len());
        if row.len() != expected {
            warn!(
                line = line_index + 1,
                expected,
                found = row.len(),
                "map row width differs from the first row"
            );
            row.resize(expected, Tile::default());
        }

        tiles.extend(row);
        rows += 1;
    }

    let columns = width
        .and_then(|width| u32::try_from(width).ok())
        .ok_or(LoadError::EmptyGrid)?;
    TileMap::new(columns, rows, tiles).ok_or(LoadError::EmptyGrid)
}

fn parse_tile(cell: &str) -> Tile {
    let mut fields = cell.split(FIELD_SEPARATOR).map(parse_field);
    let mut next = || fields.next().unwrap_or(ABSENT);
    let (terrain, decoration, direction, special) = (next(), next(), next(), next());

    Tile::new(
        u32::try_from(terrain).unwrap_or(0),
        u32::try_from(decoration).ok(),
        TileDirection::from_code(direction.max(0)),
        TileMarker::from_code(special),
    )
}

fn parse_field(field: &str) -> i32 {
    field.trim().parse().unwrap_or(ABSENT)
}

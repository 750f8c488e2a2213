//! Command-line build orders such as `gunner@3,1`.

use std::{error::Error, fmt, str::FromStr};

use village_defence_core::{TileIndex, TowerKind};

/// Delimiter separating the tower kind from its tile.
const KIND_DELIMITER: char = '@';
/// Delimiter separating the tile column from its row.
const TILE_DELIMITER: char = ',';

/// Tower placement requested before the first tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerOrder {
    /// Kind of tower to build.
    pub(crate) kind: TowerKind,
    /// Tile that should hold the tower.
    pub(crate) tile: TileIndex,
}

impl FromStr for TowerOrder {
    type Err = BuildOrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BuildOrderError::Empty);
        }

        let (kind, tile) = trimmed
            .split_once(KIND_DELIMITER)
            .ok_or(BuildOrderError::MissingTile)?;

        Ok(Self {
            kind: parse_kind(kind)?,
            tile: parse_tile(tile)?,
        })
    }
}

/// Resolves a tower kind by its configuration key, ignoring case.
pub(crate) fn parse_kind(value: &str) -> Result<TowerKind, BuildOrderError> {
    let name = value.trim();
    TowerKind::ALL
        .into_iter()
        .find(|kind| kind.config_key().eq_ignore_ascii_case(name))
        .ok_or_else(|| BuildOrderError::UnknownKind(name.to_owned()))
}

/// Errors that can occur while reading build orders.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum BuildOrderError {
    /// The order was empty or contained only whitespace.
    Empty,
    /// The order did not name a tile after the kind.
    MissingTile,
    /// The kind is not one of the buildable towers.
    UnknownKind(String),
    /// The tile could not be read as `COLUMN,ROW`.
    InvalidTile(String),
}

impl fmt::Display for BuildOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "build order was empty"),
            Self::MissingTile => write!(f, "build order must look like KIND@COLUMN,ROW"),
            Self::UnknownKind(kind) => {
                write!(f, "'{kind}' is not a tower kind (archer, axeman, gunner)")
            }
            Self::InvalidTile(tile) => write!(f, "could not parse tile '{tile}'"),
        }
    }
}

impl Error for BuildOrderError {}

fn parse_tile(tile: &str) -> Result<TileIndex, BuildOrderError> {
    let invalid = || BuildOrderError::InvalidTile(tile.to_owned());
    let (column, row) = tile.split_once(TILE_DELIMITER).ok_or_else(invalid)?;

    let column = column.trim().parse::<u32>().map_err(|_| invalid())?;
    let row = row.trim().parse::<u32>().map_err(|_| invalid())?;

    Ok(TileIndex::new(column, row))
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Readers for the map grid, the level document and the tuning document.
//!
//! Structural problems (unreadable files, invalid JSON, a missing root shape
//! or section, an empty grid or wave list) are fatal and reported as
//! [`LoadError`]. Anything finer grained falls back to built-in defaults and
//! is logged at `warn`.

mod config;
mod lenient;
mod level;
mod map;

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use village_defence_core::{GameConfig, TileMap, Wave};

pub use config::parse_config;
pub use level::parse_level;
pub use map::parse_tile_map;

/// Fatal problems encountered while loading startup data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}", .path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The grid text contained no tiles.
    #[error("map contains no tiles")]
    EmptyGrid,
    /// A JSON document could not be parsed.
    #[error("document is not valid JSON")]
    InvalidJson(#[from] serde_json::Error),
    /// The level document root is not an array.
    #[error("level document root must be an array")]
    LevelNotArray,
    /// No wave in the level document has a spawn.
    #[error("level document contains no playable waves")]
    NoWaves,
    /// The tuning document root is not an object.
    #[error("config document root must be an object")]
    ConfigNotObject,
    /// A required tuning section is absent or not an object.
    #[error("config document is missing the `{0}` section")]
    MissingSection(&'static str),
}

/// Everything a match needs before its first tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Assets {
    /// Tile grid with its routes and home.
    pub map: TileMap,
    /// Waves in play order.
    pub waves: Vec<Wave>,
    /// Tuning snapshot.
    pub config: GameConfig,
}

impl Assets {
    /// Loads the three startup files, failing on the first fatal problem.
    pub fn load(map: &Path, level: &Path, config: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            map: load_tile_map(map)?,
            waves: load_level(level)?,
            config: load_config(config)?,
        })
    }
}

/// Reads and parses a grid text file.
pub fn load_tile_map(path: &Path) -> Result<TileMap, LoadError> {
    parse_tile_map(&read(path)?)
}

/// Reads and parses a level document.
pub fn load_level(path: &Path) -> Result<Vec<Wave>, LoadError> {
    parse_level(&read(path)?)
}

/// Reads and parses a tuning document.
pub fn load_config(path: &Path) -> Result<GameConfig, LoadError> {
    parse_config(&read(path)?)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

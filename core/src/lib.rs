#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Village Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Systems read immutable snapshot views and respond
//! exclusively with new command batches.

mod config;
mod timer;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use config::{
    BasicTemplate, EnemyTemplate, GameConfig, PlayerTemplate, SpawnEvent, TowerTemplate, Wave,
};
pub use timer::{duration_from_secs, IntervalTimer};

/// Edge length of a square tile in world units.
pub const TILE_SIZE: f32 = 48.0;

/// Number of per-level entries carried by every tower statistic table.
pub const TOWER_LEVELS: usize = 10;

/// Number of upgrade steps between the first and the last tower level.
pub const UPGRADE_STEPS: usize = TOWER_LEVELS - 1;

/// Highest level a tower kind can reach.
pub const MAX_TOWER_LEVEL: u8 = 9;

/// Hit points the home starts each match with.
pub const INITIAL_HOME_HP: f32 = 10.0;

/// Coin balance at the start of each match.
pub const INITIAL_COINS: f64 = 100.0;

/// Coins credited when the player collects a coin pickup.
pub const COIN_PICKUP_VALUE: f64 = 15.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests a new enemy at the start of a spawn point's route.
    SpawnEnemy {
        /// Kind of enemy to create.
        kind: EnemyKind,
        /// Spawn point whose route the enemy follows.
        spawn_point: SpawnPointId,
    },
    /// Requests placement of a tower on a buildable tile.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Tile that will hold the tower.
        tile: TileIndex,
    },
    /// Raises the level shared by every tower of a kind.
    UpgradeTower {
        /// Tower kind to upgrade.
        kind: TowerKind,
    },
    /// Requests that a ready tower shoot at an enemy.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy the projectile is aimed at.
        target: EnemyId,
    },
    /// Adds coins to the ledger.
    CreditCoins {
        /// Amount to add.
        amount: f64,
    },
    /// Removes coins from the ledger, clamping the balance at zero.
    DebitCoins {
        /// Amount to remove.
        amount: f64,
    },
    /// Ends the match in the player's favour.
    DeclareVictory,
    /// Presses or releases one of the player's movement inputs.
    SetPlayerMovement {
        /// Direction of the input.
        direction: Facing,
        /// Whether the input is held.
        active: bool,
    },
    /// Triggers the player's flash attack.
    ReleaseFlash,
    /// Triggers the player's impact skill.
    ReleaseImpact,
    /// Advances enemies and resolves home and projectile collisions.
    AdvanceEnemies {
        /// Simulated time covered by the update.
        dt: Duration,
    },
    /// Advances projectiles in flight and their terminal effects.
    AdvanceBullets {
        /// Simulated time covered by the update.
        dt: Duration,
    },
    /// Advances tower cooldowns.
    AdvanceTowers {
        /// Simulated time covered by the update.
        dt: Duration,
    },
    /// Advances coin pickup motion and lifetimes.
    AdvanceCoins {
        /// Simulated time covered by the update.
        dt: Duration,
    },
    /// Advances the player avatar, its abilities and coin collection.
    AdvancePlayer {
        /// Simulated time covered by the update.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that an enemy entered the map.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy created.
        kind: EnemyKind,
        /// Spawn point whose route the enemy follows.
        spawn_point: SpawnPointId,
        /// Initial world position.
        position: Vec2,
    },
    /// Reports that an enemy's hit points reached zero.
    EnemyKilled {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
        /// Position at the moment of death.
        position: Vec2,
    },
    /// Reports that an enemy walked into the home tile.
    EnemyReachedHome {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Damage dealt to the home.
        damage: f32,
    },
    /// Reports the home's hit points after taking damage.
    HomeDamaged {
        /// Remaining hit points.
        hp: f32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Projectile that was created.
        bullet: BulletId,
        /// Kind of projectile.
        kind: BulletKind,
        /// Enemy the projectile was aimed at.
        target: EnemyId,
    },
    /// Reports that a projectile struck an enemy.
    BulletImpact {
        /// Projectile that hit.
        bullet: BulletId,
        /// Kind of projectile.
        kind: BulletKind,
        /// Impact position.
        position: Vec2,
    },
    /// Reports that a dying enemy dropped a coin pickup.
    CoinDropped {
        /// Identifier of the pickup.
        coin: CoinId,
        /// Position where the pickup appeared.
        position: Vec2,
    },
    /// Reports that the player collected a coin pickup.
    CoinCollected {
        /// Identifier of the pickup.
        coin: CoinId,
        /// Coins credited for the pickup.
        value: f64,
    },
    /// Reports the ledger balance after a credit or debit.
    CoinsChanged {
        /// Balance after the change.
        balance: f64,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Kind of tower.
        kind: TowerKind,
        /// Tile holding the tower.
        tile: TileIndex,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Kind requested for placement.
        kind: TowerKind,
        /// Tile provided in the request.
        tile: TileIndex,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower kind gained a level.
    TowerUpgraded {
        /// Kind that was upgraded.
        kind: TowerKind,
        /// New level of the kind.
        level: u8,
    },
    /// Reports that an upgrade was refused because the kind is at its cap.
    TowerUpgradeRejected {
        /// Kind that could not be upgraded.
        kind: TowerKind,
    },
    /// Reports that the player started one of its abilities.
    PlayerAbilityReleased {
        /// Ability that started.
        ability: PlayerAbility,
    },
    /// Announces that the match reached a terminal outcome.
    GameOver {
        /// Final outcome.
        outcome: GameOutcome,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a coin pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoinId(u32);

impl CoinId {
    /// Creates a new coin identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Spawn point identifier carried by map tiles and spawn events.
///
/// Map files mark spawn tiles with strictly positive identifiers; any other
/// value never matches a compiled route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnPointId(i32);

impl SpawnPointId {
    /// Creates a spawn point identifier.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl Default for SpawnPointId {
    fn default() -> Self {
        Self(1)
    }
}

/// Location of a single tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileIndex {
    column: u32,
    row: u32,
}

impl TileIndex {
    /// Creates a new tile index.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World position of the tile's centre.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.column as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            self.row as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }

    /// World rectangle covered by the tile.
    #[must_use]
    pub fn bounds(&self) -> WorldRect {
        WorldRect::from_min_size(
            Vec2::new(self.column as f32 * TILE_SIZE, self.row as f32 * TILE_SIZE),
            Vec2::splat(TILE_SIZE),
        )
    }

    /// Neighbouring index one step along `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant or
    /// when the direction carries no movement. Upper bounds are checked by the
    /// grid that owns the tiles.
    #[must_use]
    pub fn step(self, direction: TileDirection) -> Option<Self> {
        let (column, row) = match direction {
            TileDirection::None => return None,
            TileDirection::Up => (Some(self.column), self.row.checked_sub(1)),
            TileDirection::Down => (Some(self.column), self.row.checked_add(1)),
            TileDirection::Left => (self.column.checked_sub(1), Some(self.row)),
            TileDirection::Right => (self.column.checked_add(1), Some(self.row)),
        };
        Some(Self::new(column?, row?))
    }
}

/// Direction marker painted on a path tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileDirection {
    /// No marker; the tile is not part of a path or ends one.
    #[default]
    None,
    /// Path continues toward decreasing row indices.
    Up,
    /// Path continues toward increasing row indices.
    Down,
    /// Path continues toward decreasing column indices.
    Left,
    /// Path continues toward increasing column indices.
    Right,
}

impl TileDirection {
    /// Decodes the numeric direction code used by map files.
    ///
    /// Codes outside `1..=4` carry no direction.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Up,
            2 => Self::Down,
            3 => Self::Left,
            4 => Self::Right,
            _ => Self::None,
        }
    }
}

/// Special role a tile plays on the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileMarker {
    /// Ordinary tile.
    #[default]
    None,
    /// Tile enemies try to reach.
    Home,
    /// Origin of a route.
    SpawnPoint(SpawnPointId),
}

impl TileMarker {
    /// Decodes the numeric special flag used by map files.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Home,
            value if value > 0 => Self::SpawnPoint(SpawnPointId::new(value)),
            _ => Self::None,
        }
    }
}

/// A single map tile.
///
/// Everything except the occupancy flag is fixed once the map is loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tile {
    terrain: u32,
    decoration: Option<u32>,
    direction: TileDirection,
    marker: TileMarker,
    occupied: bool,
}

impl Tile {
    /// Creates an unoccupied tile.
    #[must_use]
    pub const fn new(
        terrain: u32,
        decoration: Option<u32>,
        direction: TileDirection,
        marker: TileMarker,
    ) -> Self {
        Self {
            terrain,
            decoration,
            direction,
            marker,
            occupied: false,
        }
    }

    /// Terrain sprite identifier.
    #[must_use]
    pub const fn terrain(&self) -> u32 {
        self.terrain
    }

    /// Decoration sprite identifier, if the tile is decorated.
    #[must_use]
    pub const fn decoration(&self) -> Option<u32> {
        self.decoration
    }

    /// Direction marker painted on the tile.
    #[must_use]
    pub const fn direction(&self) -> TileDirection {
        self.direction
    }

    /// Special role of the tile.
    #[must_use]
    pub const fn marker(&self) -> TileMarker {
        self.marker
    }

    /// Reports whether a tower stands on the tile.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Records that a tower now stands on the tile.
    pub fn mark_occupied(&mut self) {
        self.occupied = true;
    }
}

/// Rectangular, row-major collection of tiles produced by the map loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Creates a tile map, returning `None` when the tile count does not match
    /// the dimensions or when the map would be empty.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tiles: Vec<Tile>) -> Option<Self> {
        let expected = usize::try_from(columns)
            .ok()?
            .checked_mul(usize::try_from(rows).ok()?)?;
        if expected == 0 || tiles.len() != expected {
            return None;
        }
        Some(Self {
            columns,
            rows,
            tiles,
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Retrieves the tile at `index`, if it lies inside the map.
    #[must_use]
    pub fn tile(&self, index: TileIndex) -> Option<&Tile> {
        self.offset(index).and_then(|offset| self.tiles.get(offset))
    }

    /// Mutable access to the tile at `index`, if it lies inside the map.
    pub fn tile_mut(&mut self, index: TileIndex) -> Option<&mut Tile> {
        self.offset(index).and_then(|offset| self.tiles.get_mut(offset))
    }

    /// Iterates tiles in row-major order alongside their indices.
    pub fn iter(&self) -> impl Iterator<Item = (TileIndex, &Tile)> + '_ {
        let columns = self.columns;
        self.tiles.iter().enumerate().map(move |(offset, tile)| {
            let offset = offset as u32;
            (TileIndex::new(offset % columns, offset / columns), tile)
        })
    }

    /// World rectangle covered by the whole map.
    #[must_use]
    pub fn bounds(&self) -> WorldRect {
        WorldRect::from_min_size(
            Vec2::ZERO,
            Vec2::new(
                self.columns as f32 * TILE_SIZE,
                self.rows as f32 * TILE_SIZE,
            ),
        )
    }

    fn offset(&self, index: TileIndex) -> Option<usize> {
        if index.column() < self.columns && index.row() < self.rows {
            let row = usize::try_from(index.row()).ok()?;
            let column = usize::try_from(index.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Axis-aligned rectangle in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldRect {
    min: Vec2,
    size: Vec2,
}

impl WorldRect {
    /// Creates a rectangle from its minimum corner and extents.
    #[must_use]
    pub const fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Creates a rectangle centred on `center`.
    #[must_use]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    /// Minimum corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    /// Clamps the point into the rectangle.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max())
    }
}

/// Cardinal orientation used by towers, the player and movement inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Toward decreasing y.
    Up,
    /// Toward increasing y.
    Down,
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    #[default]
    Right,
}

impl Facing {
    /// Picks the facing along the dominant axis of `direction`.
    ///
    /// Horizontal facing wins ties.
    #[must_use]
    pub fn dominant_axis(direction: Vec2) -> Self {
        if direction.x.abs() >= direction.y.abs() {
            if direction.x > 0.0 {
                Self::Right
            } else {
                Self::Left
            }
        } else if direction.y > 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Unit vector pointing along the facing.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Enemy species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Basic melee enemy.
    #[default]
    Slime,
    /// Larger slime.
    KingSlime,
    /// Undead walker.
    Skeleton,
    /// Fast raider.
    Goblin,
    /// Goblin that heals nearby allies.
    GoblinPriest,
}

impl EnemyKind {
    /// All enemy kinds in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Slime,
        Self::KingSlime,
        Self::Skeleton,
        Self::Goblin,
        Self::GoblinPriest,
    ];

    /// Resolves the name used by level files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Slim" => Some(Self::Slime),
            "KingSlim" => Some(Self::KingSlime),
            "Skeleton" => Some(Self::Skeleton),
            "Goblin" => Some(Self::Goblin),
            "GoblinPriest" => Some(Self::GoblinPriest),
            _ => None,
        }
    }

    /// Key naming the kind's section in configuration files.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Slime => "slim",
            Self::KingSlime => "king_slim",
            Self::Skeleton => "skeleton",
            Self::Goblin => "goblin",
            Self::GoblinPriest => "goblin_priest",
        }
    }

    /// Extents of the enemy's bounding box in world units.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        match self {
            Self::KingSlime => Vec2::splat(64.0),
            _ => Vec2::splat(TILE_SIZE),
        }
    }
}

/// Tower archetypes available for construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Fires arrows.
    Archer,
    /// Throws axes that slow their target.
    Axeman,
    /// Fires exploding shells.
    Gunner,
}

impl TowerKind {
    /// All tower kinds in declaration order.
    pub const ALL: [Self; 3] = [Self::Archer, Self::Axeman, Self::Gunner];

    /// Key naming the kind's section in configuration files.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Archer => "archer",
            Self::Axeman => "axeman",
            Self::Gunner => "gunner",
        }
    }

    /// Projectile launched by the tower.
    #[must_use]
    pub const fn bullet(self) -> BulletKind {
        match self {
            Self::Archer => BulletKind::Arrow,
            Self::Axeman => BulletKind::Axe,
            Self::Gunner => BulletKind::Shell,
        }
    }

    /// Projectile speed in tiles per second.
    #[must_use]
    pub const fn fire_speed(self) -> f32 {
        match self {
            Self::Archer => 6.0,
            Self::Axeman => 5.0,
            Self::Gunner => 6.0,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Archer => 0,
            Self::Axeman => 1,
            Self::Gunner => 2,
        }
    }
}

/// Per-kind tower levels, shared by every tower of the same kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TowerLevels {
    levels: [u8; 3],
}

impl TowerLevels {
    /// Current level of the provided kind.
    #[must_use]
    pub const fn get(&self, kind: TowerKind) -> u8 {
        self.levels[kind.slot()]
    }

    /// Raises the kind by one level, returning the new level or `None` when
    /// the kind already sits at [`MAX_TOWER_LEVEL`].
    pub fn raise(&mut self, kind: TowerKind) -> Option<u8> {
        let level = &mut self.levels[kind.slot()];
        if *level >= MAX_TOWER_LEVEL {
            return None;
        }
        *level += 1;
        Some(*level)
    }
}

/// Projectile archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulletKind {
    /// Single-target projectile consumed on hit.
    Arrow,
    /// Single-target projectile that slows its target.
    Axe,
    /// Splash projectile that lingers briefly after impact.
    Shell,
}

impl BulletKind {
    /// Splash radius in world units; negative values mean single-target.
    #[must_use]
    pub const fn damage_radius(self) -> f32 {
        match self {
            Self::Arrow | Self::Axe => -1.0,
            Self::Shell => 96.0,
        }
    }

    /// Extents of the projectile in world units.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        Vec2::splat(TILE_SIZE)
    }
}

/// Abilities the player can release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAbility {
    /// Short-range sweeping attack on a cooldown.
    Flash,
    /// Close-range slam that drains the mana bar.
    Impact,
}

/// Match status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The match is still running.
    #[default]
    InProgress,
    /// Every wave was cleared.
    Victory,
    /// The home was destroyed.
    Defeat,
}

impl GameOutcome {
    /// Reports whether the match has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The tile lies outside the map.
    OutOfBounds,
    /// The tile is decorated or belongs to an enemy path.
    Blocked,
    /// A tower already stands on the tile.
    Occupied,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// World position.
    pub position: Vec2,
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// Bounding box extents.
    pub size: Vec2,
    /// Remaining hit points.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Current movement speed in tiles per second.
    pub speed: f32,
    /// Fraction of the route already traversed, within `[0, 1]`.
    pub route_progress: f32,
    /// Whether the enemy recently took damage.
    pub hit_flash: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Identifier assigned to the projectile.
    pub id: BulletId,
    /// Kind of projectile.
    pub kind: BulletKind,
    /// World position.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Damage applied on impact.
    pub damage: f32,
    /// Splash radius; negative for single-target projectiles.
    pub damage_radius: f32,
    /// Whether the projectile can still hit enemies.
    pub collidable: bool,
}

/// Read-only snapshot describing all projectiles.
#[derive(Clone, Debug, Default)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectiles in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BulletSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile the tower stands on.
    pub tile: TileIndex,
    /// World position of the tower.
    pub position: Vec2,
    /// Level currently shared by the tower's kind.
    pub level: u8,
    /// Orientation after the most recent shot.
    pub facing: Facing,
    /// Targeting radius in world units.
    pub view_radius: f32,
    /// Enemy targeted by the most recent shot.
    pub target: Option<EnemyId>,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Cooldown state of a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower described by the snapshot.
    pub tower: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Time left before the tower may fire again; zero when ready.
    pub ready_in: Duration,
}

/// Read-only snapshot of every tower's cooldown, sorted by tower identifier.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured cooldowns.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Target chosen for a tower by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that will fire.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// World position of the tower.
    pub tower_position: Vec2,
    /// World position of the enemy.
    pub enemy_position: Vec2,
}

/// Immutable representation of a coin pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoinSnapshot {
    /// Identifier assigned to the pickup.
    pub id: CoinId,
    /// World position.
    pub position: Vec2,
}

/// Read-only snapshot describing all coin pickups.
#[derive(Clone, Debug, Default)]
pub struct CoinView {
    snapshots: Vec<CoinSnapshot>,
}

impl CoinView {
    /// Creates a new coin view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CoinSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured pickups.
    pub fn iter(&self) -> impl Iterator<Item = &CoinSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CoinSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// World position.
    pub position: Vec2,
    /// Current orientation.
    pub facing: Facing,
    /// Mana in `[0, 100]`.
    pub mp: f32,
    /// Area covered by an ongoing flash, if any.
    pub flash_hitbox: Option<WorldRect>,
    /// Area covered by an ongoing impact, if any.
    pub impact_hitbox: Option<WorldRect>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn tile_marker_round_trips_through_bincode() {
        assert_round_trip(&TileMarker::SpawnPoint(SpawnPointId::new(3)));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::Occupied);
    }

    #[test]
    fn direction_codes_decode_like_map_files() {
        assert_eq!(TileDirection::from_code(0), TileDirection::None);
        assert_eq!(TileDirection::from_code(1), TileDirection::Up);
        assert_eq!(TileDirection::from_code(2), TileDirection::Down);
        assert_eq!(TileDirection::from_code(3), TileDirection::Left);
        assert_eq!(TileDirection::from_code(4), TileDirection::Right);
        assert_eq!(TileDirection::from_code(9), TileDirection::None);
        assert_eq!(TileDirection::from_code(-1), TileDirection::None);
    }

    #[test]
    fn special_flags_decode_like_map_files() {
        assert_eq!(TileMarker::from_code(-1), TileMarker::None);
        assert_eq!(TileMarker::from_code(0), TileMarker::Home);
        assert_eq!(
            TileMarker::from_code(2),
            TileMarker::SpawnPoint(SpawnPointId::new(2))
        );
    }

    #[test]
    fn stepping_off_the_top_left_edge_yields_none() {
        let origin = TileIndex::new(0, 0);
        assert_eq!(origin.step(TileDirection::Up), None);
        assert_eq!(origin.step(TileDirection::Left), None);
        assert_eq!(origin.step(TileDirection::None), None);
        assert_eq!(
            origin.step(TileDirection::Right),
            Some(TileIndex::new(1, 0))
        );
        assert_eq!(origin.step(TileDirection::Down), Some(TileIndex::new(0, 1)));
    }

    #[test]
    fn tile_centers_sit_half_a_tile_in() {
        assert_eq!(TileIndex::new(2, 1).center(), Vec2::new(120.0, 72.0));
    }

    #[test]
    fn tile_map_rejects_mismatched_dimensions() {
        assert!(TileMap::new(2, 2, vec![Tile::default(); 3]).is_none());
        assert!(TileMap::new(0, 0, Vec::new()).is_none());
        let map = TileMap::new(3, 2, vec![Tile::default(); 6]).expect("valid map");
        assert!(map.tile(TileIndex::new(2, 1)).is_some());
        assert!(map.tile(TileIndex::new(3, 0)).is_none());
        assert_eq!(map.bounds().max(), Vec2::new(144.0, 96.0));
    }

    #[test]
    fn dominant_axis_prefers_horizontal_on_ties() {
        assert_eq!(Facing::dominant_axis(Vec2::new(3.0, 3.0)), Facing::Right);
        assert_eq!(Facing::dominant_axis(Vec2::new(-3.0, 3.0)), Facing::Left);
        assert_eq!(Facing::dominant_axis(Vec2::new(1.0, -4.0)), Facing::Up);
        assert_eq!(Facing::dominant_axis(Vec2::new(1.0, 4.0)), Facing::Down);
    }

    #[test]
    fn enemy_names_match_level_files() {
        assert_eq!(EnemyKind::from_name("KingSlim"), Some(EnemyKind::KingSlime));
        assert_eq!(EnemyKind::from_name("Dragon"), None);
        for kind in EnemyKind::ALL {
            assert!(!kind.config_key().is_empty());
        }
    }

    #[test]
    fn tower_levels_cap_at_max() {
        let mut levels = TowerLevels::default();
        for expected in 1..=MAX_TOWER_LEVEL {
            assert_eq!(levels.raise(TowerKind::Axeman), Some(expected));
        }
        assert_eq!(levels.raise(TowerKind::Axeman), None);
        assert_eq!(levels.get(TowerKind::Axeman), MAX_TOWER_LEVEL);
        assert_eq!(levels.get(TowerKind::Archer), 0);
    }

    #[test]
    fn world_rect_contains_its_edges() {
        let rect = WorldRect::from_min_size(Vec2::new(10.0, 10.0), Vec2::new(20.0, 5.0));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(30.0, 15.0)));
        assert!(!rect.contains(Vec2::new(30.1, 15.0)));
    }
}

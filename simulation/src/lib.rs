#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation context that owns the world and drives the fixed-order tick.
//!
//! A [`Simulation`] replaces the global managers a game loop would otherwise
//! reach for: it owns the [`World`], the wave scheduler and the tower
//! systems, and routes every mutation through [`world::apply`].

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace};
use village_defence_core::{
    Command, Event, GameConfig, GameOutcome, PlacementError, TileIndex, TileMap, TowerId,
    TowerKind, TowerTarget, Wave,
};
use village_defence_system_tower_combat::TowerCombat;
use village_defence_system_tower_targeting::TowerTargeting;
use village_defence_system_wave_scheduler::WaveScheduler;
use village_defence_world::{self as world, query, World};

/// Reasons a build request made through the simulation can fail.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum BuildError {
    /// The match already ended.
    #[error("the match is over")]
    GameOver,
    /// The ledger cannot cover the cost.
    #[error("{required} coins required but only {available} available")]
    InsufficientCoins {
        /// Cost of the request.
        required: f64,
        /// Balance at the time of the request.
        available: f64,
    },
    /// The world refused the tile.
    #[error("tower placement rejected: {0:?}")]
    Placement(PlacementError),
    /// The tower kind cannot be upgraded any further.
    #[error("tower kind is already at its maximum level")]
    MaxLevel,
}

/// Owns a match and advances it one frame at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    waves: WaveScheduler,
    targeting: TowerTargeting,
    combat: TowerCombat,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
    pending: Vec<Event>,
    events: Vec<Event>,
}

impl Simulation {
    /// Creates a match for the provided map, tuning and wave list.
    #[must_use]
    pub fn new(map: TileMap, config: GameConfig, waves: Vec<Wave>, seed: u64) -> Self {
        Self {
            world: World::new(map, config, seed),
            waves: WaveScheduler::new(waves),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            commands: Vec::new(),
            targets: Vec::new(),
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Read-only access to the world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the wave scheduler.
    #[must_use]
    pub const fn waves(&self) -> &WaveScheduler {
        &self.waves
    }

    /// Current match status.
    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        query::outcome(&self.world)
    }

    /// Advances the match by `dt` and returns every event raised since the
    /// previous tick, including those from build requests and submitted
    /// commands.
    ///
    /// Once the match has ended the world is no longer advanced.
    pub fn tick(&mut self, dt: Duration) -> &[Event] {
        self.events.clear();
        self.events.append(&mut self.pending);
        if self.outcome().is_terminal() {
            return &self.events;
        }

        self.waves.handle(dt, &mut self.commands);
        self.flush();

        self.waves
            .poll(query::enemies_cleared(&self.world), &mut self.commands);
        self.flush();
        if self.outcome().is_terminal() {
            return &self.events;
        }

        world::apply(
            &mut self.world,
            Command::AdvanceEnemies { dt },
            &mut self.events,
        );
        if self.outcome().is_terminal() {
            return &self.events;
        }

        world::apply(
            &mut self.world,
            Command::AdvanceBullets { dt },
            &mut self.events,
        );

        world::apply(
            &mut self.world,
            Command::AdvanceTowers { dt },
            &mut self.events,
        );
        let tower_view = query::tower_view(&self.world);
        let enemy_view = query::enemy_view(&self.world);
        self.targeting
            .handle(&tower_view, &enemy_view, &mut self.targets);
        self.combat.handle(
            query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.flush();

        world::apply(
            &mut self.world,
            Command::AdvanceCoins { dt },
            &mut self.events,
        );
        world::apply(
            &mut self.world,
            Command::AdvancePlayer { dt },
            &mut self.events,
        );

        &self.events
    }

    /// Forwards a raw command to the world.
    ///
    /// Resulting events are reported by the next [`Simulation::tick`].
    pub fn submit(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.pending);
    }

    /// Places a tower if the ledger can pay for it, debiting the cost only
    /// when the world accepts the tile.
    pub fn try_place_tower(
        &mut self,
        kind: TowerKind,
        tile: TileIndex,
    ) -> Result<TowerId, BuildError> {
        let cost = query::place_cost(&self.world, kind);
        self.ensure_affordable(cost)?;

        let mark = self.pending.len();
        world::apply(
            &mut self.world,
            Command::PlaceTower { kind, tile },
            &mut self.pending,
        );
        let outcome = self.pending[mark..].iter().find_map(|event| match event {
            Event::TowerPlaced { tower, .. } => Some(Ok(*tower)),
            Event::TowerPlacementRejected { reason, .. } => {
                Some(Err(BuildError::Placement(*reason)))
            }
            _ => None,
        });

        match outcome {
            Some(Ok(tower)) => {
                self.submit(Command::DebitCoins { amount: cost });
                Ok(tower)
            }
            Some(Err(error)) => Err(error),
            None => Err(BuildError::Placement(PlacementError::OutOfBounds)),
        }
    }

    /// Raises the level of every tower of `kind` if the ledger can pay for
    /// it, returning the new level.
    pub fn try_upgrade_tower(&mut self, kind: TowerKind) -> Result<u8, BuildError> {
        if self.outcome().is_terminal() {
            return Err(BuildError::GameOver);
        }
        let cost = query::upgrade_cost(&self.world, kind).ok_or(BuildError::MaxLevel)?;
        self.ensure_affordable(cost)?;

        let mark = self.pending.len();
        world::apply(
            &mut self.world,
            Command::UpgradeTower { kind },
            &mut self.pending,
        );
        let level = self.pending[mark..].iter().find_map(|event| match event {
            Event::TowerUpgraded { level, .. } => Some(*level),
            _ => None,
        });

        let level = level.ok_or(BuildError::MaxLevel)?;
        self.submit(Command::DebitCoins { amount: cost });
        Ok(level)
    }

    fn ensure_affordable(&self, required: f64) -> Result<(), BuildError> {
        if self.outcome().is_terminal() {
            return Err(BuildError::GameOver);
        }
        let available = query::coins(&self.world);
        if available < required {
            debug!(required, available, "build request refused");
            return Err(BuildError::InsufficientCoins {
                required,
                available,
            });
        }
        Ok(())
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            trace!(?command, "applying system command");
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Village Defence.
//!
//! The world owns the grid, every entity registry, the economy ledger and the
//! home. It is mutated exclusively through [`apply`] and observed through the
//! functions in [`query`].

mod bullets;
mod coins;
mod combat;
mod enemies;
mod grid;
mod ledger;
mod player;
mod registry;
mod towers;

use std::{sync::Arc, time::Duration};

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use village_defence_core::{
    Command, EnemyId, EnemyKind, Event, GameConfig, GameOutcome, PlayerAbility, SpawnPointId,
    TileMap, TowerId, TowerLevels, INITIAL_COINS, INITIAL_HOME_HP, TILE_SIZE,
};

use bullets::BulletRegistry;
use coins::CoinRegistry;
use combat::KillRewards;
use enemies::{EnemyRegistry, HealPulse};
use ledger::{Home, Ledger};
use player::Player;
use towers::TowerRegistry;

pub use grid::{Grid, Route};

/// Represents the authoritative Village Defence world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    grid: Grid,
    enemies: EnemyRegistry,
    bullets: BulletRegistry,
    towers: TowerRegistry,
    coins: CoinRegistry,
    player: Player,
    ledger: Ledger,
    home: Home,
    tower_levels: TowerLevels,
    outcome: GameOutcome,
    rng: ChaCha8Rng,
    heal_pulses: Vec<HealPulse>,
}

impl World {
    /// Creates a world for the provided map and configuration.
    ///
    /// `seed` drives coin drop rolls and coin jump directions.
    #[must_use]
    pub fn new(map: TileMap, config: GameConfig, seed: u64) -> Self {
        let grid = Grid::new(map);
        let start = match grid.home() {
            Some(home) => Vec2::new(
                home.column() as f32 * TILE_SIZE - TILE_SIZE,
                home.row() as f32 * TILE_SIZE,
            ),
            None => {
                warn!("map has no home tile; enemies can never arrive");
                Vec2::ZERO
            }
        };
        let player = Player::new(start, config.player);

        Self {
            config,
            grid,
            enemies: EnemyRegistry::default(),
            bullets: BulletRegistry::default(),
            towers: TowerRegistry::new(),
            coins: CoinRegistry::default(),
            player,
            ledger: Ledger::new(INITIAL_COINS),
            home: Home::new(INITIAL_HOME_HP),
            tower_levels: TowerLevels::default(),
            outcome: GameOutcome::InProgress,
            rng: ChaCha8Rng::seed_from_u64(seed),
            heal_pulses: Vec::new(),
        }
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        spawn_point: SpawnPointId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(route) = self.grid.route(spawn_point) else {
            warn!(spawn_point = spawn_point.get(), ?kind, "spawn point has no route");
            return;
        };

        let route = Arc::clone(route);
        let enemy = self
            .enemies
            .spawn(kind, self.config.enemy(kind), route);
        out_events.push(Event::EnemySpawned {
            enemy: enemy.id(),
            kind,
            spawn_point,
            position: enemy.position(),
        });
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let Some(target_position) = self
            .enemies
            .get(target)
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.position())
        else {
            return;
        };
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if !state.is_ready() {
            return;
        }

        let kind = state.kind;
        let level = self.tower_levels.get(kind);
        let template = self.config.tower(kind);
        let origin = state.position();
        let direction = (target_position - origin).normalize_or_zero();
        state.fire(template.interval(level), target, direction);

        let bullet_kind = kind.bullet();
        let bullet = self.bullets.spawn(
            bullet_kind,
            origin,
            direction * kind.fire_speed() * TILE_SIZE,
            template.damage(level),
        );
        out_events.push(Event::ProjectileFired {
            tower,
            bullet,
            kind: bullet_kind,
            target,
        });
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.heal_pulses.clear();
        self.enemies.update(dt, &mut self.heal_pulses);
        for pulse in self.heal_pulses.drain(..) {
            self.enemies.apply_heal(pulse);
        }

        let home_area = self.grid.home().map(|home| home.bounds());
        combat::resolve_home_arrivals(
            self.enemies.entries_mut(),
            home_area,
            &mut self.home,
            out_events,
        );
        if self.home.is_destroyed() {
            self.finish(GameOutcome::Defeat, out_events);
        }

        let mut rewards = KillRewards::new(&mut self.coins, &mut self.rng);
        combat::resolve_bullet_hits(
            self.enemies.entries_mut(),
            &mut self.bullets,
            &mut rewards,
            out_events,
        );
        let _ = self.enemies.sweep();
    }

    fn advance_player(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let arena = self.grid.bounds();
        let mut rewards = KillRewards::new(&mut self.coins, &mut self.rng);
        self.player.advance(
            dt,
            arena,
            self.enemies.entries_mut(),
            &mut rewards,
            out_events,
        );
        self.player
            .collect_coins(&mut self.coins, &mut self.ledger, out_events);
        let _ = self.enemies.sweep();
        let _ = self.coins.sweep();
    }

    fn finish(&mut self, outcome: GameOutcome, out_events: &mut Vec<Event>) {
        if self.outcome.is_terminal() {
            return;
        }
        self.outcome = outcome;
        info!(?outcome, home_hp = self.home.hp(), "match finished");
        out_events.push(Event::GameOver { outcome });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnEnemy { kind, spawn_point } => {
            world.spawn_enemy(kind, spawn_point, out_events);
        }
        Command::PlaceTower { kind, tile } => match world.grid.check_placement(tile) {
            Ok(()) => {
                world.grid.mark_occupied(tile);
                let tower = world.towers.insert(kind, tile);
                debug!(tower = tower.get(), ?kind, ?tile, "tower placed");
                out_events.push(Event::TowerPlaced { tower, kind, tile });
            }
            Err(reason) => {
                debug!(?kind, ?tile, ?reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, tile, reason });
            }
        },
        Command::UpgradeTower { kind } => match world.tower_levels.raise(kind) {
            Some(level) => {
                debug!(?kind, level, "tower kind upgraded");
                out_events.push(Event::TowerUpgraded { kind, level });
            }
            None => out_events.push(Event::TowerUpgradeRejected { kind }),
        },
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::CreditCoins { amount } => {
            world.ledger.credit(amount);
            out_events.push(Event::CoinsChanged {
                balance: world.ledger.balance(),
            });
        }
        Command::DebitCoins { amount } => {
            world.ledger.debit(amount);
            out_events.push(Event::CoinsChanged {
                balance: world.ledger.balance(),
            });
        }
        Command::DeclareVictory => world.finish(GameOutcome::Victory, out_events),
        Command::SetPlayerMovement { direction, active } => {
            world.player.set_movement(direction, active);
        }
        Command::ReleaseFlash => {
            if world.player.release_flash() {
                out_events.push(Event::PlayerAbilityReleased {
                    ability: PlayerAbility::Flash,
                });
            }
        }
        Command::ReleaseImpact => {
            if world.player.release_impact() {
                out_events.push(Event::PlayerAbilityReleased {
                    ability: PlayerAbility::Impact,
                });
            }
        }
        Command::AdvanceEnemies { dt } => world.advance_enemies(dt, out_events),
        Command::AdvanceBullets { dt } => {
            world.bullets.update(dt, world.grid.bounds());
            let _ = world.bullets.sweep();
        }
        Command::AdvanceTowers { dt } => world.towers.update(dt),
        Command::AdvanceCoins { dt } => {
            world.coins.update(dt);
            let _ = world.coins.sweep();
        }
        Command::AdvancePlayer { dt } => world.advance_player(dt, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use village_defence_core::{
        BulletView, CoinView, EnemyView, GameConfig, GameOutcome, PlayerSnapshot,
        TowerCooldownSnapshot, TowerCooldownView, TowerKind, TowerSnapshot, TowerView, TILE_SIZE,
    };

    use super::{Grid, World};

    /// Provides read-only access to the loaded configuration.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the tile grid and its compiled routes.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Current coin balance.
    #[must_use]
    pub fn coins(world: &World) -> f64 {
        world.ledger.balance()
    }

    /// Remaining hit points of the home.
    #[must_use]
    pub fn home_hp(world: &World) -> f32 {
        world.home.hp()
    }

    /// Current match status.
    #[must_use]
    pub fn outcome(world: &World) -> GameOutcome {
        world.outcome
    }

    /// Level shared by every tower of `kind`.
    #[must_use]
    pub fn tower_level(world: &World, kind: TowerKind) -> u8 {
        world.tower_levels.get(kind)
    }

    /// Coins required to place a tower of `kind` at its current level.
    #[must_use]
    pub fn place_cost(world: &World, kind: TowerKind) -> f64 {
        world
            .config
            .tower(kind)
            .cost(world.tower_levels.get(kind))
    }

    /// Coins required to raise `kind` by one level, or `None` at the cap.
    #[must_use]
    pub fn upgrade_cost(world: &World, kind: TowerKind) -> Option<f64> {
        world
            .config
            .tower(kind)
            .upgrade_cost(world.tower_levels.get(kind))
    }

    /// Targeting radius of `kind` in tiles at its current level.
    #[must_use]
    pub fn view_range(world: &World, kind: TowerKind) -> f32 {
        world
            .config
            .tower(kind)
            .view_range(world.tower_levels.get(kind))
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of every projectile.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        BulletView::from_snapshots(world.bullets.iter().map(|bullet| bullet.snapshot()).collect())
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    tile: tower.tile,
                    position: tower.position(),
                    level: world.tower_levels.get(tower.kind),
                    facing: tower.facing,
                    view_radius: view_range(world, tower.kind) * TILE_SIZE,
                    target: tower.target,
                })
                .collect(),
        )
    }

    /// Captures the cooldown state of every placed tower.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerCooldownSnapshot {
                    tower: tower.id,
                    kind: tower.kind,
                    ready_in: tower.ready_in(),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every uncollected coin pickup.
    #[must_use]
    pub fn coin_view(world: &World) -> CoinView {
        CoinView::from_snapshots(
            world
                .coins
                .iter()
                .filter(|coin| coin.is_valid())
                .map(|coin| coin.snapshot())
                .collect(),
        )
    }

    /// Captures the player avatar.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Reports whether no enemy remains on the map.
    #[must_use]
    pub fn enemies_cleared(world: &World) -> bool {
        world.enemies.is_empty()
    }
}

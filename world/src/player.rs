//! Player avatar: movement, the flash attack, the impact skill and coin pickup.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use village_defence_core::{
    duration_from_secs, Event, Facing, IntervalTimer, PlayerSnapshot,
    PlayerTemplate, WorldRect, COIN_PICKUP_VALUE, TILE_SIZE,
};

use crate::{
    coins::CoinRegistry,
    combat::KillRewards,
    enemies::Enemy,
    ledger::Ledger,
};

const PLAYER_SIZE: f32 = 96.0;
const MAX_MP: f32 = 100.0;
const MANA_TICK: Duration = Duration::from_millis(100);
const RELEASE: Duration = Duration::from_millis(500);

/// Strip swept by an ability on the side the player faces.
#[derive(Clone, Copy, Debug)]
struct AbilityArea {
    length: f32,
    width: f32,
    /// How far a backward-facing strip reaches past the player's far edge.
    lead: f32,
}

const FLASH_AREA: AbilityArea = AbilityArea {
    length: 300.0,
    width: 68.0,
    lead: 280.0,
};

const IMPACT_AREA: AbilityArea = AbilityArea {
    length: 60.0,
    width: 140.0,
    lead: 40.0,
};

impl AbilityArea {
    fn around(self, position: Vec2, facing: Facing) -> WorldRect {
        let half = PLAYER_SIZE / 2.0;
        let horizontal = Vec2::new(self.length, self.width);
        let vertical = Vec2::new(self.width, self.length);
        match facing {
            Facing::Left => WorldRect::from_min_size(
                Vec2::new(position.x - half - self.lead, position.y - self.width / 2.0),
                horizontal,
            ),
            Facing::Right => WorldRect::from_min_size(
                Vec2::new(position.x + half, position.y - self.width / 2.0),
                horizontal,
            ),
            Facing::Up => WorldRect::from_min_size(
                Vec2::new(position.x - self.width / 2.0, position.y - half - self.lead),
                vertical,
            ),
            Facing::Down => WorldRect::from_min_size(
                Vec2::new(position.x - self.width / 2.0, position.y + half),
                vertical,
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct MovementInput {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl MovementInput {
    fn set(&mut self, direction: Facing, active: bool) {
        match direction {
            Facing::Up => self.up = active,
            Facing::Down => self.down = active,
            Facing::Left => self.left = active,
            Facing::Right => self.right = active,
        }
    }

    fn axis(self) -> Vec2 {
        let horizontal = f32::from(u8::from(self.right)) - f32::from(u8::from(self.left));
        let vertical = f32::from(u8::from(self.down)) - f32::from(u8::from(self.up));
        Vec2::new(horizontal, vertical)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    template: PlayerTemplate,
    position: Vec2,
    facing: Facing,
    mp: f32,
    input: MovementInput,
    mana_timer: IntervalTimer,
    flash_cooldown: IntervalTimer,
    flash_ready: bool,
    flash: Option<IntervalTimer>,
    impact: Option<IntervalTimer>,
}

impl Player {
    pub(crate) fn new(position: Vec2, template: PlayerTemplate) -> Self {
        Self {
            template,
            position,
            facing: Facing::Left,
            mp: MAX_MP,
            input: MovementInput::default(),
            mana_timer: IntervalTimer::repeating(MANA_TICK),
            flash_cooldown: IntervalTimer::one_shot(duration_from_secs(
                template.normal_attack_interval,
            )),
            flash_ready: true,
            flash: None,
            impact: None,
        }
    }

    pub(crate) fn set_movement(&mut self, direction: Facing, active: bool) {
        self.input.set(direction, active);
    }

    /// Starts the flash attack if it is off cooldown and not already running.
    pub(crate) fn release_flash(&mut self) -> bool {
        if self.flash.is_some() || !self.flash_ready {
            return false;
        }
        self.flash_ready = false;
        self.flash_cooldown.restart();
        self.flash = Some(IntervalTimer::one_shot(RELEASE));
        true
    }

    /// Starts the impact skill, draining the mana bar.
    pub(crate) fn release_impact(&mut self) -> bool {
        if self.impact.is_some() || self.mp < MAX_MP {
            return false;
        }
        self.mp = 0.0;
        self.impact = Some(IntervalTimer::one_shot(RELEASE));
        true
    }

    fn is_releasing(&self) -> bool {
        self.flash.is_some() || self.impact.is_some()
    }

    fn mana_per_tick(&self) -> f32 {
        let interval = self.template.skill_interval;
        if interval.is_nan() || interval <= 0.0 {
            return MAX_MP;
        }
        MAX_MP / (interval / MANA_TICK.as_secs_f32())
    }

    /// Advances timers and movement, then lets running abilities strike
    /// every live enemy in their area.
    pub(crate) fn advance<R: Rng>(
        &mut self,
        dt: Duration,
        arena: WorldRect,
        enemies: &mut [Enemy],
        rewards: &mut KillRewards<'_, R>,
        out_events: &mut Vec<Event>,
    ) {
        if self.mana_timer.on_update(dt) {
            self.mp = (self.mp + self.mana_per_tick()).min(MAX_MP);
        }
        if self.flash_cooldown.on_update(dt) {
            self.flash_ready = true;
        }
        if self.flash.as_mut().is_some_and(|timer| timer.on_update(dt)) {
            self.flash = None;
        }
        if self.impact.as_mut().is_some_and(|timer| timer.on_update(dt)) {
            self.impact = None;
        }

        let seconds = dt.as_secs_f32();
        if !self.is_releasing() {
            self.walk(seconds, arena);
        }

        if let Some(area) = self.flash_hitbox() {
            let damage = self.template.normal_attack_damage * seconds;
            strike(enemies, area, damage, false, rewards, out_events);
        }
        if let Some(area) = self.impact_hitbox() {
            let damage = self.template.skill_damage * seconds;
            strike(enemies, area, damage, true, rewards, out_events);
        }
    }

    fn walk(&mut self, seconds: f32, arena: WorldRect) {
        let axis = self.input.axis();
        if axis.y > 0.0 {
            self.facing = Facing::Down;
        } else if axis.y < 0.0 {
            self.facing = Facing::Up;
        }
        if axis.x > 0.0 {
            self.facing = Facing::Right;
        } else if axis.x < 0.0 {
            self.facing = Facing::Left;
        }

        let velocity = axis.normalize_or_zero() * self.template.speed * TILE_SIZE;
        self.position = arena.clamp(self.position + velocity * seconds);
    }

    /// Collects every coin inside the player's box and credits the ledger.
    pub(crate) fn collect_coins(
        &self,
        coins: &mut CoinRegistry,
        ledger: &mut Ledger,
        out_events: &mut Vec<Event>,
    ) {
        let area = self.bounds();
        for coin in coins.iter_mut() {
            if coin.collect_within(area) {
                ledger.credit(COIN_PICKUP_VALUE);
                out_events.push(Event::CoinCollected {
                    coin: coin.id(),
                    value: COIN_PICKUP_VALUE,
                });
                out_events.push(Event::CoinsChanged {
                    balance: ledger.balance(),
                });
            }
        }
    }

    fn bounds(&self) -> WorldRect {
        WorldRect::centered(self.position, Vec2::splat(PLAYER_SIZE))
    }

    fn flash_hitbox(&self) -> Option<WorldRect> {
        self.flash
            .as_ref()
            .map(|_| FLASH_AREA.around(self.position, self.facing))
    }

    fn impact_hitbox(&self) -> Option<WorldRect> {
        self.impact
            .as_ref()
            .map(|_| IMPACT_AREA.around(self.position, self.facing))
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            facing: self.facing,
            mp: self.mp,
            flash_hitbox: self.flash_hitbox(),
            impact_hitbox: self.impact_hitbox(),
        }
    }
}

fn strike<R: Rng>(
    enemies: &mut [Enemy],
    area: WorldRect,
    damage: f32,
    slows: bool,
    rewards: &mut KillRewards<'_, R>,
    out_events: &mut Vec<Event>,
) {
    for enemy in enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
        if !area.contains(enemy.position()) {
            continue;
        }
        if enemy.take_damage(damage) {
            rewards.record_kill(enemy, out_events);
        }
        if slows {
            enemy.slow_down();
        }
    }
}

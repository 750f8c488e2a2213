//! Enemy state, route following and the owning registry.

use std::{sync::Arc, time::Duration};

use glam::Vec2;
use village_defence_core::{
    duration_from_secs, EnemyId, EnemyKind, EnemySnapshot, EnemyTemplate, IntervalTimer,
    TileIndex, WorldRect, TILE_SIZE,
};

use crate::{
    grid::Route,
    registry::{self, Expiring},
};

const ARRIVAL_EPSILON: f32 = 1.0e-4;
const HIT_FLASH: Duration = Duration::from_millis(75);
const SLOW_DOWN: Duration = Duration::from_secs(1);
const SLOW_DOWN_PENALTY: f32 = 0.5;

/// Heal request raised by an enemy whose recovery skill fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HealPulse {
    pub(crate) origin: Vec2,
    pub(crate) radius: f32,
    pub(crate) intensity: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    velocity: Vec2,
    direction: Vec2,
    hp: f32,
    max_hp: f32,
    base_speed: f32,
    speed: f32,
    damage: f32,
    reward_ratio: f32,
    recover_radius: f32,
    recover_intensity: f32,
    route: Arc<Route>,
    waypoint: usize,
    valid: bool,
    hit_flash: bool,
    skill_timer: IntervalTimer,
    hit_flash_timer: IntervalTimer,
    restore_speed_timer: IntervalTimer,
}

impl Enemy {
    pub(crate) fn new(
        id: EnemyId,
        kind: EnemyKind,
        template: &EnemyTemplate,
        route: Arc<Route>,
    ) -> Self {
        let position = route
            .waypoints()
            .first()
            .map_or(Vec2::ZERO, TileIndex::center);

        Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            direction: Vec2::ZERO,
            hp: template.hp,
            max_hp: template.hp,
            base_speed: template.speed,
            speed: template.speed,
            damage: template.damage,
            reward_ratio: template.reward_ratio,
            recover_radius: template.recover_range * TILE_SIZE,
            recover_intensity: template.recover_intensity,
            route,
            waypoint: 0,
            valid: true,
            hit_flash: false,
            skill_timer: IntervalTimer::repeating(duration_from_secs(template.recover_interval)),
            hit_flash_timer: IntervalTimer::one_shot(HIT_FLASH),
            restore_speed_timer: IntervalTimer::one_shot(SLOW_DOWN),
        }
    }

    /// Advances timers and movement, returning a heal pulse when the
    /// recovery skill fires.
    pub(crate) fn update(&mut self, dt: Duration) -> Option<HealPulse> {
        let origin = self.position;
        let heals = self.skill_timer.on_update(dt) && self.recover_radius >= 0.0;
        if self.hit_flash_timer.on_update(dt) {
            self.hit_flash = false;
        }
        if self.restore_speed_timer.on_update(dt) {
            self.speed = self.base_speed;
        }

        self.advance(dt.as_secs_f32());

        heals.then_some(HealPulse {
            origin,
            radius: self.recover_radius,
            intensity: self.recover_intensity,
        })
    }

    fn advance(&mut self, seconds: f32) {
        let mut target = self.waypoint_center();
        if self.position.distance(target) < ARRIVAL_EPSILON {
            if self.waypoint + 1 < self.route.len() {
                self.waypoint += 1;
            }
            target = self.waypoint_center();
            self.direction = (target - self.position).normalize_or_zero();
        }

        self.velocity = self.direction * self.speed * TILE_SIZE;
        let step = self.velocity * seconds;
        let remaining = target - self.position;
        self.position += if step.length() < remaining.length() {
            step
        } else {
            remaining
        };
    }

    fn waypoint_center(&self) -> Vec2 {
        self.route
            .waypoints()
            .get(self.waypoint)
            .map_or(self.position, TileIndex::center)
    }

    pub(crate) const fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) const fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) const fn damage(&self) -> f32 {
        self.damage
    }

    pub(crate) const fn reward_ratio(&self) -> f32 {
        self.reward_ratio
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.valid
    }

    pub(crate) fn bounds(&self) -> WorldRect {
        WorldRect::centered(self.position, self.kind.size())
    }

    /// Fraction of the route already walked; a single-waypoint route counts
    /// as complete.
    pub(crate) fn route_progress(&self) -> f32 {
        let len = self.route.len();
        if len <= 1 {
            return 1.0;
        }
        self.waypoint as f32 / (len - 1) as f32
    }

    /// Applies damage and reports whether this hit was the killing blow.
    pub(crate) fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.valid;
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.valid = false;
        }

        self.hit_flash = true;
        self.hit_flash_timer.restart();
        was_alive && !self.valid
    }

    pub(crate) fn heal(&mut self, amount: f32) {
        if self.valid {
            self.hp = (self.hp + amount).min(self.max_hp);
        }
    }

    pub(crate) fn slow_down(&mut self) {
        self.speed = (self.base_speed - SLOW_DOWN_PENALTY).max(0.0);
        self.restore_speed_timer.restart();
    }

    pub(crate) fn mark_arrived(&mut self) {
        self.valid = false;
    }

    #[cfg(test)]
    pub(crate) fn teleport(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            velocity: self.velocity,
            size: self.kind.size(),
            hp: self.hp,
            max_hp: self.max_hp,
            speed: self.speed,
            route_progress: self.route_progress(),
            hit_flash: self.hit_flash,
        }
    }
}

impl Expiring for Enemy {
    fn can_remove(&self) -> bool {
        !self.valid
    }
}

/// Registry that owns every enemy and allocates identifiers.
#[derive(Debug, Default)]
pub(crate) struct EnemyRegistry {
    entries: Vec<Enemy>,
    next_enemy_id: u32,
}

impl EnemyRegistry {
    pub(crate) fn spawn(
        &mut self,
        kind: EnemyKind,
        template: &EnemyTemplate,
        route: Arc<Route>,
    ) -> &Enemy {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.entries.push(Enemy::new(id, kind, template, route));
        &self.entries[self.entries.len() - 1]
    }

    /// Runs the update pass over live enemies, collecting heal pulses.
    pub(crate) fn update(&mut self, dt: Duration, pulses: &mut Vec<HealPulse>) {
        for enemy in self.entries.iter_mut().filter(|enemy| enemy.is_alive()) {
            if let Some(pulse) = enemy.update(dt) {
                pulses.push(pulse);
            }
        }
    }

    pub(crate) fn apply_heal(&mut self, pulse: HealPulse) {
        for enemy in &mut self.entries {
            if enemy.position().distance(pulse.origin) <= pulse.radius {
                enemy.heal(pulse.intensity);
            }
        }
    }

    pub(crate) fn sweep(&mut self) -> usize {
        registry::sweep(&mut self.entries)
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.entries
            .binary_search_by_key(&id, Enemy::id)
            .ok()
            .map(|index| &self.entries[index])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.entries.iter()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Enemy] {
        &mut self.entries
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

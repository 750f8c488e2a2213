//! Coin pickups dropped by dying enemies.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use village_defence_core::{CoinId, CoinSnapshot, IntervalTimer, WorldRect, TILE_SIZE};

use crate::registry::{self, Expiring};

const JUMP: Duration = Duration::from_millis(750);
const LIFETIME: Duration = Duration::from_secs(10);
const GRAVITY: f32 = 500.0;
const HOVER_FREQUENCY: f32 = 4.0;
const HOVER_AMPLITUDE: f32 = 30.0;

#[derive(Clone, Debug)]
pub(crate) struct CoinPickup {
    id: CoinId,
    position: Vec2,
    velocity: Vec2,
    age: f32,
    jumping: bool,
    valid: bool,
    jump_timer: IntervalTimer,
    lifetime: IntervalTimer,
}

impl CoinPickup {
    fn new(id: CoinId, position: Vec2, leftward: bool) -> Self {
        let horizontal = if leftward { -2.0 } else { 2.0 };
        Self {
            id,
            position,
            velocity: Vec2::new(horizontal * TILE_SIZE, -3.0 * TILE_SIZE),
            age: 0.0,
            jumping: true,
            valid: true,
            jump_timer: IntervalTimer::one_shot(JUMP),
            lifetime: IntervalTimer::one_shot(LIFETIME),
        }
    }

    /// Jumps under gravity, then hovers in place until the lifetime runs out.
    fn update(&mut self, dt: Duration) {
        if self.jump_timer.on_update(dt) {
            self.jumping = false;
        }
        if self.lifetime.on_update(dt) {
            self.valid = false;
        }

        let seconds = dt.as_secs_f32();
        self.age += seconds;
        if self.jumping {
            self.velocity.y += GRAVITY * seconds;
        } else {
            self.velocity.x = 0.0;
            self.velocity.y = (self.age * HOVER_FREQUENCY).sin() * HOVER_AMPLITUDE;
        }
        self.position += self.velocity * seconds;
    }

    pub(crate) const fn id(&self) -> CoinId {
        self.id
    }

    pub(crate) const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Collects the pickup if its position lies inside `area`.
    pub(crate) fn collect_within(&mut self, area: WorldRect) -> bool {
        if self.valid && area.contains(self.position) {
            self.valid = false;
            return true;
        }
        false
    }

    pub(crate) fn snapshot(&self) -> CoinSnapshot {
        CoinSnapshot {
            id: self.id,
            position: self.position,
        }
    }
}

impl Expiring for CoinPickup {
    fn can_remove(&self) -> bool {
        !self.valid
    }
}

/// Registry that owns every coin pickup and allocates identifiers.
#[derive(Debug, Default)]
pub(crate) struct CoinRegistry {
    entries: Vec<CoinPickup>,
    next_coin_id: u32,
}

impl CoinRegistry {
    pub(crate) fn spawn<R: Rng>(&mut self, position: Vec2, rng: &mut R) -> CoinId {
        let id = CoinId::new(self.next_coin_id);
        self.next_coin_id = self.next_coin_id.wrapping_add(1);
        self.entries
            .push(CoinPickup::new(id, position, rng.gen_bool(0.5)));
        id
    }

    pub(crate) fn update(&mut self, dt: Duration) {
        for coin in self.entries.iter_mut().filter(|coin| coin.is_valid()) {
            coin.update(dt);
        }
    }

    pub(crate) fn sweep(&mut self) -> usize {
        registry::sweep(&mut self.entries)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &CoinPickup> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut CoinPickup> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn coin_jumps_then_hovers() {
        let mut coin = CoinPickup::new(CoinId::new(0), Vec2::new(100.0, 100.0), false);
        coin.update(Duration::from_millis(100));
        assert!(coin.position.x > 100.0);
        assert!(coin.position.y < 100.0);

        for _ in 0..7 {
            coin.update(Duration::from_millis(100));
        }
        assert!(!coin.jumping);
        assert_eq!(coin.velocity.x, 0.0);
        assert!(coin.velocity.y.abs() <= HOVER_AMPLITUDE);
    }

    #[test]
    fn coin_expires_after_its_lifetime() {
        let mut registry = CoinRegistry::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let _ = registry.spawn(Vec2::ZERO, &mut rng);

        for _ in 0..99 {
            registry.update(Duration::from_millis(100));
        }
        assert_eq!(registry.sweep(), 0);

        registry.update(Duration::from_millis(100));
        assert_eq!(registry.sweep(), 1);
    }

    #[test]
    fn collection_happens_once() {
        let mut coin = CoinPickup::new(CoinId::new(0), Vec2::new(10.0, 10.0), true);
        let area = WorldRect::centered(Vec2::new(0.0, 0.0), Vec2::splat(96.0));
        assert!(coin.collect_within(area));
        assert!(!coin.collect_within(area));
        assert!(coin.can_remove());
    }
}

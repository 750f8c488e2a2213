//! Projectiles in flight and their terminal effects.

use std::time::Duration;

use glam::Vec2;
use village_defence_core::{BulletId, BulletKind, BulletSnapshot, IntervalTimer, WorldRect};

use crate::{
    enemies::Enemy,
    registry::{self, Expiring},
};

const EXPLOSION: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub(crate) struct Bullet {
    id: BulletId,
    kind: BulletKind,
    position: Vec2,
    velocity: Vec2,
    damage: f32,
    valid: bool,
    collidable: bool,
    explosion: Option<IntervalTimer>,
}

impl Bullet {
    pub(crate) fn new(
        id: BulletId,
        kind: BulletKind,
        position: Vec2,
        velocity: Vec2,
        damage: f32,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            velocity,
            damage,
            valid: true,
            collidable: true,
            explosion: None,
        }
    }

    /// Moves a flying projectile, or runs down the explosion of a resolving one.
    ///
    /// A flying projectile expires as soon as its box touches the map edge.
    pub(crate) fn update(&mut self, dt: Duration, bounds: WorldRect) {
        if let Some(explosion) = &mut self.explosion {
            if explosion.on_update(dt) {
                self.valid = false;
            }
            return;
        }

        if !self.collidable {
            return;
        }

        self.position += self.velocity * dt.as_secs_f32();
        let half = self.kind.size() / 2.0;
        let (min, max) = (bounds.min(), bounds.max());
        if self.position.x - half.x <= min.x
            || self.position.x + half.x >= max.x
            || self.position.y - half.y <= min.y
            || self.position.y + half.y >= max.y
        {
            self.valid = false;
        }
    }

    /// Lets the projectile react to the enemy it struck.
    pub(crate) fn on_collide(&mut self, enemy: &mut Enemy) {
        self.collidable = false;
        match self.kind {
            BulletKind::Arrow => self.valid = false,
            BulletKind::Axe => {
                enemy.slow_down();
                self.valid = false;
            }
            BulletKind::Shell => self.explosion = Some(IntervalTimer::one_shot(EXPLOSION)),
        }
    }

    pub(crate) const fn id(&self) -> BulletId {
        self.id
    }

    pub(crate) const fn kind(&self) -> BulletKind {
        self.kind
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) const fn damage(&self) -> f32 {
        self.damage
    }

    pub(crate) const fn is_collidable(&self) -> bool {
        self.valid && self.collidable
    }

    pub(crate) fn snapshot(&self) -> BulletSnapshot {
        BulletSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            velocity: self.velocity,
            damage: self.damage,
            damage_radius: self.kind.damage_radius(),
            collidable: self.is_collidable(),
        }
    }
}

impl Expiring for Bullet {
    fn can_remove(&self) -> bool {
        !self.valid
    }
}

/// Registry that owns every projectile and allocates identifiers.
#[derive(Debug, Default)]
pub(crate) struct BulletRegistry {
    entries: Vec<Bullet>,
    next_bullet_id: u32,
}

impl BulletRegistry {
    pub(crate) fn spawn(
        &mut self,
        kind: BulletKind,
        position: Vec2,
        velocity: Vec2,
        damage: f32,
    ) -> BulletId {
        let id = BulletId::new(self.next_bullet_id);
        self.next_bullet_id = self.next_bullet_id.wrapping_add(1);
        self.entries
            .push(Bullet::new(id, kind, position, velocity, damage));
        id
    }

    pub(crate) fn update(&mut self, dt: Duration, bounds: WorldRect) {
        for bullet in self.entries.iter_mut().filter(|bullet| bullet.valid) {
            bullet.update(dt, bounds);
        }
    }

    pub(crate) fn sweep(&mut self) -> usize {
        registry::sweep(&mut self.entries)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Bullet> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bullet> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use village_defence_core::{
        EnemyId, EnemyKind, EnemyTemplate, Tile, TileDirection, TileIndex, TileMap, TileMarker,
    };

    use crate::grid::Route;

    fn arena() -> WorldRect {
        WorldRect::from_min_size(Vec2::ZERO, Vec2::new(480.0, 480.0))
    }

    fn enemy() -> Enemy {
        let map = TileMap::new(
            1,
            1,
            vec![Tile::new(0, None, TileDirection::None, TileMarker::Home)],
        )
        .expect("valid map");
        let route = Arc::new(Route::compile(&map, TileIndex::new(0, 0)));
        Enemy::new(EnemyId::new(0), EnemyKind::Slime, &EnemyTemplate::default(), route)
    }

    #[test]
    fn flying_bullet_expires_at_the_map_edge() {
        let mut registry = BulletRegistry::default();
        let _ = registry.spawn(
            BulletKind::Arrow,
            Vec2::new(240.0, 240.0),
            Vec2::new(288.0, 0.0),
            25.0,
        );

        registry.update(Duration::from_millis(500), arena());
        assert_eq!(registry.sweep(), 0);

        registry.update(Duration::from_millis(300), arena());
        assert_eq!(registry.sweep(), 1);
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn arrow_is_spent_on_impact() {
        let mut bullet = Bullet::new(BulletId::new(0), BulletKind::Arrow, Vec2::ZERO, Vec2::X, 5.0);
        let mut target = enemy();
        bullet.on_collide(&mut target);
        assert!(bullet.can_remove());
        assert!(!bullet.is_collidable());
    }

    #[test]
    fn axe_slows_its_target() {
        let mut bullet = Bullet::new(BulletId::new(0), BulletKind::Axe, Vec2::ZERO, Vec2::X, 5.0);
        let mut target = enemy();
        bullet.on_collide(&mut target);
        assert!(bullet.can_remove());

        assert_eq!(target.snapshot().speed, 0.5);
    }

    #[test]
    fn shell_resolves_for_half_a_second_without_moving() {
        let start = Vec2::new(240.0, 240.0);
        let mut bullet = Bullet::new(BulletId::new(0), BulletKind::Shell, start, Vec2::X * 100.0, 5.0);
        let mut target = enemy();
        bullet.on_collide(&mut target);
        assert!(!bullet.can_remove());
        assert!(!bullet.is_collidable());

        bullet.update(Duration::from_millis(400), arena());
        assert_eq!(bullet.position(), start);
        assert!(!bullet.can_remove());

        bullet.update(Duration::from_millis(100), arena());
        assert!(bullet.can_remove());
    }
}

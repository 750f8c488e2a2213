//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use village_defence_core::{EnemyId, Facing, IntervalTimer, TileIndex, TowerId, TowerKind};

/// State of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Tile the tower stands on.
    pub(crate) tile: TileIndex,
    /// Orientation after the most recent shot.
    pub(crate) facing: Facing,
    /// Enemy targeted by the most recent shot.
    pub(crate) target: Option<EnemyId>,
    cooldown: IntervalTimer,
    ready: bool,
}

impl TowerState {
    fn new(id: TowerId, kind: TowerKind, tile: TileIndex) -> Self {
        Self {
            id,
            kind,
            tile,
            facing: Facing::default(),
            target: None,
            cooldown: IntervalTimer::one_shot(Duration::ZERO),
            ready: true,
        }
    }

    /// World position of the tower, the centre of its tile.
    pub(crate) fn position(&self) -> Vec2 {
        self.tile.center()
    }

    pub(crate) const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Time left before the tower may fire again.
    pub(crate) fn ready_in(&self) -> Duration {
        if self.ready {
            Duration::ZERO
        } else {
            self.cooldown.remaining()
        }
    }

    fn update(&mut self, dt: Duration) {
        if self.cooldown.on_update(dt) {
            self.ready = true;
        }
    }

    /// Re-arms the cooldown with `interval` and turns toward the shot.
    pub(crate) fn fire(&mut self, interval: Duration, target: EnemyId, direction: Vec2) {
        self.ready = false;
        self.cooldown.set_wait_time(interval);
        self.cooldown.restart();
        self.facing = Facing::dominant_axis(direction);
        self.target = Some(target);
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, kind: TowerKind, tile: TileIndex) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(id, TowerState::new(id, kind, tile));
        id
    }

    pub(crate) fn update(&mut self, dt: Duration) {
        for tower in self.entries.values_mut() {
            tower.update(dt);
        }
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_tower_id.get(), 0);
    }

    #[test]
    fn identifiers_follow_placement_order() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerKind::Archer, TileIndex::new(1, 1));
        let second = registry.insert(TowerKind::Gunner, TileIndex::new(2, 1));

        assert!(first < second);
        let kinds: Vec<_> = registry.iter().map(|tower| tower.kind).collect();
        assert_eq!(kinds, vec![TowerKind::Archer, TowerKind::Gunner]);
    }

    #[test]
    fn cooldown_blocks_until_interval_elapses() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(TowerKind::Archer, TileIndex::new(0, 0));
        let tower = registry.get_mut(id).expect("tower");
        assert!(tower.is_ready());

        tower.fire(Duration::from_secs(1), EnemyId::new(3), Vec2::new(0.0, -2.0));
        assert!(!tower.is_ready());
        assert_eq!(tower.facing, Facing::Up);
        assert_eq!(tower.ready_in(), Duration::from_secs(1));

        registry.update(Duration::from_millis(600));
        assert_eq!(
            registry.get_mut(id).map(|tower| tower.ready_in()),
            Some(Duration::from_millis(400))
        );
        registry.update(Duration::from_millis(400));
        assert!(registry.get_mut(id).is_some_and(|tower| tower.is_ready()));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks tower targets from world snapshots.

use glam::Vec2;
use village_defence_core::{EnemyId, EnemyView, TowerId, TowerTarget, TowerView};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower picks the enemy inside its view radius that has walked the
    /// largest share of its route. Ties keep the enemy seen first, which is
    /// the oldest one because enemy views are sorted by identifier. The
    /// output buffer is cleared before populating it with the latest
    /// assignments.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in &self.tower_workspace {
            let max_distance = tower.view_radius * tower.view_radius;
            let mut best: Option<&EnemyCandidate> = None;
            let mut best_progress = -1.0;

            for candidate in &self.enemy_workspace {
                if candidate.position.distance_squared(tower.position) > max_distance {
                    continue;
                }

                if candidate.progress > best_progress {
                    best_progress = candidate.progress;
                    best = Some(candidate);
                }
            }

            if let Some(candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                    tower_position: tower.position,
                    enemy_position: candidate.position,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        let (lower, _) = towers.iter().size_hint();
        self.tower_workspace.reserve(lower);

        for snapshot in towers.iter() {
            if snapshot.view_radius.is_nan() || snapshot.view_radius < 0.0 {
                continue;
            }

            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                position: snapshot.position,
                view_radius: snapshot.view_radius,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                progress: snapshot.route_progress,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    position: Vec2,
    view_radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
    progress: f32,
}

#[cfg(test)]
mod tests {
    use super::{TowerTarget, TowerTargeting};
    use glam::Vec2;
    use village_defence_core::{
        EnemyId, EnemyKind, EnemySnapshot, EnemyView, Facing, TileIndex, TowerId, TowerKind,
        TowerSnapshot, TowerView,
    };

    fn tower_view(snapshots: Vec<TowerSnapshot>) -> TowerView {
        TowerView::from_snapshots(snapshots)
    }

    fn enemy_view(snapshots: Vec<EnemySnapshot>) -> EnemyView {
        EnemyView::from_snapshots(snapshots)
    }

    fn tower_snapshot(id: u32, tile: (u32, u32), view_radius: f32) -> TowerSnapshot {
        let tile = TileIndex::new(tile.0, tile.1);
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Archer,
            tile,
            position: tile.center(),
            level: 0,
            facing: Facing::Right,
            view_radius,
            target: None,
        }
    }

    fn enemy_snapshot(id: u32, position: (f32, f32), route_progress: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Slime,
            position: Vec2::new(position.0, position.1),
            velocity: Vec2::ZERO,
            size: Vec2::splat(48.0),
            hp: 100.0,
            max_hp: 100.0,
            speed: 1.0,
            route_progress,
            hit_flash: false,
        }
    }

    #[test]
    fn targets_enemy_within_range() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (2, 2), 240.0)]);
        let enemies = enemy_view(vec![enemy_snapshot(2, (200.0, 120.0), 0.25)]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(2),
                tower_position: Vec2::new(120.0, 120.0),
                enemy_position: Vec2::new(200.0, 120.0),
            }]
        );
    }

    #[test]
    fn enemy_outside_range_is_ignored() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0, 0), 240.0)]);
        let enemies = enemy_view(vec![enemy_snapshot(2, (600.0, 600.0), 0.9)]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0, 0), 96.0)]);
        let enemies = enemy_view(vec![enemy_snapshot(2, (120.0, 24.0), 0.0)]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
    }

    #[test]
    fn furthest_along_enemy_wins_over_closer_ones() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (2, 2), 240.0)]);
        let enemies = enemy_view(vec![
            enemy_snapshot(1, (125.0, 120.0), 0.2),
            enemy_snapshot(2, (300.0, 120.0), 0.6),
            enemy_snapshot(3, (900.0, 120.0), 1.0),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn progress_ties_keep_the_first_enemy() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (2, 2), 240.0)]);
        let enemies = enemy_view(vec![
            enemy_snapshot(7, (100.0, 120.0), 0.5),
            enemy_snapshot(3, (150.0, 120.0), 0.5),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out[0].enemy, EnemyId::new(3));
    }

    #[test]
    fn zero_progress_enemy_is_still_targeted() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (2, 2), 240.0)]);
        let enemies = enemy_view(vec![enemy_snapshot(4, (120.0, 120.0), 0.0)]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
    }

    #[test]
    fn each_tower_chooses_independently() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![
            tower_snapshot(1, (0, 0), 96.0),
            tower_snapshot(2, (10, 0), 96.0),
        ]);
        let enemies = enemy_view(vec![
            enemy_snapshot(1, (24.0, 60.0), 0.1),
            enemy_snapshot(2, (504.0, 60.0), 0.9),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        let pairs: Vec<_> = out.iter().map(|target| (target.tower, target.enemy)).collect();
        assert_eq!(
            pairs,
            vec![
                (TowerId::new(1), EnemyId::new(1)),
                (TowerId::new(2), EnemyId::new(2)),
            ]
        );
    }

    #[test]
    fn stale_targets_are_cleared() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0, 0), 96.0)]);
        let enemies = enemy_view(Vec::new());

        let mut out = vec![TowerTarget {
            tower: TowerId::new(99),
            enemy: EnemyId::new(99),
            tower_position: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }];

        system.handle(&towers, &enemies, &mut out);
        assert!(out.is_empty());
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns tower targets into firing commands.
//!
//! A tower fires only when its cooldown has fully elapsed and the targeting
//! pass found an enemy for it. Shots are issued in tower identifier order so
//! that replays of the same world produce the same projectile identifiers.

use village_defence_core::{Command, TowerCooldownView, TowerId, TowerTarget};

/// Tower combat system that reuses its scratch buffers between ticks.
#[derive(Debug, Default)]
pub struct TowerCombat {
    ready: Vec<TowerId>,
    shots: Vec<TowerTarget>,
}

impl TowerCombat {
    /// Creates a combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `Command::FireProjectile` per ready, targeted tower.
    ///
    /// Towers still cooling down, or missing from the cooldown view, keep
    /// their target for a later tick without firing. A tower listed more than
    /// once fires at its first target only.
    pub fn handle(
        &mut self,
        tower_cooldowns: TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        self.ready.clear();
        self.ready.extend(
            tower_cooldowns
                .iter()
                .filter(|snapshot| snapshot.ready_in.is_zero())
                .map(|snapshot| snapshot.tower),
        );
        if self.ready.is_empty() {
            return;
        }

        self.shots.clear();
        self.shots.extend(
            tower_targets
                .iter()
                .filter(|target| self.ready.binary_search(&target.tower).is_ok())
                .copied(),
        );
        self.shots.sort_by_key(|target| target.tower);
        self.shots.dedup_by_key(|target| target.tower);

        out.extend(self.shots.iter().map(|shot| Command::FireProjectile {
            tower: shot.tower,
            target: shot.enemy,
        }));
    }
}

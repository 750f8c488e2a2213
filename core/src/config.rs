//! Immutable configuration snapshot assembled once at startup.

use std::time::Duration;

use crate::{
    duration_from_secs, EnemyKind, SpawnPointId, TowerKind, MAX_TOWER_LEVEL, TOWER_LEVELS,
    UPGRADE_STEPS,
};

/// Window parameters consumed by presentation adapters.
#[derive(Clone, Debug, PartialEq)]
pub struct BasicTemplate {
    /// Title displayed by the host window.
    pub window_title: String,
    /// Requested window width in pixels.
    pub window_width: u32,
    /// Requested window height in pixels.
    pub window_height: u32,
}

impl Default for BasicTemplate {
    fn default() -> Self {
        Self {
            window_title: String::from("Village Defence"),
            window_width: 1280,
            window_height: 720,
        }
    }
}

/// Movement and ability tuning for the player avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerTemplate {
    /// Movement speed expressed in tiles per second.
    pub speed: f32,
    /// Cooldown between flash releases in seconds.
    pub normal_attack_interval: f32,
    /// Flash damage dealt per second of exposure.
    pub normal_attack_damage: f32,
    /// Seconds needed to regenerate a full mana bar.
    pub skill_interval: f32,
    /// Impact damage dealt per second of exposure.
    pub skill_damage: f32,
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        Self {
            speed: 3.0,
            normal_attack_interval: 0.5,
            normal_attack_damage: 0.0,
            skill_interval: 10.0,
            skill_damage: 1.0,
        }
    }
}

/// Per-level statistics shared by every tower of one kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTemplate {
    /// Seconds between shots for each level.
    pub interval: [f32; TOWER_LEVELS],
    /// Damage carried by each projectile for each level.
    pub damage: [f32; TOWER_LEVELS],
    /// Targeting radius in tiles for each level.
    pub view_range: [f32; TOWER_LEVELS],
    /// Placement cost while the kind sits at each level.
    pub cost: [f64; TOWER_LEVELS],
    /// Cost of raising the kind from each level to the next.
    pub upgrade_cost: [f64; UPGRADE_STEPS],
}

impl Default for TowerTemplate {
    fn default() -> Self {
        Self {
            interval: [1.0; TOWER_LEVELS],
            damage: [25.0; TOWER_LEVELS],
            view_range: [5.0; TOWER_LEVELS],
            cost: [50.0; TOWER_LEVELS],
            upgrade_cost: [75.0; UPGRADE_STEPS],
        }
    }
}

impl TowerTemplate {
    /// Fire cooldown at the provided level.
    #[must_use]
    pub fn interval(&self, level: u8) -> Duration {
        duration_from_secs(self.interval[level_index(level)])
    }

    /// Projectile damage at the provided level.
    #[must_use]
    pub fn damage(&self, level: u8) -> f32 {
        self.damage[level_index(level)]
    }

    /// Targeting radius in tiles at the provided level.
    #[must_use]
    pub fn view_range(&self, level: u8) -> f32 {
        self.view_range[level_index(level)]
    }

    /// Placement cost at the provided level.
    #[must_use]
    pub fn cost(&self, level: u8) -> f64 {
        self.cost[level_index(level)]
    }

    /// Upgrade cost from the provided level, or `None` once fully upgraded.
    #[must_use]
    pub fn upgrade_cost(&self, level: u8) -> Option<f64> {
        self.upgrade_cost.get(usize::from(level)).copied()
    }
}

fn level_index(level: u8) -> usize {
    usize::from(level.min(MAX_TOWER_LEVEL))
}

/// Scalar statistics applied to every spawned enemy of one kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyTemplate {
    /// Starting and maximum hit points.
    pub hp: f32,
    /// Base movement speed in tiles per second.
    pub speed: f32,
    /// Damage dealt to the home on arrival.
    pub damage: f32,
    /// Probability in `[0, 1]` of dropping a coin on death.
    pub reward_ratio: f32,
    /// Seconds between heal pulses.
    pub recover_interval: f32,
    /// Heal pulse radius in tiles; negative disables healing.
    pub recover_range: f32,
    /// Hit points restored per pulse.
    pub recover_intensity: f32,
}

impl Default for EnemyTemplate {
    fn default() -> Self {
        Self {
            hp: 100.0,
            speed: 1.0,
            damage: 1.0,
            reward_ratio: 0.5,
            recover_interval: 10.0,
            recover_range: 0.0,
            recover_intensity: 25.0,
        }
    }
}

/// Complete tuning snapshot handed to the world at construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameConfig {
    /// Window parameters.
    pub basic: BasicTemplate,
    /// Player avatar tuning.
    pub player: PlayerTemplate,
    /// Archer tower statistics.
    pub archer: TowerTemplate,
    /// Axeman tower statistics.
    pub axeman: TowerTemplate,
    /// Gunner tower statistics.
    pub gunner: TowerTemplate,
    /// Slime statistics.
    pub slime: EnemyTemplate,
    /// King slime statistics.
    pub king_slime: EnemyTemplate,
    /// Skeleton statistics.
    pub skeleton: EnemyTemplate,
    /// Goblin statistics.
    pub goblin: EnemyTemplate,
    /// Goblin priest statistics.
    pub goblin_priest: EnemyTemplate,
}

impl GameConfig {
    /// Statistics for the provided tower kind.
    #[must_use]
    pub fn tower(&self, kind: TowerKind) -> &TowerTemplate {
        match kind {
            TowerKind::Archer => &self.archer,
            TowerKind::Axeman => &self.axeman,
            TowerKind::Gunner => &self.gunner,
        }
    }

    /// Mutable statistics for the provided tower kind.
    pub fn tower_mut(&mut self, kind: TowerKind) -> &mut TowerTemplate {
        match kind {
            TowerKind::Archer => &mut self.archer,
            TowerKind::Axeman => &mut self.axeman,
            TowerKind::Gunner => &mut self.gunner,
        }
    }

    /// Statistics for the provided enemy kind.
    #[must_use]
    pub fn enemy(&self, kind: EnemyKind) -> &EnemyTemplate {
        match kind {
            EnemyKind::Slime => &self.slime,
            EnemyKind::KingSlime => &self.king_slime,
            EnemyKind::Skeleton => &self.skeleton,
            EnemyKind::Goblin => &self.goblin,
            EnemyKind::GoblinPriest => &self.goblin_priest,
        }
    }

    /// Mutable statistics for the provided enemy kind.
    pub fn enemy_mut(&mut self, kind: EnemyKind) -> &mut EnemyTemplate {
        match kind {
            EnemyKind::Slime => &mut self.slime,
            EnemyKind::KingSlime => &mut self.king_slime,
            EnemyKind::Skeleton => &mut self.skeleton,
            EnemyKind::Goblin => &mut self.goblin,
            EnemyKind::GoblinPriest => &mut self.goblin_priest,
        }
    }
}

/// Single timed spawn inside a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnEvent {
    /// Delay measured from the previous spawn, or from the wave start.
    pub delay: Duration,
    /// Spawn point whose route the enemy follows.
    pub spawn_point: SpawnPointId,
    /// Kind of enemy to create.
    pub enemy: EnemyKind,
}

/// Timed batch of spawns sharing one completion reward.
#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    /// Coins credited once every enemy of the wave is gone.
    pub reward: f64,
    /// Delay before the first spawn timer is armed.
    pub start_delay: Duration,
    /// Spawns in the order they occur.
    pub spawn_events: Vec<SpawnEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_cost_is_absent_at_max_level() {
        let template = TowerTemplate::default();
        assert_eq!(template.upgrade_cost(0), Some(75.0));
        assert_eq!(template.upgrade_cost(8), Some(75.0));
        assert_eq!(template.upgrade_cost(MAX_TOWER_LEVEL), None);
    }

    #[test]
    fn level_lookups_saturate_past_max_level() {
        let mut template = TowerTemplate::default();
        template.damage[9] = 99.0;
        assert_eq!(template.damage(42), 99.0);
    }

    #[test]
    fn templates_are_selected_by_kind() {
        let mut config = GameConfig::default();
        config.tower_mut(TowerKind::Gunner).cost[0] = 120.0;
        config.enemy_mut(EnemyKind::GoblinPriest).recover_range = 2.0;

        assert_eq!(config.tower(TowerKind::Gunner).cost(0), 120.0);
        assert_eq!(config.tower(TowerKind::Archer).cost(0), 50.0);
        assert_eq!(config.enemy(EnemyKind::GoblinPriest).recover_range, 2.0);
        assert_eq!(config.enemy(EnemyKind::Goblin).recover_range, 0.0);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave state machine responsible for emitting enemy spawn commands.
//!
//! The scheduler waits out each wave's start delay, then releases the wave's
//! spawns one at a time. Once the last spawn of a wave has been released and
//! the map is clear, [`WaveScheduler::poll`] credits the wave reward and
//! either arms the next wave or declares victory.

use std::time::Duration;

use tracing::{debug, info};
use village_defence_core::{Command, IntervalTimer, SpawnEvent, Wave};

/// Stage of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// Counting down the current wave's start delay.
    AwaitingWaveStart,
    /// Releasing the current wave's spawns.
    Spawning,
    /// Every wave was cleared.
    Won,
}

/// Sequences timed enemy spawns into waves.
#[derive(Debug)]
pub struct WaveScheduler {
    waves: Vec<Wave>,
    phase: WavePhase,
    wave_index: usize,
    event_index: usize,
    last_spawned: bool,
    start_timer: IntervalTimer,
    spawn_timer: IntervalTimer,
}

impl WaveScheduler {
    /// Creates a scheduler that arms the first wave's start delay.
    #[must_use]
    pub fn new(waves: Vec<Wave>) -> Self {
        let start_delay = waves.first().map_or(Duration::ZERO, |wave| wave.start_delay);
        Self {
            waves,
            phase: WavePhase::AwaitingWaveStart,
            wave_index: 0,
            event_index: 0,
            last_spawned: false,
            start_timer: IntervalTimer::one_shot(start_delay),
            spawn_timer: IntervalTimer::one_shot(Duration::ZERO),
        }
    }

    /// Advances the wave timers, emitting at most one spawn per call.
    pub fn handle(&mut self, dt: Duration, out: &mut Vec<Command>) {
        match self.phase {
            WavePhase::AwaitingWaveStart => {
                if self.waves.is_empty() || !self.start_timer.on_update(dt) {
                    return;
                }
                self.begin_spawning();
            }
            WavePhase::Spawning => {
                if self.last_spawned || !self.spawn_timer.on_update(dt) {
                    return;
                }
                if let Some(event) = self.current_event() {
                    out.push(Command::SpawnEnemy {
                        kind: event.enemy,
                        spawn_point: event.spawn_point,
                    });
                }
                self.event_index += 1;
                self.arm_next_spawn();
            }
            WavePhase::Won => {}
        }
    }

    /// Checks for wave completion against the enemy registry's emptiness.
    pub fn poll(&mut self, enemies_cleared: bool, out: &mut Vec<Command>) {
        if self.phase == WavePhase::Won {
            return;
        }
        if self.waves.is_empty() {
            self.phase = WavePhase::Won;
            out.push(Command::DeclareVictory);
            return;
        }
        if self.phase != WavePhase::Spawning || !self.last_spawned || !enemies_cleared {
            return;
        }

        let reward = self.waves.get(self.wave_index).map_or(0.0, |wave| wave.reward);
        out.push(Command::CreditCoins { amount: reward });
        info!(wave = self.wave_index + 1, reward, "wave cleared");

        self.wave_index += 1;
        let Some(next) = self.waves.get(self.wave_index) else {
            self.phase = WavePhase::Won;
            info!(waves = self.waves.len(), "all waves cleared");
            out.push(Command::DeclareVictory);
            return;
        };

        self.start_timer.set_wait_time(next.start_delay);
        self.start_timer.restart();
        self.event_index = 0;
        self.last_spawned = false;
        self.phase = WavePhase::AwaitingWaveStart;
    }

    /// Current stage of the state machine.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Zero-based index of the wave in progress; equals the wave count once won.
    #[must_use]
    pub const fn wave_index(&self) -> usize {
        self.wave_index
    }

    /// Number of loaded waves.
    #[must_use]
    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    /// Reports whether the current wave has released every spawn.
    #[must_use]
    pub const fn last_enemy_spawned(&self) -> bool {
        self.last_spawned
    }

    fn begin_spawning(&mut self) {
        self.phase = WavePhase::Spawning;
        self.event_index = 0;
        self.last_spawned = false;
        debug!(wave = self.wave_index + 1, "wave started");
        self.arm_next_spawn();
    }

    fn arm_next_spawn(&mut self) {
        match self.current_event() {
            Some(event) => {
                self.spawn_timer.set_wait_time(event.delay);
                self.spawn_timer.restart();
            }
            None => self.last_spawned = true,
        }
    }

    fn current_event(&self) -> Option<SpawnEvent> {
        self.waves
            .get(self.wave_index)
            .and_then(|wave| wave.spawn_events.get(self.event_index))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use village_defence_core::{EnemyKind, SpawnPointId};

    fn spawn(delay_ms: u64, enemy: EnemyKind) -> SpawnEvent {
        SpawnEvent {
            delay: Duration::from_millis(delay_ms),
            spawn_point: SpawnPointId::new(1),
            enemy,
        }
    }

    fn wave(reward: f64, start_ms: u64, spawn_events: Vec<SpawnEvent>) -> Wave {
        Wave {
            reward,
            start_delay: Duration::from_millis(start_ms),
            spawn_events,
        }
    }

    #[test]
    fn start_delay_gates_the_first_spawn() {
        let mut scheduler = WaveScheduler::new(vec![wave(
            10.0,
            1_000,
            vec![spawn(0, EnemyKind::Goblin)],
        )]);
        let mut out = Vec::new();

        scheduler.handle(Duration::from_millis(900), &mut out);
        assert_eq!(scheduler.phase(), WavePhase::AwaitingWaveStart);

        scheduler.handle(Duration::from_millis(100), &mut out);
        assert_eq!(scheduler.phase(), WavePhase::Spawning);
        assert!(out.is_empty());

        scheduler.handle(Duration::from_millis(16), &mut out);
        assert_eq!(
            out,
            vec![Command::SpawnEnemy {
                kind: EnemyKind::Goblin,
                spawn_point: SpawnPointId::new(1),
            }]
        );
        assert!(scheduler.last_enemy_spawned());
    }

    #[test]
    fn large_steps_release_one_spawn_per_call() {
        let mut scheduler = WaveScheduler::new(vec![wave(
            0.0,
            0,
            vec![spawn(100, EnemyKind::Slime); 3],
        )]);
        let mut out = Vec::new();

        for _ in 0..4 {
            scheduler.handle(Duration::from_secs(5), &mut out);
        }

        assert_eq!(out.len(), 3);
        assert!(scheduler.last_enemy_spawned());
    }

    #[test]
    fn completion_waits_for_a_clear_map() {
        let mut scheduler = WaveScheduler::new(vec![
            wave(25.0, 0, vec![spawn(0, EnemyKind::Slime)]),
            wave(40.0, 500, vec![spawn(0, EnemyKind::Skeleton)]),
        ]);
        let mut out = Vec::new();

        scheduler.handle(Duration::from_millis(10), &mut out);
        scheduler.handle(Duration::from_millis(10), &mut out);
        out.clear();

        scheduler.poll(false, &mut out);
        assert!(out.is_empty());

        scheduler.poll(true, &mut out);
        assert_eq!(out, vec![Command::CreditCoins { amount: 25.0 }]);
        assert_eq!(scheduler.phase(), WavePhase::AwaitingWaveStart);
        assert_eq!(scheduler.wave_index(), 1);

        out.clear();
        scheduler.poll(true, &mut out);
        assert!(out.is_empty(), "reward must be credited once");
    }

    #[test]
    fn clear_map_before_the_last_spawn_does_not_complete() {
        let mut scheduler = WaveScheduler::new(vec![wave(
            5.0,
            0,
            vec![spawn(0, EnemyKind::Slime), spawn(1_000, EnemyKind::Slime)],
        )]);
        let mut out = Vec::new();

        scheduler.handle(Duration::from_millis(10), &mut out);
        scheduler.handle(Duration::from_millis(10), &mut out);
        scheduler.poll(true, &mut out);

        assert_eq!(out.len(), 1);
        assert!(!scheduler.last_enemy_spawned());
    }

    #[test]
    fn no_waves_is_an_immediate_victory() {
        let mut scheduler = WaveScheduler::new(Vec::new());
        let mut out = Vec::new();

        scheduler.handle(Duration::from_secs(1), &mut out);
        scheduler.poll(true, &mut out);
        scheduler.poll(true, &mut out);

        assert_eq!(out, vec![Command::DeclareVictory]);
        assert_eq!(scheduler.phase(), WavePhase::Won);
    }
}

//! Running totals printed once a headless match stops.

use std::{fmt, time::Duration};

use village_defence_core::{Event, GameOutcome};

/// Event counts accumulated across ticks.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MatchSummary {
    pub(crate) elapsed: Duration,
    pub(crate) spawned: usize,
    pub(crate) killed: usize,
    pub(crate) leaked: usize,
    pub(crate) shots: usize,
    pub(crate) coins_dropped: usize,
    pub(crate) coins_collected: usize,
    pub(crate) outcome: GameOutcome,
    pub(crate) balance: f64,
    pub(crate) home_hp: f32,
}

impl MatchSummary {
    /// Folds one tick's events into the totals.
    pub(crate) fn record(&mut self, dt: Duration, events: &[Event]) {
        self.elapsed += dt;
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.spawned += 1,
                Event::EnemyKilled { .. } => self.killed += 1,
                Event::EnemyReachedHome { .. } => self.leaked += 1,
                Event::ProjectileFired { .. } => self.shots += 1,
                Event::CoinDropped { .. } => self.coins_dropped += 1,
                Event::CoinCollected { .. } => self.coins_collected += 1,
                Event::CoinsChanged { balance } => self.balance = *balance,
                Event::HomeDamaged { hp } => self.home_hp = *hp,
                Event::GameOver { outcome } => self.outcome = *outcome,
                _ => {}
            }
        }
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.outcome {
            GameOutcome::InProgress => "unfinished",
            GameOutcome::Victory => "victory",
            GameOutcome::Defeat => "defeat",
        };
        writeln!(f, "outcome:   {outcome} after {:.1}s", self.elapsed.as_secs_f32())?;
        writeln!(
            f,
            "enemies:   {} spawned, {} killed, {} reached home",
            self.spawned, self.killed, self.leaked
        )?;
        writeln!(f, "shots:     {}", self.shots)?;
        writeln!(
            f,
            "coins:     {} dropped, {} collected, balance {}",
            self.coins_dropped, self.coins_collected, self.balance
        )?;
        write!(f, "home hp:   {}", self.home_hp)
    }
}

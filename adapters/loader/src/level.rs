//! Level document reader.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use village_defence_core::{duration_from_secs, EnemyKind, SpawnEvent, SpawnPointId, Wave};

use crate::{lenient, LoadError};

const DEFAULT_SPAWN_POINT: i32 = 1;

#[derive(Debug, Deserialize)]
struct WaveEntry {
    #[serde(default, deserialize_with = "lenient::number")]
    rewards: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    interval: Option<f64>,
    #[serde(default, deserialize_with = "lenient::objects")]
    spawn_list: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SpawnEntry {
    #[serde(default, deserialize_with = "lenient::number")]
    interval: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    point: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    enemy: Option<String>,
}

/// Parses a level document into its playable waves.
///
/// Waves without a single spawn are dropped; a document left without any
/// wave is rejected.
pub fn parse_level(text: &str) -> Result<Vec<Wave>, LoadError> {
    let Value::Array(entries) = serde_json::from_str::<Value>(text)? else {
        return Err(LoadError::LevelNotArray);
    };

    let mut waves = Vec::new();
    for (index, entry) in lenient::only_objects(entries).into_iter().enumerate() {
        let entry: WaveEntry = serde_json::from_value(entry)?;
        let spawn_events = entry
            .spawn_list
            .into_iter()
            .map(|event| serde_json::from_value(event).map(spawn_event))
            .collect::<Result<Vec<_>, _>>()?;

        if spawn_events.is_empty() {
            warn!(wave = index + 1, "dropping wave without spawns");
            continue;
        }

        waves.push(Wave {
            reward: entry.rewards.unwrap_or(0.0),
            start_delay: seconds(entry.interval),
            spawn_events,
        });
    }

    if waves.is_empty() {
        return Err(LoadError::NoWaves);
    }
    debug!(waves = waves.len(), "level loaded");
    Ok(waves)
}

fn spawn_event(entry: SpawnEntry) -> SpawnEvent {
    let enemy = match entry.enemy.as_deref() {
        Some(name) => EnemyKind::from_name(name).unwrap_or_else(|| {
            warn!(name, "unknown enemy name, spawning a slime");
            EnemyKind::default()
        }),
        None => EnemyKind::default(),
    };

    SpawnEvent {
        delay: seconds(entry.interval),
        spawn_point: SpawnPointId::new(
            entry.point.map_or(DEFAULT_SPAWN_POINT, |point| point as i32),
        ),
        enemy,
    }
}

fn seconds(value: Option<f64>) -> std::time::Duration {
    duration_from_secs(value.unwrap_or(0.0) as f32)
}

//! Tuning document reader.
//!
//! Every field is optional: absent or mistyped values keep the built-in
//! defaults of [`GameConfig`]. Per-level arrays overwrite the defaults slot by
//! slot and anything past the last level is ignored.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use village_defence_core::{
    BasicTemplate, EnemyKind, EnemyTemplate, GameConfig, PlayerTemplate, TowerKind, TowerTemplate,
};

use crate::{lenient, LoadError};

const BASIC: &str = "basic";
const PLAYER: &str = "player";
const TOWER: &str = "tower";
const ENEMY: &str = "enemy";

#[derive(Debug, Deserialize)]
struct BasicSection {
    #[serde(default, deserialize_with = "lenient::text")]
    window_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    window_width: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    window_height: Option<f64>,
}

impl BasicSection {
    fn apply(self, template: &mut BasicTemplate) {
        if let Some(title) = self.window_title {
            template.window_title = title;
        }
        set(&mut template.window_width, self.window_width, |value| value as u32);
        set(&mut template.window_height, self.window_height, |value| value as u32);
    }
}

#[derive(Debug, Deserialize)]
struct PlayerSection {
    #[serde(default, deserialize_with = "lenient::number")]
    speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    normal_attack_interval: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    normal_attack_damage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    skill_interval: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    skill_damage: Option<f64>,
}

impl PlayerSection {
    fn apply(self, template: &mut PlayerTemplate) {
        set(&mut template.speed, self.speed, narrow);
        set(
            &mut template.normal_attack_interval,
            self.normal_attack_interval,
            narrow,
        );
        set(
            &mut template.normal_attack_damage,
            self.normal_attack_damage,
            narrow,
        );
        set(&mut template.skill_interval, self.skill_interval, narrow);
        set(&mut template.skill_damage, self.skill_damage, narrow);
    }
}

#[derive(Debug, Deserialize)]
struct TowerSection {
    #[serde(default, deserialize_with = "lenient::numbers")]
    interval: Option<Vec<Option<f64>>>,
    #[serde(default, deserialize_with = "lenient::numbers")]
    damage: Option<Vec<Option<f64>>>,
    #[serde(default, deserialize_with = "lenient::numbers")]
    view_range: Option<Vec<Option<f64>>>,
    #[serde(default, deserialize_with = "lenient::numbers")]
    cost: Option<Vec<Option<f64>>>,
    #[serde(default, deserialize_with = "lenient::numbers")]
    upgrade_cost: Option<Vec<Option<f64>>>,
}

impl TowerSection {
    fn apply(self, template: &mut TowerTemplate) {
        overwrite(&mut template.interval, self.interval, narrow);
        overwrite(&mut template.damage, self.damage, narrow);
        overwrite(&mut template.view_range, self.view_range, narrow);
        overwrite(&mut template.cost, self.cost, |value| value);
        overwrite(&mut template.upgrade_cost, self.upgrade_cost, |value| value);
    }
}

#[derive(Debug, Deserialize)]
struct EnemySection {
    #[serde(default, deserialize_with = "lenient::number")]
    hp: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    damage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    reward_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    recover_interval: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    recover_range: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    recover_intensity: Option<f64>,
}

impl EnemySection {
    fn apply(self, template: &mut EnemyTemplate) {
        set(&mut template.hp, self.hp, narrow);
        set(&mut template.speed, self.speed, narrow);
        set(&mut template.damage, self.damage, narrow);
        set(&mut template.reward_ratio, self.reward_ratio, narrow);
        set(&mut template.recover_interval, self.recover_interval, narrow);
        set(&mut template.recover_range, self.recover_range, narrow);
        set(&mut template.recover_intensity, self.recover_intensity, narrow);
    }
}

/// Parses a tuning document on top of the built-in defaults.
pub fn parse_config(text: &str) -> Result<GameConfig, LoadError> {
    let Value::Object(root) = serde_json::from_str::<Value>(text)? else {
        return Err(LoadError::ConfigNotObject);
    };

    let basic = section(&root, BASIC)?;
    let player = section(&root, PLAYER)?;
    let towers = section(&root, TOWER)?;
    let enemies = section(&root, ENEMY)?;

    let mut config = GameConfig::default();
    parse::<BasicSection>(basic)?.apply(&mut config.basic);
    parse::<PlayerSection>(player)?.apply(&mut config.player);

    for kind in TowerKind::ALL {
        if let Some(entry) = entry(towers, kind.config_key()) {
            parse::<TowerSection>(entry)?.apply(config.tower_mut(kind));
        }
    }
    for kind in EnemyKind::ALL {
        if let Some(entry) = entry(enemies, kind.config_key()) {
            parse::<EnemySection>(entry)?.apply(config.enemy_mut(kind));
        }
    }

    debug!(title = %config.basic.window_title, "config loaded");
    Ok(config)
}

fn section<'a>(
    root: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Map<String, Value>, LoadError> {
    root.get(name)
        .and_then(Value::as_object)
        .ok_or(LoadError::MissingSection(name))
}

fn entry<'a>(section: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    let value = section.get(key)?;
    let entry = value.as_object();
    if entry.is_none() {
        warn!(key, "ignoring non-object config entry");
    }
    entry
}

fn parse<T: DeserializeOwned>(object: &Map<String, Value>) -> Result<T, LoadError> {
    Ok(serde_json::from_value(Value::Object(object.clone()))?)
}

fn set<T>(slot: &mut T, value: Option<f64>, convert: impl Fn(f64) -> T) {
    if let Some(value) = value {
        *slot = convert(value);
    }
}

fn overwrite<T>(slots: &mut [T], values: Option<Vec<Option<f64>>>, convert: impl Fn(f64) -> T) {
    let Some(values) = values else {
        return;
    };
    if values.len() > slots.len() {
        warn!(
            capacity = slots.len(),
            found = values.len(),
            "ignoring extra per-level values"
        );
    }
    for (slot, value) in slots.iter_mut().zip(values) {
        set(slot, value, &convert);
    }
}

fn narrow(value: f64) -> f32 {
    value as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sections_keep_defaults() {
        let config = parse_config(r#"{"basic": {}, "player": {}, "tower": {}, "enemy": {}}"#)
            .expect("config parses");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn reads_every_section() {
        let config = parse_config(
            r#"{
                "basic": {"window_title": "Rush", "window_width": 800, "window_height": 600},
                "player": {"speed": 4, "normal_attack_damage": 30, "skill_interval": 5},
                "tower": {"gunner": {"damage": [40, 50], "upgrade_cost": [100]}},
                "enemy": {"king_slim": {"hp": 900, "reward_ratio": 1}}
            }"#,
        )
        .expect("config parses");

        assert_eq!(config.basic.window_title, "Rush");
        assert_eq!(
            (config.basic.window_width, config.basic.window_height),
            (800, 600)
        );
        assert_eq!(config.player.speed, 4.0);
        assert_eq!(config.player.normal_attack_damage, 30.0);
        assert_eq!(config.player.normal_attack_interval, 0.5);
        assert_eq!(config.player.skill_interval, 5.0);
        assert_eq!(config.gunner.damage[..3], [40.0, 50.0, 25.0]);
        assert_eq!(config.gunner.upgrade_cost[0], 100.0);
        assert_eq!(config.archer, TowerTemplate::default());
        assert_eq!(config.king_slime.hp, 900.0);
        assert_eq!(config.king_slime.reward_ratio, 1.0);
        assert_eq!(config.slime, EnemyTemplate::default());
    }

    #[test]
    fn mistyped_fields_keep_defaults() {
        let config = parse_config(
            r#"{
                "basic": {"window_title": 7, "window_width": "wide"},
                "player": {"speed": null},
                "tower": {"archer": {"cost": ["free", 10]}, "axeman": 5},
                "enemy": {"goblin": {"hp": "tough", "speed": 2}}
            }"#,
        )
        .expect("config parses");

        assert_eq!(config.basic, BasicTemplate::default());
        assert_eq!(config.player.speed, 3.0);
        assert_eq!(config.archer.cost[..2], [50.0, 10.0]);
        assert_eq!(config.axeman, TowerTemplate::default());
        assert_eq!(config.goblin.hp, 100.0);
        assert_eq!(config.goblin.speed, 2.0);
    }

    #[test]
    fn extra_level_values_are_ignored() {
        let twelve = (1..=12).map(|n| n.to_string()).collect::<Vec<_>>().join(",");
        let text = format!(
            r#"{{"basic": {{}}, "player": {{}}, "enemy": {{}},
                "tower": {{"archer": {{"interval": [{twelve}], "upgrade_cost": [{twelve}]}}}}}}"#
        );

        let config = parse_config(&text).expect("config parses");

        assert_eq!(config.archer.interval[9], 10.0);
        assert_eq!(config.archer.upgrade_cost[8], 9.0);
    }

    #[test]
    fn structural_problems_are_fatal() {
        assert!(matches!(
            parse_config("[]"),
            Err(LoadError::ConfigNotObject)
        ));
        assert!(matches!(
            parse_config(r#"{"basic": {}, "player": {}, "tower": {}}"#),
            Err(LoadError::MissingSection("enemy"))
        ));
        assert!(matches!(
            parse_config(r#"{"basic": [], "player": {}, "tower": {}, "enemy": {}}"#),
            Err(LoadError::MissingSection("basic"))
        ));
        assert!(matches!(
            parse_config("not json"),
            Err(LoadError::InvalidJson(_))
        ));
    }
}

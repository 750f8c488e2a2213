use std::time::Duration;

use village_defence_core::{
    EnemyKind, Event, GameConfig, GameOutcome, SpawnEvent, SpawnPointId, Tile, TileDirection,
    TileIndex, TileMap, TileMarker, TowerKind, Wave, INITIAL_COINS, INITIAL_HOME_HP,
};
use village_defence_simulation::Simulation;
use village_defence_system_wave_scheduler::WavePhase;
use village_defence_world::query;

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 60 * 60;

#[test]
fn gunner_clears_a_wave_and_wins() {
    let mut config = GameConfig::default();
    config.slime.hp = 20.0;
    config.slime.reward_ratio = 0.0;
    let mut simulation = Simulation::new(corridor(), config, vec![slimes(3, 40.0)], 11);

    let _ = simulation
        .try_place_tower(TowerKind::Gunner, TileIndex::new(3, 1))
        .expect("gunner fits beside the road");

    let events = run(&mut simulation);

    assert_eq!(simulation.outcome(), GameOutcome::Victory);
    assert_eq!(simulation.waves().phase(), WavePhase::Won);
    assert_eq!(count(&events, |event| matches!(event, Event::EnemyKilled { .. })), 3);
    assert_eq!(
        count(&events, |event| matches!(event, Event::EnemyReachedHome { .. })),
        0
    );
    assert!(count(&events, |event| matches!(event, Event::ProjectileFired { .. })) >= 3);
    assert_eq!(query::home_hp(simulation.world()), INITIAL_HOME_HP);
    assert_eq!(query::coins(simulation.world()), INITIAL_COINS - 50.0 + 40.0);
}

#[test]
fn undefended_home_falls() {
    let mut config = GameConfig::default();
    config.goblin.damage = 6.0;
    config.goblin.speed = 4.0;
    let wave = Wave {
        reward: 100.0,
        start_delay: Duration::ZERO,
        spawn_events: vec![
            spawn(EnemyKind::Goblin, Duration::ZERO),
            spawn(EnemyKind::Goblin, Duration::from_millis(500)),
        ],
    };
    let mut simulation = Simulation::new(corridor(), config, vec![wave], 11);

    let events = run(&mut simulation);

    assert_eq!(simulation.outcome(), GameOutcome::Defeat);
    assert_eq!(query::home_hp(simulation.world()), 0.0);
    assert_eq!(
        count(&events, |event| matches!(event, Event::GameOver { .. })),
        1
    );
    assert_eq!(query::coins(simulation.world()), INITIAL_COINS);
    assert!(simulation.tick(FRAME).is_empty());
}

#[test]
fn same_seed_replays_identically() {
    let config = GameConfig::default();
    let build = || {
        let mut simulation =
            Simulation::new(corridor(), config.clone(), vec![slimes(6, 10.0)], 0x5eed);
        let _ = simulation
            .try_place_tower(TowerKind::Archer, TileIndex::new(2, 1))
            .expect("archer placed");
        let _ = simulation
            .try_place_tower(TowerKind::Axeman, TileIndex::new(4, 3))
            .expect("axeman placed");
        simulation
    };

    let first = run(&mut build());
    let second = run(&mut build());

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

fn run(simulation: &mut Simulation) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..MAX_FRAMES {
        events.extend_from_slice(simulation.tick(FRAME));
        if simulation.outcome().is_terminal() {
            break;
        }
    }
    events
}

fn count(events: &[Event], predicate: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

fn spawn(enemy: EnemyKind, delay: Duration) -> SpawnEvent {
    SpawnEvent {
        delay,
        spawn_point: SpawnPointId::new(1),
        enemy,
    }
}

fn slimes(count: usize, reward: f64) -> Wave {
    Wave {
        reward,
        start_delay: Duration::ZERO,
        spawn_events: (0..count)
            .map(|index| {
                let delay = if index == 0 {
                    Duration::ZERO
                } else {
                    Duration::from_millis(1500)
                };
                spawn(EnemyKind::Slime, delay)
            })
            .collect(),
    }
}

/// Eight by five grass field with a road along the middle row.
fn corridor() -> TileMap {
    let columns = 8;
    let rows = 5;
    let mut tiles = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let tile = match (column, row) {
                (0, 2) => Tile::new(
                    1,
                    None,
                    TileDirection::Right,
                    TileMarker::SpawnPoint(SpawnPointId::new(1)),
                ),
                (7, 2) => Tile::new(1, None, TileDirection::None, TileMarker::Home),
                (_, 2) => Tile::new(1, None, TileDirection::Right, TileMarker::None),
                _ => Tile::new(0, None, TileDirection::None, TileMarker::None),
            };
            tiles.push(tile);
        }
    }
    TileMap::new(columns, rows, tiles).expect("valid map")
}

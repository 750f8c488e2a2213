use std::time::Duration;

use village_defence_core::{
    Command, EnemyKind, Event, GameConfig, GameOutcome, SpawnEvent, SpawnPointId, Tile,
    TileDirection, TileMap, TileMarker, Wave, INITIAL_COINS,
};
use village_defence_system_wave_scheduler::{WavePhase, WaveScheduler};
use village_defence_world::{self as world, query, World};

const STEP: Duration = Duration::from_millis(50);

#[test]
fn single_wave_pays_once_and_ends_in_victory() {
    let mut world = World::new(short_path(), GameConfig::default(), 5);
    let mut scheduler = WaveScheduler::new(vec![Wave {
        reward: 30.0,
        start_delay: Duration::from_millis(200),
        spawn_events: vec![
            SpawnEvent {
                delay: Duration::ZERO,
                spawn_point: SpawnPointId::new(1),
                enemy: EnemyKind::Slime,
            },
            SpawnEvent {
                delay: Duration::from_millis(300),
                spawn_point: SpawnPointId::new(1),
                enemy: EnemyKind::Goblin,
            },
        ],
    }]);

    let mut events = Vec::new();
    let mut credits = 0;
    for _ in 0..200 {
        let mut commands = Vec::new();
        scheduler.handle(STEP, &mut commands);
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }

        scheduler.poll(query::enemies_cleared(&world), &mut commands);
        credits += commands
            .iter()
            .filter(|command| matches!(command, Command::CreditCoins { .. }))
            .count();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        if query::outcome(&world).is_terminal() {
            break;
        }
        world::apply(&mut world, Command::AdvanceEnemies { dt: STEP }, &mut events);
    }

    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count();
    assert_eq!(spawned, 2);
    assert_eq!(credits, 1);
    assert_eq!(scheduler.phase(), WavePhase::Won);
    assert_eq!(query::outcome(&world), GameOutcome::Victory);
    assert_eq!(query::coins(&world), INITIAL_COINS + 30.0);
    assert_eq!(query::home_hp(&world), 8.0);
}

#[test]
fn spawns_wait_for_the_start_delay() {
    let mut scheduler = WaveScheduler::new(vec![Wave {
        reward: 0.0,
        start_delay: Duration::from_secs(2),
        spawn_events: vec![SpawnEvent {
            delay: Duration::ZERO,
            spawn_point: SpawnPointId::new(1),
            enemy: EnemyKind::KingSlime,
        }],
    }]);

    let mut commands = Vec::new();
    for _ in 0..39 {
        scheduler.handle(STEP, &mut commands);
        scheduler.poll(true, &mut commands);
    }
    assert!(commands.is_empty());

    scheduler.handle(STEP, &mut commands);
    scheduler.handle(STEP, &mut commands);
    assert_eq!(
        commands,
        vec![Command::SpawnEnemy {
            kind: EnemyKind::KingSlime,
            spawn_point: SpawnPointId::new(1),
        }]
    );
}

fn short_path() -> TileMap {
    TileMap::new(
        2,
        1,
        vec![
            Tile::new(
                1,
                None,
                TileDirection::Right,
                TileMarker::SpawnPoint(SpawnPointId::new(1)),
            ),
            Tile::new(1, None, TileDirection::None, TileMarker::Home),
        ],
    )
    .expect("valid map")
}

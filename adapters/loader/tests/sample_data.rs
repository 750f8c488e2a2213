use std::path::{Path, PathBuf};

use village_defence_core::{
    EnemyKind, SpawnPointId, TileDirection, TileIndex, TileMarker, TowerKind,
};
use village_defence_loader::{load_level, Assets, LoadError};

fn data(file: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../data")
        .join(file)
}

#[test]
fn bundled_assets_load() {
    let assets = Assets::load(
        &data("map.csv"),
        &data("level.json"),
        &data("config.json"),
    )
    .expect("bundled assets load");

    assert_eq!((assets.map.columns(), assets.map.rows()), (12, 7));
    let marker = |column, row| {
        assets
            .map
            .tile(TileIndex::new(column, row))
            .map(|tile| tile.marker())
    };
    assert_eq!(marker(0, 1), Some(TileMarker::SpawnPoint(SpawnPointId::new(1))));
    assert_eq!(marker(0, 5), Some(TileMarker::SpawnPoint(SpawnPointId::new(2))));
    assert_eq!(marker(11, 5), Some(TileMarker::Home));
    assert_eq!(
        assets.map.tile(TileIndex::new(4, 1)).map(|tile| tile.direction()),
        Some(TileDirection::Down)
    );

    assert_eq!(assets.waves.len(), 3);
    assert_eq!(assets.waves[2].spawn_events[0].enemy, EnemyKind::KingSlime);

    assert_eq!(assets.config.tower(TowerKind::Gunner).cost(0), 90.0);
    assert_eq!(assets.config.goblin_priest.recover_range, 2.0);
}

#[test]
fn missing_file_reports_its_path() {
    let path = data("does-not-exist.json");

    let error = load_level(&path).expect_err("file is missing");

    match error {
        LoadError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

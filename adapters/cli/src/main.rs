#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Village Defence match without a window.

mod build_orders;
mod summary;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use village_defence_core::TowerKind;
use village_defence_loader::Assets;
use village_defence_simulation::Simulation;
use village_defence_world::query;

use build_orders::TowerOrder;
use summary::MatchSummary;

#[derive(Parser, Debug)]
#[command(name = "village-defence")]
#[command(about = "Plays a Village Defence match headlessly and prints a summary")]
struct Args {
    /// Grid text describing the map
    #[arg(long, default_value = "data/map.csv")]
    map: PathBuf,

    /// Level document listing the waves
    #[arg(long, default_value = "data/level.json")]
    level: PathBuf,

    /// Tuning document
    #[arg(long, default_value = "data/config.json")]
    config: PathBuf,

    /// Seed for coin drops
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,

    /// Simulated seconds after which an unfinished match is abandoned
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,

    /// Tower to build before the first tick, as KIND@COLUMN,ROW
    #[arg(long = "tower", value_name = "KIND@COLUMN,ROW")]
    towers: Vec<TowerOrder>,

    /// Tower kind to upgrade after building
    #[arg(long = "upgrade", value_name = "KIND", value_parser = build_orders::parse_kind)]
    upgrades: Vec<TowerKind>,
}

/// Entry point for the Village Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let assets = Assets::load(&args.map, &args.level, &args.config)
        .context("failed to load startup data")?;
    info!(
        columns = assets.map.columns(),
        rows = assets.map.rows(),
        waves = assets.waves.len(),
        title = %assets.config.basic.window_title,
        "assets loaded"
    );

    let mut simulation = Simulation::new(assets.map, assets.config, assets.waves, args.seed);
    for order in &args.towers {
        match simulation.try_place_tower(order.kind, order.tile) {
            Ok(tower) => info!(
                tower = tower.get(),
                kind = ?order.kind,
                tile = ?order.tile,
                "tower built"
            ),
            Err(error) => warn!(
                %error,
                kind = ?order.kind,
                tile = ?order.tile,
                "tower not built"
            ),
        }
    }
    for &kind in &args.upgrades {
        match simulation.try_upgrade_tower(kind) {
            Ok(level) => info!(?kind, level, "tower kind upgraded"),
            Err(error) => warn!(%error, ?kind, "tower kind not upgraded"),
        }
    }

    let dt = Duration::from_millis(args.dt_ms.max(1));
    let limit = Duration::from_secs(args.max_seconds);
    let mut summary = MatchSummary::default();

    while summary.elapsed < limit {
        let events = simulation.tick(dt);
        summary.record(dt, events);
        if simulation.outcome().is_terminal() {
            break;
        }
    }

    summary.balance = query::coins(simulation.world());
    summary.home_hp = query::home_hp(simulation.world());
    summary.outcome = simulation.outcome();
    println!("{summary}");
    Ok(())
}

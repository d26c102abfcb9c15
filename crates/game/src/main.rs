use std::path::PathBuf;
use std::{env, fs};

use gridcore::{run_simulation, InputCollector, LoopConfig, MapDescription, MapError, MetricsHandle};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app;

use app::{DemoScript, GameWorld};

const MAP_ENV_VAR: &str = "TILEFALL_MAP";
const SEED_ENV_VAR: &str = "TILEFALL_SEED";
const DEFAULT_MAP_JSON: &str = include_str!("../assets/village.json");
const DEFAULT_SEED: u64 = 0x7AB1E;

#[derive(Debug, Error)]
enum GameError {
    #[error("failed to read map file {path}: {source}")]
    ReadMap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse map description at {path}: {source}")]
    ParseMap {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("TILEFALL_SEED must be an unsigned integer, got '{raw}'")]
    InvalidSeed { raw: String },
}

fn main() {
    init_tracing();
    info!("=== Tilefall Startup ===");

    if let Err(err) = run() {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), GameError> {
    let description = load_map_description()?;
    let seed = resolve_seed()?;
    let mut world = GameWorld::new(&description, seed)?;

    let config = LoopConfig::default();
    let metrics = MetricsHandle::default();
    let mut collector = InputCollector::new();
    let mut script = DemoScript::village_tour();
    let mut tick: u64 = 0;

    info!(seed, target_tps = config.target_tps, "demo_starting");
    run_simulation(&config, metrics.clone(), |dt_seconds| {
        script.pump(tick, &mut collector);
        if let Some(goal) = script.order_for(tick) {
            if !world.order_player_to(goal) {
                warn!(x = goal.x, y = goal.y, "scripted_order_unreachable");
            }
        }
        let snapshot = collector.snapshot_for_tick();
        tick += 1;
        world.tick(&snapshot, dt_seconds)
    });

    let summary = metrics.snapshot();
    info!(
        sim_ticks = world.tick_count(),
        tps = summary.tps,
        tick_time_ms = summary.tick_time_ms,
        "demo_finished"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_map_description() -> Result<MapDescription, GameError> {
    match env::var(MAP_ENV_VAR) {
        Ok(raw_path) => {
            let path = PathBuf::from(raw_path);
            let raw = fs::read_to_string(&path).map_err(|source| GameError::ReadMap {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "map_loaded_from_env");
            parse_map_json(&raw)
        }
        Err(_) => parse_map_json(DEFAULT_MAP_JSON),
    }
}

fn parse_map_json(raw: &str) -> Result<MapDescription, GameError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let description: MapDescription = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|error| {
            let path = error.path().to_string();
            GameError::ParseMap {
                path,
                source: error.into_inner(),
            }
        })?;
    description.validate()?;
    Ok(description)
}

fn resolve_seed() -> Result<u64, GameError> {
    match env::var(SEED_ENV_VAR) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| GameError::InvalidSeed { raw }),
        Err(_) => Ok(DEFAULT_SEED),
    }
}

//! Command-line host: loads data, restores the save, runs the loop and
//! reports the final state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use campus_core::commands::PlayerCommand;
use campus_core::config::{BuildingCatalog, EnemyConfig};
use campus_core::constants::FRAME_RATE;
use campus_core::enums::{DriveIntent, UpgradeTrack};
use campus_core::state::GameStateSnapshot;
use campus_core::types::BuildingId;
use campus_sim::engine::{SimConfig, SimulationEngine};
use campus_sim::persistence::{FileSaveStore, MemorySaveStore, SaveStore};

use crate::game_loop::{spawn_game_loop, LoopSettings};
use crate::state::{AppState, GameLoopCommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "campus-tycoon", about = "Headless campus tycoon simulation")]
pub struct Args {
    /// Building catalog JSON (defaults to the bundled catalog).
    #[arg(long)]
    pub buildings: Option<PathBuf>,
    /// Enemy configuration JSON (defaults to the bundled configuration).
    #[arg(long)]
    pub enemies: Option<PathBuf>,
    /// Directory holding the save file. Without it nothing is persisted.
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
    #[arg(long, default_value = "campus")]
    pub slot: String,
    /// Ignore any existing save.
    #[arg(long)]
    pub fresh: bool,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Simulated seconds to run.
    #[arg(long, default_value_t = 10)]
    pub seconds: u64,
    /// Pace the loop at 60 Hz instead of running flat out.
    #[arg(long)]
    pub realtime: bool,
    /// Turn the engine on at the first frame.
    #[arg(long)]
    pub start_engine: bool,
    /// Hold the accelerator for the whole run.
    #[arg(long)]
    pub drive: bool,
    /// Unlock a building at the first frame. Repeatable.
    #[arg(long, value_name = "ID")]
    pub unlock: Vec<String>,
    /// Buy one upgrade tier at the first frame, e.g. `library:course`.
    /// Repeatable; applied after the unlocks.
    #[arg(long, value_name = "ID:TRACK", value_parser = parse_upgrade)]
    pub upgrade: Vec<(String, UpgradeTrack)>,
}

fn parse_upgrade(value: &str) -> Result<(String, UpgradeTrack), String> {
    let (id, track) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ID:TRACK, got `{value}`"))?;
    let track = UpgradeTrack::parse(track).ok_or_else(|| format!("unknown upgrade track `{track}`"))?;
    Ok((id.to_string(), track))
}

fn open_store(args: &Args) -> Box<dyn SaveStore + Send> {
    match &args.save_dir {
        Some(dir) => Box::new(FileSaveStore::new(dir, args.slot.as_str())),
        None => Box::new(MemorySaveStore::new()),
    }
}

fn load_catalog(args: &Args) -> Result<BuildingCatalog> {
    match &args.buildings {
        Some(path) => BuildingCatalog::from_path(path)
            .with_context(|| format!("loading building catalog {}", path.display())),
        None => BuildingCatalog::bundled().context("loading bundled building catalog"),
    }
}

fn load_enemies(args: &Args) -> Result<EnemyConfig> {
    match &args.enemies {
        Some(path) => EnemyConfig::from_path(path)
            .with_context(|| format!("loading enemy config {}", path.display())),
        None => EnemyConfig::bundled().context("loading bundled enemy config"),
    }
}

/// Restore the save if there is a usable one. A broken or unreadable save
/// starts a fresh session instead of failing.
fn restore(engine: &mut SimulationEngine, store: &dyn SaveStore) {
    match store.load() {
        Ok(Some(save)) => engine.apply_save(&save),
        Ok(None) => info!(target: "app.loop", "no save found, starting fresh"),
        Err(error) => warn!(target: "app.loop", %error, "ignoring unreadable save"),
    }
}

fn scripted_commands(args: &Args) -> Vec<PlayerCommand> {
    let mut commands = Vec::new();
    if args.start_engine {
        commands.push(PlayerCommand::ToggleEngine);
    }
    if args.drive {
        commands.push(PlayerCommand::SetIntent {
            intent: DriveIntent::Accelerate,
            held: true,
        });
    }
    for id in &args.unlock {
        commands.push(PlayerCommand::UnlockBuilding {
            building_id: BuildingId::new(id.as_str()),
        });
    }
    for (id, track) in &args.upgrade {
        commands.push(PlayerCommand::PurchaseUpgrade {
            building_id: BuildingId::new(id.as_str()),
            track: *track,
        });
    }
    commands
}

/// Run one session and return the last snapshot.
pub fn run(args: &Args) -> Result<GameStateSnapshot> {
    let catalog = load_catalog(args)?;
    let enemies = load_enemies(args)?;

    let mut store = open_store(args);
    if args.fresh {
        store.clear().context("clearing existing save")?;
    }

    let config = SimConfig {
        seed: args.seed,
        ..SimConfig::default()
    };
    let mut engine = SimulationEngine::new(config, catalog);
    restore(&mut engine, store.as_ref());

    let app = AppState::new();
    let settings = LoopSettings {
        frame_limit: Some(args.seconds.saturating_mul(u64::from(FRAME_RATE))),
        realtime: args.realtime,
        stop_on_game_over: true,
    };
    let cmd_rx = app.connect();

    // Enemy data is handed over like any other late arrival.
    app.send(GameLoopCommand::InstallEnemyConfig(enemies));
    for command in scripted_commands(args) {
        app.send(GameLoopCommand::Player(command));
    }

    let handle = spawn_game_loop(engine, store, settings, Arc::clone(&app.latest_snapshot), cmd_rx)
        .context("starting game loop")?;
    let summary = handle
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))?;
    app.detach();
    info!(
        target: "app.loop",
        frames = summary.frames,
        game_over = summary.game_over,
        "session finished"
    );

    app.snapshot().context("game loop produced no snapshot")
}

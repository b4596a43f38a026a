//! Game loop thread: runs the simulation engine at 60 Hz, publishes the
//! latest snapshot and performs the periodic auto-save.
//!
//! The engine is moved into the thread and owned there. Commands arrive via
//! an `mpsc` channel.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use campus_core::constants::FRAME_DURATION_US;
use campus_core::enums::GamePhase;
use campus_core::state::GameStateSnapshot;
use campus_sim::engine::SimulationEngine;
use campus_sim::persistence::{autosave, now_timestamp, SaveStore};

use crate::state::GameLoopCommand;

/// Wall-clock duration of one frame.
const FRAME_DURATION: Duration = Duration::from_micros(FRAME_DURATION_US);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    /// Stop after this many frames. `None` runs until shutdown.
    pub frame_limit: Option<u64>,
    /// Sleep between frames to hold 60 Hz; otherwise run as fast as possible.
    pub realtime: bool,
    /// Stop on its own once the session is over.
    pub stop_on_game_over: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            frame_limit: None,
            realtime: true,
            stop_on_game_over: true,
        }
    }
}

/// What the loop did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub saves_written: u32,
    pub saves_failed: u32,
    pub game_over: bool,
}

/// Spawns the game loop in a new thread.
///
/// Commands already waiting in `cmd_rx` are applied before the first frame.
/// The handle yields the summary once the loop stops.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    store: Box<dyn SaveStore + Send>,
    settings: LoopSettings,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
) -> io::Result<JoinHandle<LoopSummary>> {
    std::thread::Builder::new()
        .name("campus-game-loop".into())
        .spawn(move || {
            let mut engine = engine;
            let mut store = store;
            run_game_loop(&mut engine, store.as_mut(), &cmd_rx, &latest_snapshot, settings)
        })
}

struct Saver<'a> {
    store: &'a mut dyn SaveStore,
    summary: &'a mut LoopSummary,
}

impl Saver<'_> {
    fn save(&mut self, engine: &SimulationEngine) {
        if autosave(self.store, &engine.to_save_data(now_timestamp())) {
            self.summary.saves_written += 1;
        } else {
            self.summary.saves_failed += 1;
        }
    }
}

/// The game loop. Runs until shutdown, channel disconnect, the frame
/// limit, or game over.
pub fn run_game_loop(
    engine: &mut SimulationEngine,
    store: &mut dyn SaveStore,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    settings: LoopSettings,
) -> LoopSummary {
    let mut summary = LoopSummary::default();
    let mut saver = Saver {
        store,
        summary: &mut summary,
    };
    let mut next_frame_time = Instant::now();

    info!(target: "app.loop", ?settings, "game loop started");
    'frames: loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(command)) => engine.queue_command(command),
                Ok(GameLoopCommand::InstallEnemyConfig(config)) => engine.install_enemy_config(config),
                Ok(GameLoopCommand::SaveNow) => saver.save(engine),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    debug!(target: "app.loop", "shutdown requested");
                    if engine.phase() != GamePhase::GameOver {
                        saver.save(engine);
                    }
                    break 'frames;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one frame (the engine handles pause internally)
        let snapshot = engine.tick();
        let phase = snapshot.phase;
        saver.summary.frames += 1;

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Periodic save; failures are logged and retried next period
        if engine.take_autosave_due() {
            saver.save(engine);
        }

        if phase == GamePhase::GameOver {
            saver.summary.game_over = true;
            if settings.stop_on_game_over {
                info!(target: "app.loop", "session over");
                break;
            }
        }
        if settings
            .frame_limit
            .is_some_and(|limit| saver.summary.frames >= limit)
        {
            if phase != GamePhase::GameOver {
                saver.save(engine);
            }
            break;
        }

        // 5. Sleep until next frame
        if settings.realtime {
            next_frame_time += FRAME_DURATION;
            let now = Instant::now();
            if next_frame_time > now {
                std::thread::sleep(next_frame_time - now);
            } else if now - next_frame_time > FRAME_DURATION * 2 {
                // Too far behind; reset to avoid a catch-up spiral
                next_frame_time = now;
            }
        }
    }

    info!(
        target: "app.loop",
        frames = summary.frames,
        saves_written = summary.saves_written,
        saves_failed = summary.saves_failed,
        "game loop stopped"
    );
    summary
}

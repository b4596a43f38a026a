//! State shared between the host and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use campus_core::commands::PlayerCommand;
use campus_core::config::EnemyConfig;
use campus_core::state::GameStateSnapshot;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    Player(PlayerCommand),
    /// Enemy configuration finished loading.
    InstallEnemyConfig(EnemyConfig),
    /// Write the save record now instead of waiting for the next auto-save.
    SaveNow,
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handles the host keeps while the loop runs.
pub struct AppState {
    /// `None` before the loop is started or after it stopped.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each frame.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the command channel. The receiver goes to the game loop.
    pub fn connect(&self) -> mpsc::Receiver<GameLoopCommand> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut lock) = self.command_tx.lock() {
            *lock = Some(tx);
        }
        rx
    }

    /// Drop the sender so the loop sees a disconnect.
    pub fn detach(&self) {
        if let Ok(mut lock) = self.command_tx.lock() {
            *lock = None;
        }
    }

    /// Forward a command. `false` when no loop is listening.
    pub fn send(&self, command: GameLoopCommand) -> bool {
        let Ok(lock) = self.command_tx.lock() else {
            return false;
        };
        match lock.as_ref() {
            Some(tx) => tx.send(command).is_ok(),
            None => false,
        }
    }

    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_detached() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.snapshot().is_none());
        assert!(!state.send(GameLoopCommand::Shutdown));
    }

    #[test]
    fn attached_state_forwards_commands() {
        let state = AppState::new();
        let rx = state.connect();
        assert!(state.send(GameLoopCommand::Player(PlayerCommand::Horn)));
        assert!(matches!(
            rx.try_recv(),
            Ok(GameLoopCommand::Player(PlayerCommand::Horn))
        ));

        state.detach();
        assert!(!state.send(GameLoopCommand::Shutdown));
        assert!(matches!(rx.try_recv(), Err(mpsc::TryRecvError::Disconnected)));
    }
}

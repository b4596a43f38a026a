//! Keyboard mapping from key names to player commands.

use serde::{Deserialize, Serialize};

use crate::commands::PlayerCommand;
use crate::enums::DriveIntent;

/// What a key controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Drive(DriveIntent),
    ToggleEngine,
    Horn,
}

/// Map a DOM-style key name (`"w"`, `"ArrowUp"`, ...) to a control.
pub fn control_for_key(key: &str) -> Option<Control> {
    match key.to_lowercase().as_str() {
        "w" | "arrowup" => Some(Control::Drive(DriveIntent::Accelerate)),
        "s" | "arrowdown" => Some(Control::Drive(DriveIntent::Reverse)),
        "a" | "arrowleft" => Some(Control::Drive(DriveIntent::SteerLeft)),
        "d" | "arrowright" => Some(Control::Drive(DriveIntent::SteerRight)),
        "e" => Some(Control::ToggleEngine),
        "h" => Some(Control::Horn),
        _ => None,
    }
}

/// Which keys are currently held. Auto-repeated key-downs of a held key
/// produce nothing, so the engine toggle and horn fire once per press and
/// driving intents are never double-counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    held: Vec<Control>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// Translate a key-down event. Only the up-to-down edge emits a command.
    pub fn key_down(&mut self, key: &str) -> Option<PlayerCommand> {
        let control = control_for_key(key)?;
        if self.is_held(control) {
            return None;
        }
        self.held.push(control);
        Some(match control {
            Control::Drive(intent) => PlayerCommand::SetIntent { intent, held: true },
            Control::ToggleEngine => PlayerCommand::ToggleEngine,
            Control::Horn => PlayerCommand::Horn,
        })
    }

    /// Translate a key-up event. Only driving keys have a release action.
    pub fn key_up(&mut self, key: &str) -> Option<PlayerCommand> {
        let control = control_for_key(key)?;
        self.held.retain(|held| *held != control);
        match control {
            Control::Drive(intent) => Some(PlayerCommand::SetIntent {
                intent,
                held: false,
            }),
            Control::ToggleEngine | Control::Horn => None,
        }
    }
}

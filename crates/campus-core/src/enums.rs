//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// One of the three independent upgrade categories of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeTrack {
    Course,
    Infra,
    Sustain,
}

impl UpgradeTrack {
    pub const ALL: [UpgradeTrack; 3] = [Self::Course, Self::Infra, Self::Sustain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Infra => "infra",
            Self::Sustain => "sustain",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "course" => Some(Self::Course),
            "infra" | "infrastructure" => Some(Self::Infra),
            "sustain" | "sustainability" => Some(Self::Sustain),
            _ => None,
        }
    }
}

/// Engine state machine of the car.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Off,
    /// Start requested, waiting for the start delay to elapse.
    Starting,
    /// Running, below the moving threshold.
    Idle,
    /// Running, above the moving threshold.
    Moving,
}

impl EngineState {
    /// The engine counts as on from the moment a start is requested.
    pub fn is_on(&self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Physics only runs once the engine has finished starting.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Idle | Self::Moving)
    }
}

/// Enemy life-cycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    #[default]
    Idle,
    Dying,
    /// Terminal; the enemy is removed from the active set.
    Dead,
}

/// Held driving intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveIntent {
    Accelerate,
    Reverse,
    SteerLeft,
    SteerRight,
}

/// Why a purchase was rejected, as reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    UnknownBuilding,
    AlreadyUnlocked,
    Locked,
    TrackUnavailable,
    MaxLevel,
    InsufficientFunds,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
    /// Terminal: students ran out while enemies were on campus.
    GameOver,
}

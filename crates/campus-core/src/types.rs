//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

use crate::constants::FRAME_DURATION_US;

/// 2D point or vector in world space (screen pixels, y grows downward).
pub type Vec2 = glam::DVec2;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current frame number (increments by 1 each frame tick).
    pub frame: u64,
    /// Elapsed simulation time in microseconds.
    pub elapsed_us: u64,
}

impl SimTime {
    /// Elapsed simulation time in whole milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_us / 1_000
    }

    /// Advance by one frame.
    pub fn advance(&mut self) {
        self.frame += 1;
        self.elapsed_us += FRAME_DURATION_US;
    }
}

/// Identity of a configured building (its key in the building catalog).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(pub String);

impl BuildingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parking lots are always passable regardless of lock state.
    pub fn is_parking(&self) -> bool {
        let id = self.0.to_lowercase();
        crate::constants::PARKING_KEYWORDS
            .iter()
            .any(|keyword| id.contains(keyword))
    }
}

impl std::fmt::Display for BuildingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BuildingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

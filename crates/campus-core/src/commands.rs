//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next frame boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::BuildingId;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Driving ---
    /// Key-down (`held = true`) or key-up (`held = false`) for a driving intent.
    SetIntent { intent: DriveIntent, held: bool },
    /// Toggle the car engine on or off.
    ToggleEngine,
    /// Sound the horn.
    Horn,

    // --- Economy ---
    /// Unlock a locked building.
    UnlockBuilding { building_id: BuildingId },
    /// Buy the next tier of one upgrade track.
    PurchaseUpgrade {
        building_id: BuildingId,
        track: UpgradeTrack,
    },

    // --- Simulation control ---
    Pause,
    Resume,
}

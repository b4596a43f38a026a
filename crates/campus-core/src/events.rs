//! Events emitted by the simulation for audio, animation and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{BuildingId, Vec2};

/// Discrete cues drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Engine start requested; ignition sound.
    EngineStarting,
    /// Start delay elapsed; idle loop begins.
    EngineRunning,
    EngineStopped,
    /// Car crossed the moving threshold upward.
    StartedMoving,
    /// Car dropped below the moving threshold.
    StoppedMoving,
    Horn,
    BuildingUnlocked {
        building_id: BuildingId,
        cost: f64,
    },
    UpgradePurchased {
        building_id: BuildingId,
        track: UpgradeTrack,
        level: u8,
        cost: f64,
    },
    PurchaseRejected {
        building_id: BuildingId,
        reason: RejectReason,
        /// Price that could not be paid, when the reason is insufficient funds.
        cost: Option<f64>,
    },
    EnemySpawned {
        enemy_id: u32,
        position: Vec2,
    },
    EnemyKilled {
        enemy_id: u32,
    },
    EnemyRemoved {
        enemy_id: u32,
    },
    /// Students reached zero with enemies on campus.
    GameOver {
        active_enemies: u32,
    },
}

//! Game state snapshot: the complete visible state handed to the
//! presentation layer after each frame.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{BuildingId, SimTime, Vec2};

/// Complete game state produced after each frame tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub car: CarView,
    pub economy: EconomyView,
    pub buildings: Vec<BuildingView>,
    pub enemies: Vec<EnemyView>,
    pub director: DirectorView,
    pub events: Vec<GameEvent>,
}

/// Car pose and engine state, for animation selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarView {
    pub position: Vec2,
    /// Heading in degrees.
    pub heading: f64,
    pub speed: f64,
    pub engine: EngineState,
    pub engine_on: bool,
    pub moving: bool,
}

/// Economy numbers for the UI text fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomyView {
    pub money: f64,
    pub students: u32,
    pub sustainability: u32,
}

/// Per-building unlock and level state, for frame selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingView {
    pub id: BuildingId,
    pub unlocked: bool,
    /// False for buildings with no upgrade track (no panel is offered).
    pub has_upgrades: bool,
    pub course_level: u8,
    pub infra_level: u8,
    pub sustain_level: u8,
}

/// A visible enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub position: Vec2,
    pub life_state: LifeState,
    pub frame: u32,
}

/// Progression-derived numbers, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorView {
    pub configured: bool,
    pub active_enemies: u32,
    pub progression_level: u32,
    pub spawn_rate_ms: u64,
    pub max_enemies: u32,
}

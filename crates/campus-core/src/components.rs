//! ECS components for enemy entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::LifeState;
use crate::types::Vec2;

/// Identity and spawn slot of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    /// Monotonic id, unique for the session.
    pub id: u32,
    /// Index of the spawn point this enemy occupies.
    pub spawn_point: usize,
}

/// World position of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Radius of the circle the car must enter to run the enemy over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRadius(pub f64);

/// Life-cycle state plus the animation frame the presentation layer shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub state: LifeState,
    pub frame: u32,
}

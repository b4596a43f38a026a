//! ECS systems that operate on the enemy world each frame.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! They hold no state of their own; all state lives in components.

pub mod enemy_lifecycle;
pub mod enemy_spawner;
pub mod run_over;
pub mod snapshot;

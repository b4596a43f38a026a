//! Simulation core for the campus tycoon.
//!
//! Owns the economy ledger, the car, the enemy director (a hecs world of
//! enemies) and the world clock, and produces `GameStateSnapshot`s for the
//! presentation layer.

pub mod car;
pub mod clock;
pub mod director;
pub mod economy;
pub mod engine;
pub mod persistence;
pub mod spatial;
pub mod systems;

pub use campus_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;

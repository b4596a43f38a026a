//! Enemy AI for the campus tycoon simulation.
//!
//! Implements the enemy life-cycle state machine, progression-driven spawn
//! pacing, and the weighted spawn-point selector.

pub mod fsm;
pub mod progression;
pub mod spawn_select;

pub use campus_core as core;

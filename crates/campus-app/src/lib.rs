//! Headless host for the campus tycoon simulation.
//!
//! Runs the simulation engine on its own thread, feeds it commands over a
//! channel, keeps the latest snapshot for polling and owns auto-saving.

pub mod cli;
pub mod game_loop;
pub mod state;

pub use campus_core as core;

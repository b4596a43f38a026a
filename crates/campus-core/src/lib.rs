//! Core types and definitions for the campus tycoon simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, commands, configuration data, state snapshots,
//! events, and constants. It has no dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod input;
pub mod shapes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

//! Spawn pacing driven by campus progression.
//!
//! The more the campus grows, the faster enemies appear and the more of them
//! may be on campus at once.

use campus_core::config::EnemyConfig;

/// Milliseconds between spawns at the given progression level, never below
/// the configured floor.
pub fn spawn_rate_ms(config: &EnemyConfig, progression_level: u32) -> u64 {
    let reduction =
        u64::from(progression_level).saturating_mul(config.progression.spawn_rate_reduction_per_building);
    config
        .base_stats
        .spawn_rate_ms
        .saturating_sub(reduction)
        .max(config.progression.spawn_rate_min_ms)
}

/// Population cap: the base cap plus one per student threshold reached.
pub fn max_enemies(config: &EnemyConfig, students: u32) -> u32 {
    let reached = config
        .progression
        .max_enemies_increase_at_students
        .iter()
        .filter(|&&threshold| students >= threshold)
        .count() as u32;
    config.base_stats.max_enemies + reached
}

/// Inputs to the spawn gate for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SpawnGate {
    pub students: u32,
    pub active_enemies: u32,
    pub progression_level: u32,
    /// `None` when nothing has spawned yet this session.
    pub since_last_spawn_ms: Option<u64>,
}

/// All spawn conditions must hold.
pub fn can_spawn(config: &EnemyConfig, gate: &SpawnGate) -> bool {
    if gate.students < config.base_stats.min_students_to_spawn {
        return false;
    }
    if gate.active_enemies >= max_enemies(config, gate.students) {
        return false;
    }
    match gate.since_last_spawn_ms {
        Some(elapsed) => elapsed >= spawn_rate_ms(config, gate.progression_level),
        None => true,
    }
}

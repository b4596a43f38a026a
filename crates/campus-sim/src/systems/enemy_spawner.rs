//! Enemy spawning: entity construction and spawn-slot bookkeeping.

use hecs::{Entity, World};

use campus_core::components::{Enemy, HitRadius, Lifecycle, Position};
use campus_core::types::Vec2;

/// Spawn a fresh Idle enemy occupying `spawn_point`.
pub fn spawn_enemy(
    world: &mut World,
    id: u32,
    spawn_point: usize,
    position: Vec2,
    hit_radius: f64,
) -> Entity {
    world.spawn((
        Enemy { id, spawn_point },
        Position(position),
        HitRadius(hit_radius),
        Lifecycle::default(),
    ))
}

/// Spawn-point indices held by enemies still in the active set.
pub fn occupied_spawn_points(world: &World) -> Vec<usize> {
    let mut occupied: Vec<usize> = world
        .query::<&Enemy>()
        .iter()
        .map(|(_, enemy)| enemy.spawn_point)
        .collect();
    occupied.sort_unstable();
    occupied
}

pub fn active_count(world: &World) -> u32 {
    world.query::<&Enemy>().iter().count() as u32
}

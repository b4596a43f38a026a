//! Car-versus-enemy hit test.

use hecs::World;
use tracing::info;

use campus_core::components::{Enemy, HitRadius, Lifecycle, Position};
use campus_core::enums::LifeState;
use campus_core::events::GameEvent;
use campus_core::shapes::Shape;
use campus_core::types::Vec2;
use campus_enemy_ai::fsm;

/// Kill every Idle enemy whose hit circle contains `car_position`.
/// Returns the number of kills.
pub fn run(world: &mut World, car_position: Vec2, events: &mut Vec<GameEvent>) -> u32 {
    let mut killed: Vec<u32> = Vec::new();
    for (_, (enemy, position, radius, lifecycle)) in
        world.query_mut::<(&Enemy, &Position, &HitRadius, &mut Lifecycle)>()
    {
        if lifecycle.state != LifeState::Idle {
            continue;
        }
        if !Shape::circle(position.0, radius.0).contains(car_position) {
            continue;
        }
        if let Some(next) = fsm::kill(*lifecycle) {
            *lifecycle = next;
            killed.push(enemy.id);
        }
    }
    killed.sort_unstable();

    for &enemy_id in &killed {
        info!(target: "sim.enemy", enemy_id, "enemy run over");
        events.push(GameEvent::EnemyKilled { enemy_id });
    }
    killed.len() as u32
}

/// Kill one enemy by id. No-op (returns `false`) unless it is Idle.
pub fn kill(world: &mut World, enemy_id: u32) -> bool {
    for (_, (enemy, lifecycle)) in world.query_mut::<(&Enemy, &mut Lifecycle)>() {
        if enemy.id != enemy_id {
            continue;
        }
        return match fsm::kill(*lifecycle) {
            Some(next) => {
                *lifecycle = next;
                true
            }
            None => false,
        };
    }
    false
}

//! Enemy life-cycle system: advances every enemy one frame and removes the
//! ones that reached `Dead`.

use hecs::{Entity, World};
use tracing::debug;

use campus_core::components::{Enemy, Lifecycle};
use campus_core::events::GameEvent;
use campus_enemy_ai::fsm;

/// Uses a pre-allocated buffer to avoid per-frame allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, events: &mut Vec<GameEvent>) {
    despawn_buffer.clear();

    // Ascending id order keeps the removal events deterministic.
    let mut removed: Vec<u32> = Vec::new();
    for (entity, (enemy, lifecycle)) in world.query_mut::<(&Enemy, &mut Lifecycle)>() {
        let update = fsm::advance(*lifecycle);
        *lifecycle = update.lifecycle;
        if update.remove {
            despawn_buffer.push(entity);
            removed.push(enemy.id);
        }
    }
    removed.sort_unstable();

    for entity in despawn_buffer.drain(..) {
        if let Err(error) = world.despawn(entity) {
            debug!(target: "sim.enemy", ?error, "despawn of missing entity");
        }
    }
    for enemy_id in removed {
        debug!(target: "sim.enemy", enemy_id, "enemy removed");
        events.push(GameEvent::EnemyRemoved { enemy_id });
    }
}

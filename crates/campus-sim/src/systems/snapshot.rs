//! Snapshot system: gathers the read-only views of every component into a
//! complete `GameStateSnapshot`.
//!
//! This system never modifies simulation state.

use campus_core::enums::GamePhase;
use campus_core::events::GameEvent;
use campus_core::state::*;
use campus_core::types::SimTime;

use crate::car::CarController;
use crate::director::EnemyDirector;
use crate::economy::Economy;

pub fn build_snapshot(
    time: SimTime,
    phase: GamePhase,
    car: &CarController,
    economy: &Economy,
    director: &EnemyDirector,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    let students = economy.students();
    let progression_level = economy.progression_level();

    GameStateSnapshot {
        time,
        phase,
        car: car.view(),
        economy: EconomyView {
            money: economy.money(),
            students,
            sustainability: economy.sustainability(),
        },
        buildings: build_buildings(economy),
        enemies: director.enemies(),
        director: director.view(students, progression_level),
        events,
    }
}

/// Building ledger in id order.
fn build_buildings(economy: &Economy) -> Vec<BuildingView> {
    economy
        .state()
        .buildings
        .iter()
        .map(|(id, state)| BuildingView {
            id: id.clone(),
            unlocked: state.unlocked,
            has_upgrades: economy.has_upgrade_panel(id),
            course_level: state.course_level,
            infra_level: state.infra_level,
            sustain_level: state.sustain_level,
        })
        .collect()
}

//! Simulation engine: the single authority that drives one campus session.
//!
//! `SimulationEngine` owns every component, processes player commands at
//! frame boundaries, runs the frame in a fixed order and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use campus_core::commands::PlayerCommand;
use campus_core::config::{
    BuildingCatalog, Cadences, CarStats, EconomySettings, EnemyConfig, PlayfieldExtent,
};
use campus_core::enums::{GamePhase, UpgradeTrack};
use campus_core::events::GameEvent;
use campus_core::input::KeyState;
use campus_core::shapes::Shape;
use campus_core::state::GameStateSnapshot;
use campus_core::types::{BuildingId, SimTime};

use crate::car::{CarController, EngineToggle};
use crate::clock::{ClockTick, Intent, WorldClock};
use crate::director::{CarHitbox, EnemyDirector};
use crate::economy::{Economy, PurchaseError};
use crate::persistence::SaveData;
use crate::spatial::SpatialQuery;
use crate::systems;

/// Configuration for starting a new session.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and commands = same session.
    pub seed: u64,
    pub economy: EconomySettings,
    pub car: CarStats,
    pub extent: PlayfieldExtent,
    pub cadences: Cadences,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            economy: EconomySettings::default(),
            car: CarStats::default(),
            extent: PlayfieldExtent::default(),
            cadences: Cadences::default(),
        }
    }
}

pub struct SimulationEngine {
    phase: GamePhase,
    rng: ChaCha8Rng,
    clock: WorldClock,
    engine_start_delay_ms: u64,
    spatial: SpatialQuery,
    economy: Economy,
    car: CarController,
    director: EnemyDirector,
    command_queue: VecDeque<PlayerCommand>,
    keys: KeyState,
    events: Vec<GameEvent>,
    autosave_due: bool,
}

impl SimulationEngine {
    /// The building catalog must be loaded before the session starts; enemy
    /// configuration may arrive later through `install_enemy_config`.
    pub fn new(config: SimConfig, catalog: BuildingCatalog) -> Self {
        info!(
            target: "sim.engine",
            seed = config.seed,
            buildings = catalog.len(),
            "session started"
        );
        Self {
            phase: GamePhase::Active,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            clock: WorldClock::new(&config.cadences),
            engine_start_delay_ms: config.cadences.engine_start_delay_ms,
            spatial: SpatialQuery::new(config.extent),
            economy: Economy::new(catalog, config.economy),
            car: CarController::new(config.car),
            director: EnemyDirector::new(),
            command_queue: VecDeque::new(),
            keys: KeyState::new(),
            events: Vec::new(),
            autosave_due: false,
        }
    }

    pub fn install_enemy_config(&mut self, config: EnemyConfig) {
        self.director.install_config(config);
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Raw keyboard input. A held key's auto-repeat is ignored.
    pub fn key_down(&mut self, key: &str) {
        if let Some(command) = self.keys.key_down(key) {
            self.queue_command(command);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(command) = self.keys.key_up(key) {
            self.queue_command(command);
        }
    }

    /// Advance the simulation by one frame and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_frame();
        }

        self.snapshot()
    }

    /// Current state without advancing. Drains pending events.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            self.clock.time(),
            self.phase,
            &self.car,
            &self.economy,
            &self.director,
            events,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.clock.time()
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn car(&self) -> &CarController {
        &self.car
    }

    pub fn director(&self) -> &EnemyDirector {
        &self.director
    }

    pub fn spatial(&self) -> &SpatialQuery {
        &self.spatial
    }

    /// Hand the footprint of a configured building to the spatial query.
    /// Unknown ids are refused.
    pub fn register_obstacle(&mut self, id: BuildingId, shape: Shape) -> bool {
        if !self.economy.catalog().contains(&id) {
            debug!(target: "sim.engine", building = %id, "obstacle for unknown building ignored");
            return false;
        }
        self.spatial.register_obstacle(id, shape);
        true
    }

    pub fn set_boundary(&mut self, boundary: Option<Shape>) {
        self.spatial.set_boundary(boundary);
    }

    /// Returns whether an auto-save came due since the last call, and
    /// clears the flag.
    pub fn take_autosave_due(&mut self) -> bool {
        std::mem::take(&mut self.autosave_due)
    }

    pub fn to_save_data(&self, timestamp: u64) -> SaveData {
        let state = self.economy.state();
        SaveData {
            money: state.money,
            students: state.students,
            sustainability: state.sustainability,
            buildings: state.buildings.clone(),
            timestamp,
        }
    }

    /// Merge a loaded record into the session. Sustainability is always
    /// recomputed from the merged buildings, never taken from the record.
    pub fn apply_save(&mut self, save: &SaveData) {
        self.economy.restore(save.money, save.students, &save.buildings);
        info!(
            target: "sim.persistence",
            money = self.economy.money(),
            students = self.economy.students(),
            "save applied"
        );
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if self.phase == GamePhase::GameOver {
                continue;
            }
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SetIntent { intent, held } => {
                self.car.set_input(intent, held);
            }
            PlayerCommand::ToggleEngine => match self.car.toggle_engine() {
                EngineToggle::Starting { start_token } => {
                    self.clock
                        .schedule(self.engine_start_delay_ms, Intent::EngineReady { start_token });
                    self.events.push(GameEvent::EngineStarting);
                }
                EngineToggle::Stopped => self.events.push(GameEvent::EngineStopped),
            },
            PlayerCommand::Horn => self.events.push(GameEvent::Horn),
            PlayerCommand::UnlockBuilding { building_id } => {
                match self.economy.unlock_building(&building_id) {
                    Ok(cost) => self.events.push(GameEvent::BuildingUnlocked { building_id, cost }),
                    Err(error) => self.reject(building_id, error),
                }
            }
            PlayerCommand::PurchaseUpgrade { building_id, track } => {
                self.purchase_upgrade(building_id, track);
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    fn purchase_upgrade(&mut self, building_id: BuildingId, track: UpgradeTrack) {
        match self.economy.purchase_upgrade(&building_id, track) {
            Ok(receipt) => self.events.push(GameEvent::UpgradePurchased {
                building_id,
                track,
                level: receipt.level,
                cost: receipt.cost,
            }),
            Err(error) => self.reject(building_id, error),
        }
    }

    fn reject(&mut self, building_id: BuildingId, error: PurchaseError) {
        debug!(target: "sim.economy", building = %building_id, %error, "purchase rejected");
        self.events.push(GameEvent::PurchaseRejected {
            building_id,
            reason: error.reason(),
            cost: error.unaffordable_cost(),
        });
    }

    /// One frame, in dependency order: timers, car, enemies, run-over,
    /// then the slower economy cadences. Kills this frame therefore never
    /// count towards damage read in the same frame.
    fn run_frame(&mut self) {
        let ClockTick {
            economy_ticks,
            student_ticks,
            autosave_due,
            due,
        } = self.clock.advance();

        for intent in due {
            self.run_intent(intent);
        }

        // Car
        if let Some(event) = self.car.update(&self.spatial) {
            self.events.push(event);
        }

        // Enemies
        self.director.update(
            self.clock.now_ms(),
            self.economy.students(),
            self.economy.progression_level(),
            Some(self.car.position()),
            &mut self.rng,
            &mut self.events,
        );
        let hitbox = CarHitbox {
            position: self.car.position(),
            speed: self.car.speed(),
            engine_on: self.car.engine().is_on(),
        };
        self.director.check_collisions(Some(hitbox), &mut self.events);

        // Economy
        for _ in 0..economy_ticks {
            self.economy.tick_income();
        }
        for _ in 0..student_ticks {
            self.economy.tick_students(self.director.damage());
            if self.check_game_over() {
                return;
            }
        }

        if autosave_due {
            self.autosave_due = true;
        }
    }

    /// Scheduled work re-checks current state before acting.
    fn run_intent(&mut self, intent: Intent) {
        match intent {
            Intent::EngineReady { start_token } => {
                if self.car.finish_start(start_token) {
                    self.events.push(GameEvent::EngineRunning);
                }
            }
        }
    }

    fn check_game_over(&mut self) -> bool {
        let active_enemies = self.director.active_count();
        if self.economy.students() > 0 || active_enemies == 0 {
            return false;
        }
        info!(target: "sim.engine", active_enemies, "game over");
        self.phase = GamePhase::GameOver;
        self.clock.halt();
        self.autosave_due = false;
        self.events.push(GameEvent::GameOver { active_enemies });
        true
    }
}

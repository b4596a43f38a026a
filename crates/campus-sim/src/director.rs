//! Enemy director: owns the active enemy set and decides when and where new
//! enemies appear.
//!
//! Enemy configuration arrives independently of the rest of the session, so
//! every query has a safe answer while it is missing: no spawns, no damage,
//! and placeholder pacing numbers for diagnostics.

use hecs::{Entity, World};
use rand::Rng;
use tracing::{debug, info};

use campus_core::components::{Enemy, Lifecycle, Position};
use campus_core::config::EnemyConfig;
use campus_core::constants::*;
use campus_core::events::GameEvent;
use campus_core::state::{DirectorView, EnemyView};
use campus_core::types::Vec2;
use campus_enemy_ai::progression::{self, SpawnGate};
use campus_enemy_ai::spawn_select;

use crate::systems::{enemy_lifecycle, enemy_spawner, run_over};

/// Car state the run-over check needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarHitbox {
    pub position: Vec2,
    pub speed: f64,
    pub engine_on: bool,
}

pub struct EnemyDirector {
    world: World,
    config: Option<EnemyConfig>,
    last_spawn_ms: Option<u64>,
    next_enemy_id: u32,
    despawn_buffer: Vec<Entity>,
}

impl Default for EnemyDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyDirector {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            config: None,
            last_spawn_ms: None,
            next_enemy_id: 1,
            despawn_buffer: Vec::with_capacity(8),
        }
    }

    pub fn install_config(&mut self, config: EnemyConfig) {
        info!(
            target: "sim.enemy",
            spawn_points = config.spawn_points.len(),
            base_rate_ms = config.base_stats.spawn_rate_ms,
            "enemy config installed"
        );
        self.config = Some(config);
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub fn config(&self) -> Option<&EnemyConfig> {
        self.config.as_ref()
    }

    pub fn spawn_rate_ms(&self, progression_level: u32) -> u64 {
        match &self.config {
            Some(config) => progression::spawn_rate_ms(config, progression_level),
            None => SPAWN_RATE_UNCONFIGURED_MS,
        }
    }

    pub fn max_enemies(&self, students: u32) -> u32 {
        match &self.config {
            Some(config) => progression::max_enemies(config, students),
            None => MAX_ENEMIES_UNCONFIGURED,
        }
    }

    pub fn active_count(&self) -> u32 {
        enemy_spawner::active_count(&self.world)
    }

    pub fn can_spawn(&self, now_ms: u64, students: u32, progression_level: u32) -> bool {
        let Some(config) = &self.config else {
            return false;
        };
        let gate = SpawnGate {
            students,
            active_enemies: self.active_count(),
            progression_level,
            since_last_spawn_ms: self.last_spawn_ms.map(|last| now_ms.saturating_sub(last)),
        };
        progression::can_spawn(config, &gate)
    }

    /// One frame: maybe spawn, then advance every enemy's life cycle.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        students: u32,
        progression_level: u32,
        car_position: Option<Vec2>,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        if self.can_spawn(now_ms, students, progression_level) {
            self.try_spawn(now_ms, car_position, rng, events);
        }
        enemy_lifecycle::run(&mut self.world, &mut self.despawn_buffer, events);
    }

    fn try_spawn<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        car_position: Option<Vec2>,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(config) = &self.config else {
            return;
        };
        let anchor = car_position.unwrap_or(SPAWN_FALLBACK_ANCHOR);
        let occupied = enemy_spawner::occupied_spawn_points(&self.world);
        let Some(index) = spawn_select::select_spawn_point(&config.spawn_points, &occupied, anchor, rng)
        else {
            debug!(target: "sim.enemy", "no free spawn point");
            return;
        };

        let position = config.spawn_points[index].position();
        let hit_radius = config.base_stats.hit_radius;
        let enemy_id = self.next_enemy_id;
        self.next_enemy_id += 1;
        self.last_spawn_ms = Some(now_ms);

        enemy_spawner::spawn_enemy(&mut self.world, enemy_id, index, position, hit_radius);
        info!(target: "sim.enemy", enemy_id, spawn_point = index, "enemy spawned");
        events.push(GameEvent::EnemySpawned { enemy_id, position });
    }

    /// Run the car over any Idle enemy it is inside. A stopped or parked car
    /// never hits anything.
    pub fn check_collisions(&mut self, car: Option<CarHitbox>, events: &mut Vec<GameEvent>) -> u32 {
        let Some(car) = car else {
            return 0;
        };
        if !car.engine_on || car.speed.abs() < RUN_OVER_MIN_SPEED {
            return 0;
        }
        run_over::run(&mut self.world, car.position, events)
    }

    pub fn kill(&mut self, enemy_id: u32) -> bool {
        run_over::kill(&mut self.world, enemy_id)
    }

    /// Student loss inflicted by the current active set.
    pub fn damage(&self) -> u32 {
        match &self.config {
            Some(config) => self
                .active_count()
                .saturating_mul(config.base_stats.damage_per_enemy),
            None => 0,
        }
    }

    /// Active enemies in ascending id order.
    pub fn enemies(&self) -> Vec<EnemyView> {
        let mut views: Vec<EnemyView> = self
            .world
            .query::<(&Enemy, &Position, &Lifecycle)>()
            .iter()
            .map(|(_, (enemy, position, lifecycle))| EnemyView {
                id: enemy.id,
                position: position.0,
                life_state: lifecycle.state,
                frame: lifecycle.frame,
            })
            .collect();
        views.sort_by_key(|view| view.id);
        views
    }

    pub fn view(&self, students: u32, progression_level: u32) -> DirectorView {
        DirectorView {
            configured: self.is_configured(),
            active_enemies: self.active_count(),
            progression_level,
            spawn_rate_ms: self.spawn_rate_ms(progression_level),
            max_enemies: self.max_enemies(students),
        }
    }
}

#[cfg(test)]
mod tests {
    use campus_core::config::{EnemyBaseStats, EnemyProgression, SpawnPoint};
    use campus_core::enums::LifeState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn config() -> EnemyConfig {
        EnemyConfig {
            base_stats: EnemyBaseStats {
                spawn_rate_ms: 10_000,
                max_enemies: 2,
                min_students_to_spawn: 20,
                damage_per_enemy: 3,
                hit_radius: 24.0,
            },
            progression: EnemyProgression {
                spawn_rate_reduction_per_building: 1_000,
                spawn_rate_min_ms: 4_000,
                max_enemies_increase_at_students: vec![50, 100],
            },
            spawn_points: (0..6)
                .map(|i| SpawnPoint {
                    x: 100.0 + 300.0 * i as f64,
                    y: 200.0,
                })
                .collect(),
        }
    }

    fn configured() -> EnemyDirector {
        let mut director = EnemyDirector::new();
        director.install_config(config());
        director
    }

    #[test]
    fn unconfigured_director_is_inert() {
        let mut director = EnemyDirector::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        assert!(!director.can_spawn(0, 1_000, 10));
        director.update(0, 1_000, 10, None, &mut rng, &mut events);
        assert_eq!(director.active_count(), 0);
        assert_eq!(director.damage(), 0);
        assert_eq!(director.spawn_rate_ms(10), SPAWN_RATE_UNCONFIGURED_MS);
        assert_eq!(director.max_enemies(1_000), MAX_ENEMIES_UNCONFIGURED);
        assert!(events.is_empty());
    }

    #[test]
    fn first_spawn_is_immediate_then_paced() {
        let mut director = configured();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut events = Vec::new();

        director.update(0, 20, 0, None, &mut rng, &mut events);
        assert_eq!(director.active_count(), 1);
        assert!(matches!(events[0], GameEvent::EnemySpawned { enemy_id: 1, .. }));

        director.update(9_999, 20, 0, None, &mut rng, &mut events);
        assert_eq!(director.active_count(), 1);
        director.update(10_000, 20, 0, None, &mut rng, &mut events);
        assert_eq!(director.active_count(), 2);
    }

    #[test]
    fn too_few_students_blocks_spawn() {
        let director = configured();
        assert!(!director.can_spawn(0, 19, 0));
        assert!(director.can_spawn(0, 20, 0));
    }

    #[test]
    fn population_cap_blocks_spawn_regardless_of_time() {
        let mut director = configured();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut events = Vec::new();
        director.update(0, 20, 0, None, &mut rng, &mut events);
        director.update(10_000, 20, 0, None, &mut rng, &mut events);
        assert_eq!(director.active_count(), director.max_enemies(20));
        assert!(!director.can_spawn(1_000_000, 20, 0));
        // Crossing a threshold raises the cap.
        assert!(director.can_spawn(1_000_000, 50, 0));
    }

    #[test]
    fn spawns_use_distinct_points() {
        let mut director = configured();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut events = Vec::new();
        for step in 0..4u64 {
            director.update(step * 10_000, 500, 0, None, &mut rng, &mut events);
        }
        assert_eq!(director.active_count(), 4);
        let occupied = enemy_spawner::occupied_spawn_points(&director.world);
        let mut unique = occupied.clone();
        unique.dedup();
        assert_eq!(occupied, unique);
    }

    #[test]
    fn damage_scales_with_active_enemies() {
        let mut director = configured();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut events = Vec::new();
        director.update(0, 20, 0, None, &mut rng, &mut events);
        director.update(10_000, 20, 0, None, &mut rng, &mut events);
        assert_eq!(director.damage(), 6);
    }

    #[test]
    fn slow_or_parked_car_cannot_run_over() {
        let mut director = configured();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut events = Vec::new();
        director.update(0, 20, 0, None, &mut rng, &mut events);
        let target = director.enemies()[0].position;

        let slow = CarHitbox {
            position: target,
            speed: 0.1,
            engine_on: true,
        };
        assert_eq!(director.check_collisions(Some(slow), &mut events), 0);
        let off = CarHitbox {
            speed: 3.0,
            engine_on: false,
            ..slow
        };
        assert_eq!(director.check_collisions(Some(off), &mut events), 0);
        assert_eq!(director.check_collisions(None, &mut events), 0);

        let fast = CarHitbox {
            speed: -3.0,
            engine_on: true,
            ..slow
        };
        assert_eq!(director.check_collisions(Some(fast), &mut events), 1);
        assert_eq!(director.enemies()[0].life_state, LifeState::Dying);
    }

    #[test]
    fn killed_enemy_frees_its_point_after_dying() {
        let mut director = configured();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut events = Vec::new();
        director.update(0, 20, 0, None, &mut rng, &mut events);
        assert!(director.kill(1));
        assert!(!director.kill(1));

        // Still counts as active (and deals damage) while dying.
        assert_eq!(director.damage(), 3);
        for frame in 1..=29u64 {
            director.update(frame, 0, 0, None, &mut rng, &mut events);
        }
        assert_eq!(director.active_count(), 0);
        assert!(events.contains(&GameEvent::EnemyRemoved { enemy_id: 1 }));
    }
}

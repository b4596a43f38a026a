//! Car controller: engine state machine and per-frame kinematics.
//!
//! ```text
//! Off --toggle--> Starting --(start delay)--> Idle <--> Moving
//!  ^                 |                          |         |
//!  +-----toggle------+-----------toggle---------+---------+
//! ```
//!
//! Physics only runs while the engine is running (`Idle`/`Moving`).

use serde::{Deserialize, Serialize};
use tracing::debug;

use campus_core::config::CarStats;
use campus_core::constants::*;
use campus_core::enums::{DriveIntent, EngineState};
use campus_core::events::GameEvent;
use campus_core::state::CarView;
use campus_core::types::Vec2;

use crate::spatial::SpatialQuery;

/// Held state of each driving key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInput {
    pub accelerate: bool,
    pub reverse: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

impl DriveInput {
    pub fn set(&mut self, intent: DriveIntent, held: bool) {
        match intent {
            DriveIntent::Accelerate => self.accelerate = held,
            DriveIntent::Reverse => self.reverse = held,
            DriveIntent::SteerLeft => self.steer_left = held,
            DriveIntent::SteerRight => self.steer_right = held,
        }
    }
}

/// Result of toggling the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineToggle {
    /// A start was requested; the caller schedules the readiness check.
    Starting { start_token: u64 },
    Stopped,
}

#[derive(Debug, Clone)]
pub struct CarController {
    stats: CarStats,
    position: Vec2,
    /// Degrees.
    heading: f64,
    speed: f64,
    engine: EngineState,
    input: DriveInput,
    /// Incremented on every start request so a stale readiness check
    /// from an earlier attempt is ignored.
    start_token: u64,
}

impl CarController {
    pub fn new(stats: CarStats) -> Self {
        Self {
            position: stats.start_position,
            stats,
            heading: 0.0,
            speed: 0.0,
            engine: EngineState::Off,
            input: DriveInput::default(),
            start_token: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn engine(&self) -> EngineState {
        self.engine
    }

    pub fn is_moving(&self) -> bool {
        self.engine == EngineState::Moving
    }

    /// Put the car at a pose chosen by the scene (initial placement).
    pub fn place(&mut self, position: Vec2, heading: f64) {
        self.position = position;
        self.heading = heading.rem_euclid(360.0);
    }

    pub fn set_input(&mut self, intent: DriveIntent, held: bool) {
        self.input.set(intent, held);
    }

    pub fn view(&self) -> CarView {
        CarView {
            position: self.position,
            heading: self.heading,
            speed: self.speed,
            engine: self.engine,
            engine_on: self.engine.is_on(),
            moving: self.is_moving(),
        }
    }

    pub fn toggle_engine(&mut self) -> EngineToggle {
        if self.engine.is_on() {
            self.engine = EngineState::Off;
            self.speed = 0.0;
            debug!(target: "sim.car", "engine stopped");
            EngineToggle::Stopped
        } else {
            self.start_token += 1;
            self.engine = EngineState::Starting;
            debug!(target: "sim.car", start_token = self.start_token, "engine starting");
            EngineToggle::Starting {
                start_token: self.start_token,
            }
        }
    }

    /// Start delay elapsed. A no-op unless this exact start attempt is
    /// still pending.
    pub fn finish_start(&mut self, start_token: u64) -> bool {
        if self.engine != EngineState::Starting || start_token != self.start_token {
            return false;
        }
        self.engine = EngineState::Idle;
        debug!(target: "sim.car", "engine running");
        true
    }

    /// Advance one frame. Returns an event when the car crosses the moving
    /// threshold in either direction.
    pub fn update(&mut self, spatial: &SpatialQuery) -> Option<GameEvent> {
        if !self.engine.is_running() {
            return None;
        }

        self.apply_throttle();
        self.apply_steering();
        self.advance_position(spatial);
        self.update_motion_state()
    }

    fn apply_throttle(&mut self) {
        if self.input.accelerate {
            self.speed += self.stats.acceleration;
        } else if self.input.reverse {
            self.speed -= self.stats.acceleration;
        } else {
            self.speed *= self.stats.friction;
        }

        self.speed = self
            .speed
            .clamp(-self.stats.max_speed / 2.0, self.stats.max_speed);
        if self.speed.abs() < SPEED_SNAP_THRESHOLD {
            self.speed = 0.0;
        }
    }

    fn apply_steering(&mut self) {
        if self.speed.abs() <= MOVING_THRESHOLD {
            return;
        }
        // Reversing mirrors the steering.
        let direction = if self.speed > 0.0 { 1.0 } else { -1.0 };
        if self.input.steer_left {
            self.heading -= self.stats.rotation_speed * direction;
        }
        if self.input.steer_right {
            self.heading += self.stats.rotation_speed * direction;
        }
        self.heading = self.heading.rem_euclid(360.0);
    }

    fn advance_position(&mut self, spatial: &SpatialQuery) {
        let angle = (self.heading + self.stats.angle_offset).to_radians();
        let direction = Vec2::new(angle.cos(), angle.sin());

        let next = self.position + direction * self.speed;
        if spatial.can_occupy(next) {
            self.position = next;
            return;
        }

        // Blocked: lose energy, then try a small nudge so the car does not
        // stick to the obstacle edge.
        self.speed *= COLLISION_SPEED_RETAIN;
        let nudge = self.position + direction * (self.speed * NUDGE_STEP_FACTOR);
        if spatial.can_occupy(nudge) {
            self.position = nudge;
        }
    }

    fn update_motion_state(&mut self) -> Option<GameEvent> {
        let moving = self.speed.abs() > MOVING_THRESHOLD;
        match (self.engine, moving) {
            (EngineState::Idle, true) => {
                self.engine = EngineState::Moving;
                Some(GameEvent::StartedMoving)
            }
            (EngineState::Moving, false) => {
                self.engine = EngineState::Idle;
                Some(GameEvent::StoppedMoving)
            }
            _ => None,
        }
    }
}

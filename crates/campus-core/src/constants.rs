//! Simulation constants and tuning parameters.

use crate::types::Vec2;

// --- Cadences ---

/// Frame tick rate (Hz).
pub const FRAME_RATE: u32 = 60;

/// Microseconds per frame. The clock is integral so cadence boundaries
/// land on the same frame on every platform.
pub const FRAME_DURATION_US: u64 = 16_667;

/// Economic (income) tick period in milliseconds.
pub const ECONOMY_TICK_MS: u64 = 1_000;

/// Student gain/loss tick period in milliseconds.
pub const STUDENT_TICK_MS: u64 = 5_000;

/// Auto-save period in milliseconds.
pub const AUTOSAVE_INTERVAL_MS: u64 = 15_000;

/// Delay between an engine-start request and the engine running.
pub const ENGINE_START_DELAY_MS: u64 = 1_500;

// --- Economy ---

/// Money at the start of a fresh session.
pub const STARTING_MONEY: f64 = 1_000.0;

/// Income generated per student per economic tick.
pub const INCOME_PER_STUDENT: f64 = 0.5;

/// Maintenance per student per economic tick at 0% sustainability.
pub const MAINTENANCE_PER_STUDENT: f64 = 0.1;

/// Global multiplier applied to every upgrade price.
pub const GLOBAL_COST_MULTIPLIER: f64 = 1.0;

/// Highest level of any upgrade track.
pub const MAX_UPGRADE_LEVEL: u8 = 3;

/// Students gained per unlocked building per student tick, in tenths (0.5).
pub const STUDENT_GAIN_BASE_TENTHS: u32 = 5;

/// Extra students per course level per student tick, in tenths (0.2).
pub const STUDENT_GAIN_PER_COURSE_TENTHS: u32 = 2;

/// Extra students per infrastructure level per student tick, in tenths (0.1).
pub const STUDENT_GAIN_PER_INFRA_TENTHS: u32 = 1;

// --- Car ---

pub const CAR_MAX_SPEED: f64 = 8.0;
pub const CAR_ACCELERATION: f64 = 0.4;
pub const CAR_FRICTION: f64 = 0.85;

/// Degrees of heading change per frame while steering.
pub const CAR_ROTATION_SPEED: f64 = 5.0;

/// Spawn position of the car.
pub const CAR_START_POSITION: Vec2 = Vec2::new(1_000.0, 800.0);

/// Speeds with a smaller magnitude snap to zero.
pub const SPEED_SNAP_THRESHOLD: f64 = 0.1;

/// Minimum |speed| for steering to apply and for the car to count as moving.
pub const MOVING_THRESHOLD: f64 = 0.5;

/// Fraction of speed kept after hitting an obstacle.
pub const COLLISION_SPEED_RETAIN: f64 = 0.3;

/// Fraction of (post-collision) speed used for the fallback nudge step.
pub const NUDGE_STEP_FACTOR: f64 = 0.1;

/// Minimum |speed| for the car to run over an enemy.
pub const RUN_OVER_MIN_SPEED: f64 = 0.2;

// --- Playfield ---

/// Playable extent used when no boundary shape is configured.
pub const PLAYFIELD_WIDTH: f64 = 1_920.0;
pub const PLAYFIELD_HEIGHT: f64 = 1_080.0;

/// Building identifiers containing any of these keywords never block
/// movement. Matched case-insensitively.
pub const PARKING_KEYWORDS: [&str; 2] = ["parking", "estacionamento"];

// --- Enemies ---

/// Distance anchor for spawn selection when no car exists.
pub const SPAWN_FALLBACK_ANCHOR: Vec2 = Vec2::new(960.0, 540.0);

/// Never spawn at more than this many of the points nearest to the car.
pub const SPAWN_NEAREST_EXCLUDED: usize = 3;

/// Size of the "farthest" pool favoured by spawn selection.
pub const SPAWN_FARTHEST_POOL: usize = 3;

/// Probability of picking from the farthest pool.
pub const SPAWN_FARTHEST_BIAS: f64 = 0.8;

/// Last frame of the looping idle animation.
pub const ENEMY_IDLE_LAST_FRAME: u32 = 29;

/// First frame of the dying animation.
pub const ENEMY_DYING_FIRST_FRAME: u32 = 30;

/// Frame at which a dying enemy is removed.
pub const ENEMY_DYING_LAST_FRAME: u32 = 59;

/// Default radius of an enemy's hit circle.
pub const ENEMY_HIT_RADIUS: f64 = 24.0;

/// Spawn rate reported while no enemy configuration is loaded.
pub const SPAWN_RATE_UNCONFIGURED_MS: u64 = 999_999;

/// Population cap reported while no enemy configuration is loaded.
pub const MAX_ENEMIES_UNCONFIGURED: u32 = 1;

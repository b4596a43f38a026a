//! Static configuration: building catalog, enemy configuration, and tuning
//! settings for the economy, the car, and the playfield.
//!
//! Building and enemy data are loaded once from JSON. Default data sets are
//! bundled with the crate.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::UpgradeTrack;
use crate::types::{BuildingId, Vec2};

const BUNDLED_BUILDINGS: &str = include_str!("../data/buildings.json");
const BUNDLED_ENEMY: &str = include_str!("../data/enemy.json");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("building `{id}` is invalid: {reason}")]
    InvalidBuilding { id: String, reason: String },
    #[error("enemy configuration is invalid: {0}")]
    InvalidEnemy(String),
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ---- Buildings ----

/// One purchasable tier of an upgrade track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeTier {
    pub title: String,
    #[serde(default)]
    pub desc: String,
    pub base_cost: f64,
    #[serde(default)]
    pub students_bonus: Option<u32>,
    /// Informational only; sustainability is always recomputed from levels.
    #[serde(default)]
    pub sustain_bonus: Option<u32>,
}

fn default_cost_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingConfig {
    pub title: String,
    pub unlock_cost: f64,
    #[serde(default)]
    pub students_bonus: Option<u32>,
    #[serde(default = "default_cost_multiplier")]
    pub cost_multiplier: f64,
    #[serde(default)]
    pub course_upgrades: Vec<UpgradeTier>,
    #[serde(default)]
    pub infra_upgrades: Vec<UpgradeTier>,
    #[serde(default)]
    pub sustain_upgrades: Vec<UpgradeTier>,
}

impl BuildingConfig {
    pub fn track(&self, track: UpgradeTrack) -> &[UpgradeTier] {
        match track {
            UpgradeTrack::Course => &self.course_upgrades,
            UpgradeTrack::Infra => &self.infra_upgrades,
            UpgradeTrack::Sustain => &self.sustain_upgrades,
        }
    }

    pub fn has_track(&self, track: UpgradeTrack) -> bool {
        !self.track(track).is_empty()
    }

    pub fn has_upgrades(&self) -> bool {
        UpgradeTrack::ALL.iter().any(|t| self.has_track(*t))
    }

    fn validate(&self, id: &BuildingId) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBuilding {
            id: id.to_string(),
            reason,
        };
        if self.cost_multiplier.is_nan() || self.cost_multiplier <= 0.0 {
            return Err(invalid(format!(
                "cost_multiplier must be positive, got {}",
                self.cost_multiplier
            )));
        }
        if self.unlock_cost < 0.0 {
            return Err(invalid("unlock_cost must not be negative".into()));
        }
        for track in UpgradeTrack::ALL {
            let len = self.track(track).len();
            if len != 0 && len != MAX_UPGRADE_LEVEL as usize {
                return Err(invalid(format!(
                    "{} track has {len} tiers, expected 0 or {MAX_UPGRADE_LEVEL}",
                    track.as_str()
                )));
            }
        }
        Ok(())
    }
}

/// All configured buildings, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingCatalog {
    buildings: BTreeMap<BuildingId, BuildingConfig>,
}

impl BuildingCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let catalog: BuildingCatalog = serde_json::from_str(json)?;
        for (id, building) in &catalog.buildings {
            building.validate(id)?;
        }
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json_str(&read_file(path)?)
    }

    /// The building set shipped with the game.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json_str(BUNDLED_BUILDINGS)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (BuildingId, BuildingConfig)>) -> Self {
        Self {
            buildings: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, id: &BuildingId) -> Option<&BuildingConfig> {
        self.buildings.get(id)
    }

    pub fn contains(&self, id: &BuildingId) -> bool {
        self.buildings.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BuildingId, &BuildingConfig)> {
        self.buildings.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BuildingId> {
        self.buildings.keys()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }
}

// ---- Enemies ----

/// Fixed location where an enemy may appear. Identified by its index in
/// `EnemyConfig::spawn_points`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f64,
    pub y: f64,
}

impl SpawnPoint {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

fn default_hit_radius() -> f64 {
    ENEMY_HIT_RADIUS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBaseStats {
    pub spawn_rate_ms: u64,
    pub max_enemies: u32,
    pub min_students_to_spawn: u32,
    pub damage_per_enemy: u32,
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProgression {
    pub spawn_rate_reduction_per_building: u64,
    pub spawn_rate_min_ms: u64,
    #[serde(default)]
    pub max_enemies_increase_at_students: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub base_stats: EnemyBaseStats,
    pub progression: EnemyProgression,
    #[serde(default)]
    pub spawn_points: Vec<SpawnPoint>,
}

impl EnemyConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: EnemyConfig = serde_json::from_str(json)?;
        if config.base_stats.hit_radius < 0.0 {
            return Err(ConfigError::InvalidEnemy(
                "hit_radius must not be negative".into(),
            ));
        }
        config.progression.max_enemies_increase_at_students.sort_unstable();
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json_str(&read_file(path)?)
    }

    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json_str(BUNDLED_ENEMY)
    }
}

// ---- Tuning ----

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomySettings {
    pub starting_money: f64,
    pub income_per_student: f64,
    pub maintenance_per_student: f64,
    pub global_cost_multiplier: f64,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            starting_money: STARTING_MONEY,
            income_per_student: INCOME_PER_STUDENT,
            maintenance_per_student: MAINTENANCE_PER_STUDENT,
            global_cost_multiplier: GLOBAL_COST_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarStats {
    pub max_speed: f64,
    pub acceleration: f64,
    pub friction: f64,
    /// Degrees per frame.
    pub rotation_speed: f64,
    /// Added to the heading before projecting movement (degrees).
    pub angle_offset: f64,
    pub start_position: Vec2,
}

impl Default for CarStats {
    fn default() -> Self {
        Self {
            max_speed: CAR_MAX_SPEED,
            acceleration: CAR_ACCELERATION,
            friction: CAR_FRICTION,
            rotation_speed: CAR_ROTATION_SPEED,
            angle_offset: 0.0,
            start_position: CAR_START_POSITION,
        }
    }
}

/// Rectangle used as the playable area when no boundary shape is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayfieldExtent {
    pub width: f64,
    pub height: f64,
}

impl Default for PlayfieldExtent {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl PlayfieldExtent {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

/// Periods of the independent cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadences {
    pub economy_tick_ms: u64,
    pub student_tick_ms: u64,
    pub autosave_ms: u64,
    pub engine_start_delay_ms: u64,
}

impl Default for Cadences {
    fn default() -> Self {
        Self {
            economy_tick_ms: ECONOMY_TICK_MS,
            student_tick_ms: STUDENT_TICK_MS,
            autosave_ms: AUTOSAVE_INTERVAL_MS,
            engine_start_delay_ms: ENGINE_START_DELAY_MS,
        }
    }
}

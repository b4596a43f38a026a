//! Campus economy: money, students, sustainability and the per-building
//! unlock/upgrade ledger.
//!
//! `Economy` is the only writer of `WorldState`. Other components read it
//! through the accessors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use campus_core::config::{BuildingCatalog, EconomySettings, UpgradeTier};
use campus_core::constants::*;
use campus_core::enums::{RejectReason, UpgradeTrack};
use campus_core::types::BuildingId;

/// Unlock and upgrade levels of one building. Levels never decrease and
/// never exceed `MAX_UPGRADE_LEVEL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingState {
    pub unlocked: bool,
    pub course_level: u8,
    pub infra_level: u8,
    pub sustain_level: u8,
}

impl BuildingState {
    pub fn level(&self, track: UpgradeTrack) -> u8 {
        match track {
            UpgradeTrack::Course => self.course_level,
            UpgradeTrack::Infra => self.infra_level,
            UpgradeTrack::Sustain => self.sustain_level,
        }
    }

    fn level_mut(&mut self, track: UpgradeTrack) -> &mut u8 {
        match track {
            UpgradeTrack::Course => &mut self.course_level,
            UpgradeTrack::Infra => &mut self.infra_level,
            UpgradeTrack::Sustain => &mut self.sustain_level,
        }
    }

    /// Unlocked counts as one point, plus every upgrade level.
    pub fn progression_points(&self) -> u32 {
        u32::from(self.unlocked)
            + u32::from(self.course_level)
            + u32::from(self.infra_level)
            + u32::from(self.sustain_level)
    }
}

/// Session-wide economy state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub money: f64,
    pub students: u32,
    /// Derived from building levels; see [`sustainability_percent`].
    pub sustainability: u32,
    pub buildings: BTreeMap<BuildingId, BuildingState>,
}

/// A purchase the player could not make. None of these change state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseError {
    #[error("unknown building `{0}`")]
    UnknownBuilding(BuildingId),
    #[error("building `{0}` is already unlocked")]
    AlreadyUnlocked(BuildingId),
    #[error("building `{0}` must be unlocked first")]
    Locked(BuildingId),
    #[error("building `{building}` has no {} upgrades", .track.as_str())]
    TrackUnavailable {
        building: BuildingId,
        track: UpgradeTrack,
    },
    #[error("{} track of `{building}` is at max level", .track.as_str())]
    MaxLevel {
        building: BuildingId,
        track: UpgradeTrack,
    },
    #[error("insufficient funds: need {cost}, have {available}")]
    InsufficientFunds { cost: f64, available: f64 },
}

impl PurchaseError {
    pub fn reason(&self) -> RejectReason {
        match self {
            Self::UnknownBuilding(_) => RejectReason::UnknownBuilding,
            Self::AlreadyUnlocked(_) => RejectReason::AlreadyUnlocked,
            Self::Locked(_) => RejectReason::Locked,
            Self::TrackUnavailable { .. } => RejectReason::TrackUnavailable,
            Self::MaxLevel { .. } => RejectReason::MaxLevel,
            Self::InsufficientFunds { .. } => RejectReason::InsufficientFunds,
        }
    }

    pub fn unaffordable_cost(&self) -> Option<f64> {
        match self {
            Self::InsufficientFunds { cost, .. } => Some(*cost),
            _ => None,
        }
    }
}

/// Outcome of one income tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeReport {
    pub income: f64,
    pub maintenance: f64,
    pub profit: f64,
    /// Negative profit is never applied.
    pub applied: bool,
}

/// Outcome of one student tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentReport {
    pub gain: u32,
    pub loss: u32,
    pub students: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeReceipt {
    pub level: u8,
    pub cost: f64,
    pub students_bonus: u32,
}

/// What the upgrade panel shows for the next tier of a track.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeOffer {
    pub track: UpgradeTrack,
    pub next_level: u8,
    pub title: String,
    pub desc: String,
    pub cost: f64,
}

/// Sustainability in percent: sustain levels of unlocked buildings over the
/// maximum attainable by every building that has a sustain track. Pure; no
/// history is involved. Zero when no building has a sustain track.
pub fn sustainability_percent(
    catalog: &BuildingCatalog,
    buildings: &BTreeMap<BuildingId, BuildingState>,
) -> u32 {
    let mut tracks = 0u32;
    let mut levels = 0u32;
    for (id, config) in catalog.iter() {
        if !config.has_track(UpgradeTrack::Sustain) {
            continue;
        }
        tracks += 1;
        if let Some(state) = buildings.get(id) {
            if state.unlocked {
                levels += u32::from(state.sustain_level);
            }
        }
    }
    if tracks == 0 {
        return 0;
    }
    100 * levels / (u32::from(MAX_UPGRADE_LEVEL) * tracks)
}

#[derive(Debug, Clone)]
pub struct Economy {
    catalog: BuildingCatalog,
    settings: EconomySettings,
    state: WorldState,
}

impl Economy {
    /// Fresh session: every configured building locked at level 0.
    pub fn new(catalog: BuildingCatalog, settings: EconomySettings) -> Self {
        let buildings = catalog
            .ids()
            .map(|id| (id.clone(), BuildingState::default()))
            .collect();
        let state = WorldState {
            money: settings.starting_money,
            students: 0,
            sustainability: 0,
            buildings,
        };
        let mut economy = Self {
            catalog,
            settings,
            state,
        };
        economy.refresh_sustainability();
        economy
    }

    /// Start from existing numbers, merging `buildings` key-by-key onto the
    /// fresh building map. Keys with no configured building are ignored and
    /// levels above the max are clamped.
    pub fn with_state(
        catalog: BuildingCatalog,
        settings: EconomySettings,
        money: f64,
        students: u32,
        buildings: &BTreeMap<BuildingId, BuildingState>,
    ) -> Self {
        let mut economy = Self::new(catalog, settings);
        economy.restore(money, students, buildings);
        economy
    }

    /// Overwrite numbers and merge building states, as on loading a save.
    pub fn restore(
        &mut self,
        money: f64,
        students: u32,
        buildings: &BTreeMap<BuildingId, BuildingState>,
    ) {
        self.state.money = if money.is_finite() {
            money.max(0.0)
        } else {
            self.settings.starting_money
        };
        self.state.students = students;
        for (id, saved) in buildings {
            if let Some(current) = self.state.buildings.get_mut(id) {
                *current = BuildingState {
                    unlocked: saved.unlocked,
                    course_level: saved.course_level.min(MAX_UPGRADE_LEVEL),
                    infra_level: saved.infra_level.min(MAX_UPGRADE_LEVEL),
                    sustain_level: saved.sustain_level.min(MAX_UPGRADE_LEVEL),
                };
            } else {
                debug!(target: "sim.economy", building = %id, "ignoring saved state for unknown building");
            }
        }
        self.refresh_sustainability();
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn catalog(&self) -> &BuildingCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &EconomySettings {
        &self.settings
    }

    pub fn money(&self) -> f64 {
        self.state.money
    }

    pub fn students(&self) -> u32 {
        self.state.students
    }

    pub fn sustainability(&self) -> u32 {
        self.state.sustainability
    }

    pub fn building(&self, id: &BuildingId) -> Option<&BuildingState> {
        self.state.buildings.get(id)
    }

    /// Sum of unlocked buildings and all upgrade levels.
    pub fn progression_level(&self) -> u32 {
        self.state
            .buildings
            .values()
            .map(BuildingState::progression_points)
            .sum()
    }

    fn refresh_sustainability(&mut self) {
        self.state.sustainability = sustainability_percent(&self.catalog, &self.state.buildings);
    }

    // ---- Periodic ticks ----

    /// Apply one economic tick. Only positive profit is banked.
    pub fn tick_income(&mut self) -> IncomeReport {
        let students = f64::from(self.state.students);
        let income = students * self.settings.income_per_student;
        let maintenance = students
            * self.settings.maintenance_per_student
            * (1.0 - f64::from(self.state.sustainability) / 100.0);
        let profit = income - maintenance;
        let applied = profit > 0.0;
        if applied {
            self.state.money += profit;
        }
        debug!(target: "sim.economy", income, maintenance, profit, money = self.state.money, "income tick");
        IncomeReport {
            income,
            maintenance,
            profit,
            applied,
        }
    }

    /// Students gained this tick from unlocked buildings, floored.
    pub fn student_gain(&self) -> u32 {
        // Summed in tenths so the floor is exact.
        let tenths: u32 = self
            .state
            .buildings
            .values()
            .filter(|b| b.unlocked)
            .map(|b| {
                STUDENT_GAIN_BASE_TENTHS
                    + STUDENT_GAIN_PER_COURSE_TENTHS * u32::from(b.course_level)
                    + STUDENT_GAIN_PER_INFRA_TENTHS * u32::from(b.infra_level)
            })
            .sum();
        tenths / 10
    }

    /// Apply one student tick: gain from buildings, `loss` from enemies.
    pub fn tick_students(&mut self, loss: u32) -> StudentReport {
        let gain = self.student_gain();
        let students = (i64::from(self.state.students) + i64::from(gain) - i64::from(loss)).max(0);
        self.state.students = u32::try_from(students).unwrap_or(u32::MAX);
        debug!(target: "sim.economy", gain, loss, students = self.state.students, "student tick");
        StudentReport {
            gain,
            loss,
            students: self.state.students,
        }
    }

    // ---- Purchases ----

    pub fn unlock_building(&mut self, id: &BuildingId) -> Result<f64, PurchaseError> {
        let config = self
            .catalog
            .get(id)
            .ok_or_else(|| PurchaseError::UnknownBuilding(id.clone()))?;
        let state = self
            .state
            .buildings
            .get_mut(id)
            .ok_or_else(|| PurchaseError::UnknownBuilding(id.clone()))?;
        if state.unlocked {
            return Err(PurchaseError::AlreadyUnlocked(id.clone()));
        }
        let cost = config.unlock_cost;
        if self.state.money < cost {
            return Err(PurchaseError::InsufficientFunds {
                cost,
                available: self.state.money,
            });
        }

        self.state.money -= cost;
        state.unlocked = true;
        if let Some(bonus) = config.students_bonus {
            self.state.students = self.state.students.saturating_add(bonus);
        }
        self.refresh_sustainability();
        info!(target: "sim.economy", building = %id, cost, "building unlocked");
        Ok(cost)
    }

    /// Next tier of a track, or an error explaining why none can be bought.
    fn next_tier(
        &self,
        id: &BuildingId,
        track: UpgradeTrack,
    ) -> Result<(&UpgradeTier, u8, f64), PurchaseError> {
        let config = self
            .catalog
            .get(id)
            .ok_or_else(|| PurchaseError::UnknownBuilding(id.clone()))?;
        let state = self
            .state
            .buildings
            .get(id)
            .ok_or_else(|| PurchaseError::UnknownBuilding(id.clone()))?;
        if !state.unlocked {
            return Err(PurchaseError::Locked(id.clone()));
        }
        let tiers = config.track(track);
        if tiers.is_empty() {
            return Err(PurchaseError::TrackUnavailable {
                building: id.clone(),
                track,
            });
        }
        let level = state.level(track);
        let Some(tier) = tiers.get(usize::from(level)).filter(|_| level < MAX_UPGRADE_LEVEL) else {
            return Err(PurchaseError::MaxLevel {
                building: id.clone(),
                track,
            });
        };
        let cost =
            (tier.base_cost * self.settings.global_cost_multiplier * config.cost_multiplier).floor();
        Ok((tier, level, cost))
    }

    /// Price and description of the next tier, or `None` at max level, on an
    /// empty track, or for a locked building.
    pub fn upgrade_offer(&self, id: &BuildingId, track: UpgradeTrack) -> Option<UpgradeOffer> {
        let (tier, level, cost) = self.next_tier(id, track).ok()?;
        Some(UpgradeOffer {
            track,
            next_level: level + 1,
            title: tier.title.clone(),
            desc: tier.desc.clone(),
            cost,
        })
    }

    /// Whether the building shows an upgrade panel at all.
    pub fn has_upgrade_panel(&self, id: &BuildingId) -> bool {
        self.catalog.get(id).is_some_and(|config| config.has_upgrades())
    }

    /// Tracks that exist for this building. Empty tracks are never offered.
    pub fn available_tracks(&self, id: &BuildingId) -> Vec<UpgradeTrack> {
        match self.catalog.get(id) {
            Some(config) => UpgradeTrack::ALL
                .into_iter()
                .filter(|t| config.has_track(*t))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn purchase_upgrade(
        &mut self,
        id: &BuildingId,
        track: UpgradeTrack,
    ) -> Result<UpgradeReceipt, PurchaseError> {
        let (tier, level, cost) = self.next_tier(id, track)?;
        let students_bonus = tier.students_bonus.unwrap_or(0);
        if self.state.money < cost {
            return Err(PurchaseError::InsufficientFunds {
                cost,
                available: self.state.money,
            });
        }

        self.state.money -= cost;
        let new_level = level + 1;
        if let Some(state) = self.state.buildings.get_mut(id) {
            *state.level_mut(track) = new_level;
        }
        self.state.students = self.state.students.saturating_add(students_bonus);
        self.refresh_sustainability();
        info!(
            target: "sim.economy",
            building = %id,
            track = track.as_str(),
            level = new_level,
            cost,
            "upgrade purchased"
        );
        Ok(UpgradeReceipt {
            level: new_level,
            cost,
            students_bonus,
        })
    }
}

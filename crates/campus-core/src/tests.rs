use crate::commands::PlayerCommand;
use crate::config::*;
use crate::constants::*;
use crate::enums::*;
use crate::events::GameEvent;
use crate::input::{control_for_key, Control, KeyState};
use crate::state::GameStateSnapshot;
use crate::types::{BuildingId, SimTime, Vec2};

#[test]
fn test_upgrade_track_serde_is_snake_case() {
    for track in UpgradeTrack::ALL {
        let json = serde_json::to_string(&track).unwrap();
        assert_eq!(json, format!("\"{}\"", track.as_str()));
        let back: UpgradeTrack = serde_json::from_str(&json).unwrap();
        assert_eq!(track, back);
    }
}

#[test]
fn test_upgrade_track_parse() {
    assert_eq!(UpgradeTrack::parse("Course"), Some(UpgradeTrack::Course));
    assert_eq!(UpgradeTrack::parse("infrastructure"), Some(UpgradeTrack::Infra));
    assert_eq!(UpgradeTrack::parse("sustain"), Some(UpgradeTrack::Sustain));
    assert_eq!(UpgradeTrack::parse("marketing"), None);
}

#[test]
fn test_engine_state_predicates() {
    assert!(!EngineState::Off.is_on());
    assert!(EngineState::Starting.is_on());
    assert!(!EngineState::Starting.is_running());
    assert!(EngineState::Idle.is_running());
    assert!(EngineState::Moving.is_running());
}

#[test]
fn test_command_serde_tagged() {
    let cmd = PlayerCommand::PurchaseUpgrade {
        building_id: BuildingId::new("library"),
        track: UpgradeTrack::Sustain,
    };
    let json = serde_json::to_string(&cmd).unwrap();
    assert!(json.contains("\"type\":\"PurchaseUpgrade\""));
    assert!(json.contains("\"building_id\":\"library\""));
    let back: PlayerCommand = serde_json::from_str(&json).unwrap();
    assert_eq!(cmd, back);
}

#[test]
fn test_event_serde_tagged() {
    let event = GameEvent::PurchaseRejected {
        building_id: BuildingId::new("auditorium"),
        reason: RejectReason::InsufficientFunds,
        cost: Some(3000.0),
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"reason\":\"insufficient_funds\""));
    let back: GameEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(event, back);
}

#[test]
fn test_default_snapshot_serializes() {
    let snapshot = GameStateSnapshot::default();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.phase, GamePhase::Active);
    assert!(back.enemies.is_empty());
}

#[test]
fn test_sim_time_advance() {
    let mut time = SimTime::default();
    for _ in 0..60 {
        time.advance();
    }
    assert_eq!(time.frame, 60);
    assert_eq!(time.elapsed_us, 60 * FRAME_DURATION_US);
    // 60 frames land just past one second.
    assert_eq!(time.elapsed_ms(), 1_000);
}

#[test]
fn test_parking_detection_is_case_insensitive() {
    assert!(BuildingId::new("parking_south").is_parking());
    assert!(BuildingId::new("North_PARKING").is_parking());
    assert!(!BuildingId::new("library").is_parking());
}

#[test]
fn test_portuguese_parking_ids_are_parking() {
    assert!(BuildingId::new("estacionamento_norte").is_parking());
    assert!(BuildingId::new("Estacionamento").is_parking());
    assert!(!BuildingId::new("biblioteca").is_parking());
}

// ---- Configuration ----

#[test]
fn test_bundled_buildings_load() {
    let catalog = BuildingCatalog::bundled().unwrap();
    assert!(catalog.len() >= 10);
    let library = catalog.get(&BuildingId::new("library")).unwrap();
    assert_eq!(library.course_upgrades.len(), MAX_UPGRADE_LEVEL as usize);
    assert!(library.has_upgrades());

    let parking = catalog.get(&BuildingId::new("parking_south")).unwrap();
    assert!(!parking.has_upgrades());
}

#[test]
fn test_bundled_enemy_config_loads() {
    let config = EnemyConfig::bundled().unwrap();
    assert!(!config.spawn_points.is_empty());
    assert!(config.progression.spawn_rate_min_ms <= config.base_stats.spawn_rate_ms);
    let thresholds = &config.progression.max_enemies_increase_at_students;
    assert!(thresholds.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_building_defaults_applied() {
    let json = r#"{ "kiosk": { "title": "Kiosk", "unlock_cost": 50 } }"#;
    let catalog = BuildingCatalog::from_json_str(json).unwrap();
    let kiosk = catalog.get(&BuildingId::new("kiosk")).unwrap();
    assert_eq!(kiosk.cost_multiplier, 1.0);
    assert_eq!(kiosk.students_bonus, None);
    assert!(!kiosk.has_track(UpgradeTrack::Course));
}

#[test]
fn test_building_with_partial_track_rejected() {
    let json = r#"{
        "lab": {
            "title": "Lab",
            "unlock_cost": 100,
            "course_upgrades": [
                { "title": "A", "base_cost": 10 },
                { "title": "B", "base_cost": 20 }
            ]
        }
    }"#;
    let err = BuildingCatalog::from_json_str(json).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBuilding { ref id, .. } if id == "lab"));
}

#[test]
fn test_building_with_zero_multiplier_rejected() {
    let json = r#"{ "lab": { "title": "Lab", "unlock_cost": 100, "cost_multiplier": 0 } }"#;
    assert!(matches!(
        BuildingCatalog::from_json_str(json),
        Err(ConfigError::InvalidBuilding { .. })
    ));
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(
        BuildingCatalog::from_json_str("{ not json"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        EnemyConfig::from_json_str("[]"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("campus_core_missing_config.json");
    let _ = std::fs::remove_file(&path);
    assert!(matches!(
        BuildingCatalog::from_path(&path),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_enemy_thresholds_sorted_on_load() {
    let json = r#"{
        "base_stats": { "spawn_rate_ms": 1000, "max_enemies": 1,
                        "min_students_to_spawn": 0, "damage_per_enemy": 1 },
        "progression": { "spawn_rate_reduction_per_building": 10, "spawn_rate_min_ms": 100,
                         "max_enemies_increase_at_students": [300, 10, 100] },
        "spawn_points": [ { "x": 1, "y": 2 } ]
    }"#;
    let config = EnemyConfig::from_json_str(json).unwrap();
    assert_eq!(
        config.progression.max_enemies_increase_at_students,
        vec![10, 100, 300]
    );
    assert_eq!(config.base_stats.hit_radius, ENEMY_HIT_RADIUS);
    assert_eq!(config.spawn_points[0].position(), Vec2::new(1.0, 2.0));
}

#[test]
fn test_playfield_extent_edges_inclusive() {
    let extent = PlayfieldExtent::default();
    assert!(extent.contains(Vec2::new(0.0, 0.0)));
    assert!(extent.contains(Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)));
    assert!(!extent.contains(Vec2::new(-0.1, 10.0)));
    assert!(!extent.contains(Vec2::new(10.0, PLAYFIELD_HEIGHT + 1.0)));
}

// ---- Input ----

#[test]
fn test_key_mapping() {
    assert_eq!(
        control_for_key("ArrowUp"),
        Some(Control::Drive(DriveIntent::Accelerate))
    );
    assert_eq!(
        control_for_key("S"),
        Some(Control::Drive(DriveIntent::Reverse))
    );
    assert_eq!(control_for_key("e"), Some(Control::ToggleEngine));
    assert_eq!(control_for_key("h"), Some(Control::Horn));
    assert_eq!(control_for_key("q"), None);
}

#[test]
fn test_key_repeat_is_not_counted_twice() {
    let mut keys = KeyState::new();
    assert_eq!(
        keys.key_down("d"),
        Some(PlayerCommand::SetIntent {
            intent: DriveIntent::SteerRight,
            held: true
        })
    );
    assert_eq!(keys.key_down("d"), None);
    assert_eq!(
        keys.key_up("d"),
        Some(PlayerCommand::SetIntent {
            intent: DriveIntent::SteerRight,
            held: false
        })
    );
    assert!(!keys.is_held(Control::Drive(DriveIntent::SteerRight)));
}

#[test]
fn test_engine_toggle_fires_once_per_press() {
    let mut keys = KeyState::new();
    assert_eq!(keys.key_down("e"), Some(PlayerCommand::ToggleEngine));
    assert_eq!(keys.key_down("e"), None);
    assert_eq!(keys.key_down("E"), None);
    assert_eq!(keys.key_up("e"), None);
    assert_eq!(keys.key_down("e"), Some(PlayerCommand::ToggleEngine));

    assert_eq!(keys.key_down("h"), Some(PlayerCommand::Horn));
    assert_eq!(keys.key_down("h"), None);
}

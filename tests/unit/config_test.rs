//! Tests for configuration parsing, validation and clamping

use lfg_scheduler::config::{
    parse_integer, BatchRange, RawArgs, SimulationConfig, MAX_INSTANCES, MAX_PLAYERS,
};
use lfg_scheduler::core::{ConfigError, ResourceCounts};

fn raw(instances: i64, tanks: i64, healers: i64, dps: i64, t1: i64, t2: i64) -> RawArgs {
    RawArgs {
        instances,
        tanks,
        healers,
        dps,
        t1,
        t2,
        bonus_duration: None,
    }
}

#[test]
fn test_from_raw_valid() {
    let cfg = SimulationConfig::from_raw(raw(3, 5, 4, 12, 2, 6)).unwrap();
    assert_eq!(cfg.instances, 3);
    assert_eq!(cfg.bonus_duration_secs, 0);
    let validated = cfg.validate().unwrap();
    assert_eq!(validated.initial(), ResourceCounts::new(5, 4, 12));
    assert_eq!(validated.durations(), 2..=6);
}

#[test]
fn test_from_raw_rejects_negative_players() {
    let err = SimulationConfig::from_raw(raw(1, -1, 1, 3, 1, 1)).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_from_raw_rejects_zero_instances() {
    assert!(SimulationConfig::from_raw(raw(0, 1, 1, 3, 1, 1)).is_err());
}

#[test]
fn test_from_raw_rejects_inverted_time_range() {
    assert!(SimulationConfig::from_raw(raw(1, 1, 1, 3, 5, 2)).is_err());
    assert!(SimulationConfig::from_raw(raw(1, 1, 1, 3, 0, 2)).is_err());
}

#[test]
fn test_from_raw_rejects_negative_bonus() {
    let mut args = raw(1, 1, 1, 3, 1, 1);
    args.bonus_duration = Some(-5);
    assert!(SimulationConfig::from_raw(args).is_err());
}

#[test]
fn test_from_raw_huge_duration_is_clamped() {
    let cfg = SimulationConfig::from_raw(raw(1, 1, 1, 3, 1, 10_000_000_000))
        .unwrap()
        .validate()
        .unwrap();
    assert_eq!(cfg.durations(), 1..=15);
    assert_eq!(cfg.clamps().len(), 1);
}

#[test]
fn test_validate_caps() {
    assert!(SimulationConfig::new(MAX_INSTANCES, 1, 1, 3, 1, 1)
        .validate()
        .is_ok());
    assert!(SimulationConfig::new(MAX_INSTANCES + 1, 1, 1, 3, 1, 1)
        .validate()
        .is_err());
    assert!(SimulationConfig::new(1, MAX_PLAYERS + 1, 1, 3, 1, 1)
        .validate()
        .is_err());
}

#[test]
fn test_validate_rejects_inverted_batch_range() {
    let mut cfg = SimulationConfig::new(1, 1, 1, 3, 1, 1);
    cfg.bonus_dps = BatchRange { min: 4, max: 2 };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_min_follows_clamped_max() {
    let cfg = SimulationConfig::new(1, 1, 1, 3, 16, 40).validate().unwrap();
    assert_eq!(cfg.durations(), 15..=15);
}

#[test]
fn test_from_json_applies_defaults() {
    let json = r#"{
        "instances": 2,
        "tanks": 4,
        "healers": 4,
        "dps": 12,
        "min_duration": 1,
        "max_duration": 3
    }"#;

    let cfg = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.tick_ms, 1_000);
    assert_eq!(cfg.poll_interval_ms, 500);
    assert!((cfg.generation_probability - 0.3).abs() < f64::EPSILON);
    assert_eq!(cfg.bonus_dps, BatchRange { min: 0, max: 5 });
    assert_eq!(cfg.seed, None);

    let generator = cfg.validate().unwrap().generator();
    assert_eq!(generator.tanks, 0..=2);
    assert_eq!(generator.budget, None);
}

#[test]
fn test_from_json_rejects_garbage() {
    let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_parse_integer_negative() {
    assert_eq!(parse_integer("t1", "-3"), Ok(-3));
}

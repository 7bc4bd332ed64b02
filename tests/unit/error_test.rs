//! Tests for error types

use lfg_scheduler::core::{ConfigError, SimulationError};

#[test]
fn test_malformed_error() {
    let err = ConfigError::Malformed {
        field: "tanks",
        value: "abc".to_string(),
    };
    assert_eq!(format!("{}", err), "tanks must be a valid integer, got `abc`");
}

#[test]
fn test_too_large_error() {
    let err = ConfigError::TooLarge {
        field: "dps",
        value: "99999999999999999999".to_string(),
    };
    assert_eq!(format!("{}", err), "dps value too large: `99999999999999999999`");
}

#[test]
fn test_validation_error() {
    let err = ConfigError::Validation("too many instances (max: 100)".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: too many instances (max: 100)"
    );
}

#[test]
fn test_config_error_is_transparent_in_simulation_error() {
    let err: SimulationError = ConfigError::Validation("bad".to_string()).into();
    assert_eq!(format!("{}", err), "invalid configuration: bad");
}

#[test]
fn test_task_panicked_error() {
    let err = SimulationError::TaskPanicked("lfg-instance-3".to_string());
    assert_eq!(format!("{}", err), "task lfg-instance-3 panicked");
}

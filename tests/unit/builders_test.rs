//! Tests for simulation builders

use lfg_scheduler::builders::SimulationBuilder;
use lfg_scheduler::config::SimulationConfig;
use lfg_scheduler::core::{ResourceCounts, SimulationError};
use std::time::Duration;

#[test]
fn test_build_applies_overrides() {
    let simulation = SimulationBuilder::new(SimulationConfig::new(2, 3, 3, 9, 1, 2))
        .seed(Some(99))
        .tick_ms(Some(20))
        .build()
        .unwrap();

    assert_eq!(simulation.config().seed(), Some(99));
    assert_eq!(simulation.config().tick(), Duration::from_millis(20));
    assert_eq!(simulation.pool().snapshot_counts(), ResourceCounts::new(3, 3, 9));
}

#[test]
fn test_absent_overrides_keep_config() {
    let simulation = SimulationBuilder::new(SimulationConfig::new(1, 1, 1, 3, 1, 1).with_seed(5))
        .seed(None)
        .tick_ms(None)
        .build()
        .unwrap();

    assert_eq!(simulation.config().seed(), Some(5));
    assert_eq!(simulation.config().tick(), Duration::from_secs(1));
}

#[test]
fn test_build_rejects_invalid_config() {
    let result = SimulationBuilder::new(SimulationConfig::new(0, 1, 1, 3, 1, 1)).build();
    assert!(matches!(result, Err(SimulationError::Config(_))));
}

//! Configuration models, validation and clamping.

pub mod simulation;

pub use simulation::{
    parse_integer, BatchRange, DurationClamp, RawArgs, SimulationConfig, ValidatedConfig,
    MAX_DURATION, MAX_INSTANCES, MAX_PLAYERS,
};

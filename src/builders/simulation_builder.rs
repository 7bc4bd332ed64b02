//! Builder to construct a simulation from configuration plus overrides.

use crate::config::SimulationConfig;
use crate::core::{EventSink, Simulation, SimulationError};

/// Layers command-line overrides over a base configuration and validates
/// the result into a ready-to-run [`Simulation`].
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    config: SimulationConfig,
    events: EventSink,
}

impl SimulationBuilder {
    /// Start from `config` with events discarded.
    #[must_use]
    pub const fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            events: EventSink::none(),
        }
    }

    /// Override the random seed when `seed` is set.
    #[must_use]
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        if let Some(seed) = seed {
            self.config.seed = Some(seed);
        }
        self
    }

    /// Override the real length of a simulated second when `tick_ms` is set.
    #[must_use]
    pub fn tick_ms(mut self, tick_ms: Option<u64>) -> Self {
        if let Some(tick_ms) = tick_ms {
            self.config.tick_ms = tick_ms;
        }
        self
    }

    /// Publish run events to `events`.
    #[must_use]
    pub fn events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::Config` when validation fails.
    pub fn build(self) -> Result<Simulation, SimulationError> {
        let config = self.config.validate()?;
        tracing::debug!(
            instances = config.instances(),
            bonus_duration_secs = config.bonus_duration_secs(),
            "simulation configured"
        );
        Ok(Simulation::new(config, self.events))
    }
}

//! Background player generator.
//!
//! Dormant until the first instance fails to form a party, then deposits a
//! random batch with a fixed probability every poll interval. A finite budget
//! makes the generator end the whole simulation when it runs out.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use super::events::{EventSink, SimulationEvent};
use super::resource_pool::{Activation, ResourceCounts, ResourcePool};
use crate::util::random::RandomSource;

/// Tuning for the generator's production loop.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    /// Time between production attempts.
    pub poll_interval: Duration,
    /// Probability that a tick produces a batch.
    pub probability: f64,
    /// Tanks per batch.
    pub tanks: RangeInclusive<u32>,
    /// Healers per batch.
    pub healers: RangeInclusive<u32>,
    /// Damage dealers per batch.
    pub dps: RangeInclusive<u32>,
    /// Production lifetime measured from activation; `None` is unbounded.
    pub budget: Option<Duration>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            probability: 0.3,
            tanks: 0..=2,
            healers: 0..=2,
            dps: 0..=5,
            budget: None,
        }
    }
}

/// Players injected by the generator over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorStats {
    /// Tanks added.
    pub tanks_added: u64,
    /// Healers added.
    pub healers_added: u64,
    /// Damage dealers added.
    pub dps_added: u64,
}

impl GeneratorStats {
    /// Players added across all roles.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.tanks_added + self.healers_added + self.dps_added
    }

    fn record(&mut self, batch: ResourceCounts) {
        self.tanks_added += u64::from(batch.tanks);
        self.healers_added += u64::from(batch.healers);
        self.dps_added += u64::from(batch.dps);
    }
}

/// The single producer task.
pub struct ResourceGenerator<R> {
    pool: Arc<ResourcePool>,
    rng: R,
    settings: GeneratorSettings,
    events: EventSink,
}

impl<R: RandomSource> ResourceGenerator<R> {
    /// Create a generator feeding `pool`.
    pub const fn new(
        pool: Arc<ResourcePool>,
        rng: R,
        settings: GeneratorSettings,
        events: EventSink,
    ) -> Self {
        Self {
            pool,
            rng,
            settings,
            events,
        }
    }

    /// Wait for activation, produce until the budget expires or the
    /// simulation ends, and return what was produced.
    pub fn run(mut self) -> GeneratorStats {
        let span = tracing::debug_span!("generator");
        let _enter = span.enter();
        let mut stats = GeneratorStats::default();

        if self.pool.wait_for_activation() == Activation::Ended {
            debug!("simulation ended before generator activation");
            return stats;
        }
        info!(budget = ?self.settings.budget, "generator active");

        let started = Instant::now();
        loop {
            if let Some(budget) = self.settings.budget {
                if started.elapsed() >= budget {
                    if self.pool.end_simulation() {
                        info!("generator budget spent, ending simulation");
                        self.events.emit(SimulationEvent::BonusExpired);
                    }
                    break;
                }
            }

            if let Some(batch) = self.roll_batch() {
                self.pool.deposit(batch);
                stats.record(batch);
                debug!(
                    tanks = batch.tanks,
                    healers = batch.healers,
                    dps = batch.dps,
                    "players added"
                );
                self.events.emit(SimulationEvent::PlayersAdded { batch });
            }

            if !self.pool.pause(self.settings.poll_interval) {
                debug!("simulation ended, generator stopping");
                break;
            }
        }

        stats
    }

    /// Draw this tick's batch, if the tick produces a non-empty one.
    fn roll_batch(&mut self) -> Option<ResourceCounts> {
        if !self.rng.chance(self.settings.probability) {
            return None;
        }
        let batch = ResourceCounts::new(
            self.rng.uniform(self.settings.tanks.clone()),
            self.rng.uniform(self.settings.healers.clone()),
            self.rng.uniform(self.settings.dps.clone()),
        );
        (!batch.is_empty()).then_some(batch)
    }
}

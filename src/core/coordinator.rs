//! Simulation coordinator.
//!
//! Starts one OS thread per instance plus the generator thread, joins the
//! instances, forces shutdown for generators that would otherwise run
//! forever, then joins the generator and collects the final report.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::SimulationError;
use super::events::EventSink;
use super::generator::{GeneratorStats, ResourceGenerator};
use super::instance_worker::InstanceWorker;
use super::resource_pool::{InstanceRecord, ResourceCounts, ResourcePool};
use crate::config::ValidatedConfig;
use crate::util::random::SeededRandom;

/// Final read-only view of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Identifier of this run.
    pub run_id: Uuid,
    /// Final record of every instance, by index.
    pub instances: Vec<InstanceRecord>,
    /// Players left in the pool.
    pub remaining: ResourceCounts,
    /// Players injected by the generator.
    pub generated: GeneratorStats,
    /// Wall-clock length of the run.
    pub elapsed: Duration,
}

impl SimulationReport {
    /// Parties served across all instances.
    #[must_use]
    pub fn total_served(&self) -> u64 {
        self.instances.iter().map(|i| i.served).sum()
    }

    /// Simulated seconds spent in dungeons across all instances.
    #[must_use]
    pub fn total_busy_secs(&self) -> u64 {
        self.instances.iter().map(|i| i.busy_secs).sum()
    }
}

/// Owns the pool and drives one complete run.
pub struct Simulation {
    config: ValidatedConfig,
    pool: Arc<ResourcePool>,
    events: EventSink,
}

impl Simulation {
    /// Prepare a run; nothing starts until [`Simulation::run`].
    #[must_use]
    pub fn new(config: ValidatedConfig, events: EventSink) -> Self {
        let pool = Arc::new(ResourcePool::new(config.initial(), config.instances()));
        Self {
            config,
            pool,
            events,
        }
    }

    /// Configuration this run uses.
    #[must_use]
    pub const fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Shared handle to the pool for live observers.
    #[must_use]
    pub fn pool(&self) -> Arc<ResourcePool> {
        Arc::clone(&self.pool)
    }

    /// Run to completion.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::Spawn` if a thread cannot be started and
    /// `SimulationError::TaskPanicked` if an instance or the generator panics.
    pub fn run(self) -> Result<SimulationReport, SimulationError> {
        let run_id = Uuid::new_v4();
        let instances = self.config.instances();
        let span = tracing::info_span!("simulation", %run_id, instances);
        let _enter = span.enter();
        let started = Instant::now();
        let seed = self.config.seed();

        let generator = ResourceGenerator::new(
            Arc::clone(&self.pool),
            SeededRandom::for_stream(seed, instances as u64),
            self.config.generator(),
            self.events.clone(),
        );
        let generator_handle = spawn_task("lfg-generator".to_string(), move || generator.run())?;

        let mut workers = Vec::with_capacity(instances);
        for id in 0..instances {
            let worker = InstanceWorker::new(
                id,
                Arc::clone(&self.pool),
                SeededRandom::for_stream(seed, id as u64),
                self.config.durations(),
                self.config.tick(),
                self.events.clone(),
            );
            match spawn_task(format!("lfg-instance-{id}"), move || worker.run()) {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    warn!(instance = id, error = %e, "aborting run, instance failed to start");
                    self.pool.end_simulation();
                    for handle in workers {
                        let _ = handle.join();
                    }
                    let _ = generator_handle.join();
                    return Err(e);
                }
            }
        }
        info!(instances, "all instances started");

        let mut records = Vec::with_capacity(instances);
        let mut failure = None;
        for (id, handle) in workers.into_iter().enumerate() {
            match handle.join() {
                Ok(record) => records.push(record),
                Err(_) => {
                    warn!(instance = id, "instance panicked");
                    failure.get_or_insert_with(|| {
                        SimulationError::TaskPanicked(format!("lfg-instance-{id}"))
                    });
                }
            }
        }

        if self.pool.end_simulation() {
            debug!("all instances finished, forcing generator shutdown");
        }
        let generated = generator_handle
            .join()
            .map_err(|_| SimulationError::TaskPanicked("lfg-generator".to_string()))?;
        if let Some(err) = failure {
            return Err(err);
        }

        let report = SimulationReport {
            run_id,
            instances: records,
            remaining: self.pool.snapshot_counts(),
            generated,
            elapsed: started.elapsed(),
        };
        info!(
            served = report.total_served(),
            generated = report.generated.total(),
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            "simulation finished"
        );
        Ok(report)
    }
}

/// Spawn a named thread that inherits the caller's tracing span.
fn spawn_task<T, F>(name: String, task: F) -> Result<JoinHandle<T>, SimulationError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let span = tracing::Span::current();
    thread::Builder::new()
        .name(name.clone())
        .spawn(move || span.in_scope(task))
        .map_err(|source| SimulationError::Spawn { task: name, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    #[test]
    fn test_initial_pool_matches_config() {
        let cfg = SimulationConfig::new(3, 4, 5, 6, 1, 1).validate().unwrap();
        let sim = Simulation::new(cfg, EventSink::none());
        assert_eq!(sim.pool().snapshot_counts(), ResourceCounts::new(4, 5, 6));
        assert_eq!(sim.pool().instance_records().len(), 3);
    }

    #[test]
    fn test_report_totals() {
        let report = SimulationReport {
            run_id: Uuid::nil(),
            instances: vec![
                InstanceRecord {
                    id: 0,
                    served: 2,
                    busy_secs: 7,
                    ..InstanceRecord::default()
                },
                InstanceRecord {
                    id: 1,
                    served: 1,
                    busy_secs: 3,
                    ..InstanceRecord::default()
                },
            ],
            remaining: ResourceCounts::default(),
            generated: GeneratorStats::default(),
            elapsed: Duration::ZERO,
        };
        assert_eq!(report.total_served(), 3);
        assert_eq!(report.total_busy_secs(), 10);
    }

    #[test]
    fn test_run_with_silent_generator_and_budget() {
        let cfg = SimulationConfig::new(2, 2, 2, 6, 1, 1)
            .with_bonus_duration(5)
            .with_tick_ms(5)
            .with_poll_interval_ms(1)
            .with_generation_probability(0.0)
            .with_seed(11)
            .validate()
            .unwrap();
        let report = Simulation::new(cfg, EventSink::none()).run().unwrap();
        assert_eq!(report.total_served(), 2);
        assert_eq!(report.remaining, ResourceCounts::default());
        assert_eq!(report.generated, GeneratorStats::default());
    }
}

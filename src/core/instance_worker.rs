//! Dungeon instance worker.
//!
//! Each instance loops through `AttemptForm -> Active -> AttemptForm` until the
//! simulation has ended and no party can be formed, at which point it moves to
//! `Terminated` for good. The dungeon itself runs outside the pool lock.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use super::events::{EventSink, SimulationEvent};
use super::resource_pool::{InstanceRecord, InstanceStatus, ResourcePool};
use crate::util::random::RandomSource;

/// Position of a worker in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Trying to withdraw a party, possibly blocked waiting for one.
    AttemptForm,
    /// Running a dungeon of `duration` simulated seconds.
    Active {
        /// Dungeon length in simulated seconds.
        duration: u32,
    },
    /// No further party will ever be formed by this worker.
    Terminated,
}

/// One dungeon instance driving its own record in the pool.
pub struct InstanceWorker<R> {
    id: usize,
    pool: Arc<ResourcePool>,
    rng: R,
    durations: RangeInclusive<u32>,
    tick: Duration,
    events: EventSink,
}

impl<R: RandomSource> InstanceWorker<R> {
    /// Create a worker for instance `id`.
    ///
    /// `durations` is the inclusive range of dungeon lengths in simulated
    /// seconds and `tick` is the real time one simulated second takes.
    pub const fn new(
        id: usize,
        pool: Arc<ResourcePool>,
        rng: R,
        durations: RangeInclusive<u32>,
        tick: Duration,
        events: EventSink,
    ) -> Self {
        Self {
            id,
            pool,
            rng,
            durations,
            tick,
            events,
        }
    }

    /// Run until terminated and return the final record.
    pub fn run(mut self) -> InstanceRecord {
        let span = tracing::debug_span!("instance", instance = self.id);
        let _enter = span.enter();

        let mut state = WorkerState::AttemptForm;
        loop {
            state = match state {
                WorkerState::AttemptForm => self.attempt_form(),
                WorkerState::Active { duration } => self.run_dungeon(duration),
                WorkerState::Terminated => break,
            };
        }

        self.pool.lock().record_mut(self.id).clone()
    }

    fn attempt_form(&mut self) -> WorkerState {
        if self.pool.activate_generator_if_scarce() {
            info!(instance = self.id, "initial players exhausted, activating generator");
            self.events
                .emit(SimulationEvent::GeneratorActivated { instance: self.id });
        }

        let mut state = self.pool.lock();
        self.pool.wait_for_party(&mut state);

        if state.flags().simulation_ended && !state.can_withdraw() {
            state.record_mut(self.id).status = InstanceStatus::Idle;
            drop(state);
            debug!(instance = self.id, "simulation ended, instance terminating");
            return WorkerState::Terminated;
        }

        let formed = state.withdraw_party();
        debug_assert!(formed, "party predicate held but withdrawal failed");
        state.record_mut(self.id).status = InstanceStatus::Active;
        let statuses = state.statuses();
        drop(state);

        let duration = self.rng.uniform(self.durations.clone());
        debug!(instance = self.id, duration, "dungeon started");
        self.events.emit(SimulationEvent::DungeonStarted {
            instance: self.id,
            duration,
            statuses,
        });
        WorkerState::Active { duration }
    }

    fn run_dungeon(&mut self, duration: u32) -> WorkerState {
        thread::sleep(self.tick * duration);

        let mut state = self.pool.lock();
        let record = state.record_mut(self.id);
        record.status = InstanceStatus::Idle;
        record.served += 1;
        record.busy_secs += u64::from(duration);
        let statuses = state.statuses();
        drop(state);

        debug!(instance = self.id, duration, "dungeon completed");
        self.events.emit(SimulationEvent::DungeonCompleted {
            instance: self.id,
            duration,
            statuses,
        });
        WorkerState::AttemptForm
    }
}

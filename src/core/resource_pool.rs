//! Shared player pool with atomic party withdrawal and lifecycle signalling.
//!
//! All counters, lifecycle flags and the instance table live behind a single
//! `parking_lot::Mutex` paired with one `parking_lot::Condvar`. Every waiter in
//! the simulation (instances blocked on a party, the generator waiting for
//! activation or sleeping between ticks) parks on that condvar with a
//! predicate, so redundant or spurious wakeups only cost a re-check.

use std::time::Duration;

use parking_lot::{Condvar, Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

/// Players required to form one party.
pub const PARTY: Party = Party {
    tanks: 1,
    healers: 1,
    dps: 3,
};

/// Composition of a single withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Tanks per party.
    pub tanks: u32,
    /// Healers per party.
    pub healers: u32,
    /// Damage dealers per party.
    pub dps: u32,
}

/// Player counts by role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounts {
    /// Available tanks.
    pub tanks: u32,
    /// Available healers.
    pub healers: u32,
    /// Available damage dealers.
    pub dps: u32,
}

impl ResourceCounts {
    /// Create a count triple.
    #[must_use]
    pub const fn new(tanks: u32, healers: u32, dps: u32) -> Self {
        Self {
            tanks,
            healers,
            dps,
        }
    }

    /// True when every role has enough players for `party`.
    #[must_use]
    pub const fn covers(&self, party: &Party) -> bool {
        self.tanks >= party.tanks && self.healers >= party.healers && self.dps >= party.dps
    }

    /// True when no role has any players.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tanks == 0 && self.healers == 0 && self.dps == 0
    }

    /// Sum across all roles.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.tanks as u64 + self.healers as u64 + self.dps as u64
    }

    /// Add `other` role by role, saturating at `u32::MAX`.
    pub const fn add(&mut self, other: Self) {
        self.tanks = self.tanks.saturating_add(other.tanks);
        self.healers = self.healers.saturating_add(other.healers);
        self.dps = self.dps.saturating_add(other.dps);
    }

    fn take(&mut self, party: &Party) -> bool {
        if !self.covers(party) {
            return false;
        }
        self.tanks -= party.tanks;
        self.healers -= party.healers;
        self.dps -= party.dps;
        true
    }
}

/// Whether an instance is currently running a dungeon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    /// Waiting for a party or finished.
    #[default]
    Idle,
    /// Running a dungeon with a withdrawn party.
    Active,
}

/// Per-instance bookkeeping, mutated only by the owning worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Instance index.
    pub id: usize,
    /// Current status.
    pub status: InstanceStatus,
    /// Parties served so far.
    pub served: u64,
    /// Accumulated dungeon time in simulated seconds.
    pub busy_secs: u64,
}

/// Process-wide one-shot transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleFlags {
    /// Set once, by the first instance that fails to form a party.
    pub generator_activated: bool,
    /// Set once, by the generator budget or by the coordinator.
    pub simulation_ended: bool,
}

/// Outcome of the generator's dormant wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Scarcity was observed; start producing.
    Activated,
    /// The simulation ended before any scarcity was observed.
    Ended,
}

/// Consistent view of counts and instance statuses for status lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Players left in the pool.
    pub counts: ResourceCounts,
    /// Status of every instance, by index.
    pub statuses: Vec<InstanceStatus>,
}

/// State guarded by the pool lock.
#[derive(Debug)]
pub struct PoolState {
    counts: ResourceCounts,
    flags: LifecycleFlags,
    instances: Vec<InstanceRecord>,
}

impl PoolState {
    /// True when the current counts cover one party.
    #[must_use]
    pub const fn can_withdraw(&self) -> bool {
        self.counts.covers(&PARTY)
    }

    /// Current counts.
    #[must_use]
    pub const fn counts(&self) -> ResourceCounts {
        self.counts
    }

    /// Current lifecycle flags.
    #[must_use]
    pub const fn flags(&self) -> LifecycleFlags {
        self.flags
    }

    /// Statuses of all instances, by index.
    #[must_use]
    pub fn statuses(&self) -> Vec<InstanceStatus> {
        self.instances.iter().map(|i| i.status).collect()
    }

    pub(crate) fn withdraw_party(&mut self) -> bool {
        self.counts.take(&PARTY)
    }

    /// Flip `generator_activated` if no party can be formed. Returns true only
    /// for the call that performed the transition.
    pub(crate) const fn mark_generator_activated(&mut self) -> bool {
        if self.can_withdraw() || self.flags.generator_activated {
            return false;
        }
        self.flags.generator_activated = true;
        true
    }

    pub(crate) fn record_mut(&mut self, id: usize) -> &mut InstanceRecord {
        &mut self.instances[id]
    }
}

/// The shared pool of tanks, healers and damage dealers.
#[derive(Debug)]
pub struct ResourcePool {
    state: Mutex<PoolState>,
    /// Signalled on every deposit and lifecycle transition.
    available: Condvar,
}

impl ResourcePool {
    /// Create a pool holding `initial` players and `instances` idle records.
    #[must_use]
    pub fn new(initial: ResourceCounts, instances: usize) -> Self {
        let instances = (0..instances)
            .map(|id| InstanceRecord {
                id,
                ..InstanceRecord::default()
            })
            .collect();
        Self {
            state: Mutex::new(PoolState {
                counts: initial,
                flags: LifecycleFlags::default(),
                instances,
            }),
            available: Condvar::new(),
        }
    }

    /// Withdraw one party if the pool covers it. The check and the decrement
    /// happen under one lock acquisition.
    pub fn try_withdraw(&self) -> bool {
        self.state.lock().withdraw_party()
    }

    /// Add players and wake every waiter so each re-evaluates its predicate.
    pub fn deposit(&self, amounts: ResourceCounts) {
        let mut state = self.state.lock();
        state.counts.add(amounts);
        tracing::debug!(
            tanks = state.counts.tanks,
            healers = state.counts.healers,
            dps = state.counts.dps,
            "deposit applied"
        );
        drop(state);
        self.available.notify_all();
    }

    /// Copy of the current counts.
    #[must_use]
    pub fn snapshot_counts(&self) -> ResourceCounts {
        self.state.lock().counts
    }

    /// Copy of the lifecycle flags.
    #[must_use]
    pub fn lifecycle(&self) -> LifecycleFlags {
        self.state.lock().flags
    }

    /// Counts and statuses read under a single lock acquisition.
    #[must_use]
    pub fn status_snapshot(&self) -> StatusSnapshot {
        let state = self.state.lock();
        StatusSnapshot {
            counts: state.counts,
            statuses: state.statuses(),
        }
    }

    /// Copy of every instance record.
    #[must_use]
    pub fn instance_records(&self) -> Vec<InstanceRecord> {
        self.state.lock().instances.clone()
    }

    /// Activate the generator if the pool cannot form a party. Returns true
    /// only for the call that flipped the flag.
    pub fn activate_generator_if_scarce(&self) -> bool {
        let mut state = self.state.lock();
        let flipped = state.mark_generator_activated();
        drop(state);
        if flipped {
            self.available.notify_all();
        }
        flipped
    }

    /// Mark the simulation as ended and wake everyone. Returns true only for
    /// the call that performed the transition; later calls are no-ops apart
    /// from a redundant wake.
    pub fn end_simulation(&self) -> bool {
        let mut state = self.state.lock();
        let flipped = !state.flags.simulation_ended;
        state.flags.simulation_ended = true;
        drop(state);
        self.available.notify_all();
        flipped
    }

    /// Block until the generator is activated or the simulation ends.
    pub fn wait_for_activation(&self) -> Activation {
        let mut state = self.state.lock();
        self.available.wait_while(&mut state, |s| {
            !s.flags.generator_activated && !s.flags.simulation_ended
        });
        if state.flags.simulation_ended {
            Activation::Ended
        } else {
            Activation::Activated
        }
    }

    /// Sleep for up to `interval`, returning early once the simulation ends.
    /// Returns false when the simulation has ended.
    pub fn pause(&self, interval: Duration) -> bool {
        let mut state = self.state.lock();
        if !state.flags.simulation_ended {
            self.available
                .wait_while_for(&mut state, |s| !s.flags.simulation_ended, interval);
        }
        !state.flags.simulation_ended
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock()
    }

    /// Park until a party can be formed or the simulation ends.
    pub(crate) fn wait_for_party(&self, guard: &mut MutexGuard<'_, PoolState>) {
        self.available
            .wait_while(guard, |s| !s.can_withdraw() && !s.flags.simulation_ended);
    }
}

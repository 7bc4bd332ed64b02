//! # LFG Scheduler
//!
//! A party-forming dungeon queue simulation built around a single shared
//! player pool guarded by `parking_lot` synchronization primitives.
//!
//! A bounded set of dungeon instances repeatedly withdraws parties of one
//! tank, one healer and three damage dealers from the pool, runs each party
//! for a random duration and comes back for more. Players are consumed, never
//! returned. Once the pool is first observed exhausted, a background generator
//! starts injecting random batches of players, optionally for a limited time.
//!
//! ## Core Problem Solved
//!
//! - **Atomic withdrawal**: the availability check and the decrement happen in
//!   one critical section, so two instances never share the last party
//! - **Predicate-checked waiting**: every waiter re-evaluates its condition on
//!   wake, so broadcast wakes and spurious wakeups are harmless
//! - **One-shot lifecycle flags**: generator activation and simulation end each
//!   flip exactly once, and every blocked task observes the end in finite time
//!
//! ## Example
//!
//! ```rust,no_run
//! use lfg_scheduler::builders::SimulationBuilder;
//! use lfg_scheduler::config::SimulationConfig;
//!
//! let config = SimulationConfig::new(2, 4, 4, 12, 1, 3).with_bonus_duration(10);
//! let report = SimulationBuilder::new(config).build()?.run()?;
//! println!("{report}");
//! # Ok::<(), lfg_scheduler::core::SimulationError>(())
//! ```
//!
//! Fairness among instances racing for the same party is not guaranteed: the
//! instance that acquires the pool lock first wins.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Simulation core: pool, instances, generator and coordinator.
pub mod core;
/// Configuration models, validation and clamping.
pub mod config;
/// Builders to construct simulations from configuration.
pub mod builders;
/// Human-readable output for status lines and summaries.
pub mod report;
/// Shared utilities.
pub mod util;

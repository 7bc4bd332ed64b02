//! Simulation core: the shared pool, its consumers, its producer and the
//! coordinator that wires them together.

pub mod coordinator;
pub mod error;
pub mod events;
pub mod generator;
pub mod instance_worker;
pub mod resource_pool;

pub use coordinator::{Simulation, SimulationReport};
pub use error::{AppResult, ConfigError, SimulationError};
pub use events::{EventSink, SimulationEvent};
pub use generator::{GeneratorSettings, GeneratorStats, ResourceGenerator};
pub use instance_worker::{InstanceWorker, WorkerState};
pub use resource_pool::{
    Activation, InstanceRecord, InstanceStatus, LifecycleFlags, Party, PoolState, ResourceCounts,
    ResourcePool, StatusSnapshot, PARTY,
};

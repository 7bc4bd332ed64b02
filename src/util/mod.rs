pub mod random;
pub mod telemetry;

pub use random::*;
pub use telemetry::*;

//! Bounded-concurrency scheduling of external processes with progress reporting.

mod direction;
mod manager;
mod snapshot;

pub use direction::{format_duration, Direction, Estimate};
pub use manager::{ManagerSettings, TaskManager};
pub use snapshot::Snapshot;

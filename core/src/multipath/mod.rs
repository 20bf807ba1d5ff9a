//! Parent/child multipath records and their per-recording aggregate.

pub mod aggregate;
pub mod candidate;

pub use aggregate::{MultiPathAggregate, ParentGroup, ScenarioEntry};
pub use candidate::{MultiPathChild, MultiPathParent};

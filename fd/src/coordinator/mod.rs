//! Coordinator - sole owner of the package registry
//!
//! The Coordinator runs as a single task that:
//! - **Arrivals:** injects new packages on its own timer, bounded by capacity
//! - **Dispatch:** handles at most one unit message per tick, replying with directives
//! - **Reconciliation:** removes packages once their unit reports an outcome

mod activity;
mod arrival;
mod assignment;
mod config;
mod core;
mod handle;
mod messages;
mod registry;

pub use activity::{ActivityEntry, ActivityLog};
pub use arrival::{Arrival, ArrivalGenerator};
pub use assignment::{Assignment, assign, reconcile};
pub use config::CoordinatorConfig;
pub use core::Coordinator;
pub use handle::CoordinatorHandle;
pub use messages::{ControlRequest, CoordinatorMetrics, CoordinatorSnapshot, DispatchOutcome, UnitProgress};
pub use registry::PackageRegistry;

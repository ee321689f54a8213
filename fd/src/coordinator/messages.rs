//! Control messages, telemetry and snapshot types for the Coordinator

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;

use crate::domain::{AgentId, Package, PackageId};
use crate::protocol::Location;

/// Requests from a [`CoordinatorHandle`](super::CoordinatorHandle) to the running coordinator
#[derive(Debug)]
pub enum ControlRequest {
    /// Read-only view of the coordinator state
    Snapshot {
        reply_tx: oneshot::Sender<CoordinatorSnapshot>,
    },

    /// Stop the dispatch loop
    Shutdown,
}

/// Last reported movement of a unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitProgress {
    pub destination: Location,
    /// Fraction of the way to `destination`, in [0, 1]
    pub distance: f64,
}

/// What a single dispatch tick did
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Nothing arrived within the receive timeout
    Idle,

    /// Package bound to the unit, GO_TO_TERMINAL sent
    Assigned { unit: AgentId, package: PackageId },

    /// GO_TO_INSPECTION sent
    Diverted { unit: AgentId },

    /// No unowned package, no reply sent
    Unanswered { unit: AgentId },

    /// Telemetry updated
    Progress { unit: AgentId, progress: UnitProgress },

    /// Terminal report handled, GO_TO_WAREHOUSE sent
    Reconciled { unit: AgentId, removed: Vec<Package> },

    /// Body could not be decoded and was dropped
    Rejected { sender: AgentId, reason: String },

    /// Inbound mailbox closed
    Closed,
}

/// Coordinator counters for observability
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoordinatorMetrics {
    pub messages_received: u64,
    pub decode_errors: u64,
    pub receive_timeouts: u64,
    pub packages_created: u64,
    pub arrivals_refused: u64,
    pub assignments: u64,
    pub diversions: u64,
    pub unanswered_requests: u64,
    pub delivered: u64,
    pub dropped: u64,
    pub inspected: u64,
    pub replies_failed: u64,
}

/// Point-in-time copy of coordinator state for readers outside the actor
#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorSnapshot {
    pub taken_at: DateTime<Utc>,
    /// Live packages, oldest first
    pub packages: Vec<Package>,
    pub capacity: usize,
    pub positions: BTreeMap<AgentId, UnitProgress>,
    /// Recent activity as `elapsed | sender | body`
    pub activity: Vec<String>,
    pub metrics: CoordinatorMetrics,
}

impl CoordinatorSnapshot {
    pub fn unassigned(&self) -> usize {
        self.packages.iter().filter(|p| !p.is_assigned()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serialization() {
        let mut positions = BTreeMap::new();
        positions.insert(
            AgentId::from("unit-1"),
            UnitProgress {
                destination: Location::Terminal,
                distance: 0.4,
            },
        );
        let snapshot = CoordinatorSnapshot {
            taken_at: Utc::now(),
            packages: vec![Package::new(PackageId::from("abcd1234"))],
            capacity: 10,
            positions,
            activity: vec!["0.10 | unit-1 | {}".to_string()],
            metrics: CoordinatorMetrics::default(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["packages"][0]["id"], "abcd1234");
        assert_eq!(json["packages"][0]["status"], "UNSHIPPED");
        assert_eq!(json["positions"]["unit-1"]["destination"], "terminal");
        assert_eq!(json["metrics"]["delivered"], 0);
        assert_eq!(snapshot.unassigned(), 1);
    }
}

//! Package records and their lifecycle status

use serde::{Deserialize, Serialize};

use super::id::{AgentId, PackageId};

/// Lifecycle status of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageStatus {
    #[default]
    Unshipped,
    Moving,
    Delivered,
    Dropped,
    Inspected,
}

impl PackageStatus {
    /// Terminal statuses trigger removal from the registry
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Dropped | Self::Inspected)
    }
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unshipped => write!(f, "UNSHIPPED"),
            Self::Moving => write!(f, "MOVING"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Dropped => write!(f, "DROPPED"),
            Self::Inspected => write!(f, "INSPECTED"),
        }
    }
}

/// A discrete work item tracked by the coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub status: PackageStatus,
    /// Owning unit, `None` while unassigned
    pub executor: Option<AgentId>,
}

impl Package {
    /// Create a new unshipped, unowned package
    pub fn new(id: PackageId) -> Self {
        Self {
            id,
            status: PackageStatus::Unshipped,
            executor: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.executor.is_some()
    }

    pub fn is_owned_by(&self, unit: &AgentId) -> bool {
        self.executor.as_ref() == Some(unit)
    }
}

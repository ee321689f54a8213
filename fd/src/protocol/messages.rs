//! Wire messages exchanged between units and the coordinator
//!
//! Bodies are JSON objects tagged by `action`:
//!
//! ```text
//! {"action": "WAITING_FOR_TASK"}
//! {"action": "MOVING", "destination": "terminal", "distance": 0.4}
//! {"action": "GO_TO_TERMINAL"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::DecodeError;
use crate::domain::PackageStatus;

/// The three fixed locations a unit can travel to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Warehouse,
    Terminal,
    Inspection,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warehouse => "warehouse",
            Self::Terminal => "terminal",
            Self::Inspection => "inspection",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Messages sent by a unit to the coordinator
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitReport {
    /// Unit is idle and asks for work
    WaitingForTask,

    /// Progress toward the current destination
    Moving { destination: Location, distance: f64 },

    /// Package reached the terminal
    PackageDelivered,

    /// Package was lost in transit
    PackageDropped,

    /// Unit finished at the inspection station
    PackageInspected,
}

impl UnitReport {
    /// Wire name of this report
    pub fn action(&self) -> &'static str {
        match self {
            Self::WaitingForTask => "WAITING_FOR_TASK",
            Self::Moving { .. } => "MOVING",
            Self::PackageDelivered => "PACKAGE_DELIVERED",
            Self::PackageDropped => "PACKAGE_DROPPED",
            Self::PackageInspected => "PACKAGE_INSPECTED",
        }
    }

    /// Terminal package status this report stands for, if any
    pub fn outcome(&self) -> Option<PackageStatus> {
        match self {
            Self::PackageDelivered => Some(PackageStatus::Delivered),
            Self::PackageDropped => Some(PackageStatus::Dropped),
            Self::PackageInspected => Some(PackageStatus::Inspected),
            Self::WaitingForTask | Self::Moving { .. } => None,
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Moving { destination, distance } => json!({
                "action": self.action(),
                "destination": destination.as_str(),
                "distance": distance,
            })
            .to_string(),
            _ => json!({ "action": self.action() }).to_string(),
        }
    }

    pub fn decode(body: &str) -> Result<Self, DecodeError> {
        let report: Self = serde_json::from_str(body).map_err(|source| DecodeError::Malformed {
            body: body.to_string(),
            source,
        })?;

        if let Self::Moving { distance, .. } = report
            && !(0.0..=1.0).contains(&distance)
        {
            return Err(DecodeError::DistanceOutOfRange { distance });
        }

        Ok(report)
    }
}

/// Directives sent by the coordinator to a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Directive {
    GoToTerminal,
    GoToWarehouse,
    GoToInspection,
}

impl Directive {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GoToTerminal => "GO_TO_TERMINAL",
            Self::GoToWarehouse => "GO_TO_WAREHOUSE",
            Self::GoToInspection => "GO_TO_INSPECTION",
        }
    }

    /// Where this directive sends the unit
    pub fn destination(&self) -> Location {
        match self {
            Self::GoToTerminal => Location::Terminal,
            Self::GoToWarehouse => Location::Warehouse,
            Self::GoToInspection => Location::Inspection,
        }
    }

    pub fn encode(&self) -> String {
        json!({ "action": self.action() }).to_string()
    }

    pub fn decode(body: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(body).map_err(|source| DecodeError::Malformed {
            body: body.to_string(),
            source,
        })
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.action())
    }
}

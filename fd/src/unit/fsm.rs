//! Unit finite state machine
//!
//! The machine is pure: [`transition`] maps `(state, event)` to the next state
//! and the effect the driver must perform on entering it. The driver turns
//! each effect back into an event.
//!
//! ```text
//!               NoReply
//!             ┌─────────┐
//!             ▼         │
//!   ┌──────► WAIT_TASK ─┴──► GO_TO_TERMINAL ──Arrived──► DELIVER_PACKAGE ──┐
//!   │          │  │                 │                                      │
//!   │          │  │              Dropped ──────────────► PACKAGE_DROPPED ──┤
//!   │          │  └──► GO_TO_INSPECTION ──Arrived──► PACKAGE_INSPECTED ────┤
//!   │          └─────► GO_TO_WAREHOUSE ──Arrived─┐                         │
//!   └────────────────────────────────────────────┴────────Reported─────────┘
//! ```

use super::error::FsmError;
use crate::protocol::{Directive, Location, UnitReport};

/// States of a transport unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitState {
    #[default]
    WaitTask,
    GoToTerminal,
    GoToWarehouse,
    DeliverPackage,
    PackageDropped,
    GoToInspection,
    PackageInspected,
}

impl UnitState {
    /// What the unit does on entering this state
    pub fn entry_effect(&self) -> Effect {
        match self {
            Self::WaitTask => Effect::RequestTask,
            Self::GoToTerminal => Effect::Move {
                destination: Location::Terminal,
                may_drop: true,
            },
            Self::GoToWarehouse => Effect::Move {
                destination: Location::Warehouse,
                may_drop: false,
            },
            Self::GoToInspection => Effect::Move {
                destination: Location::Inspection,
                may_drop: false,
            },
            Self::DeliverPackage => Effect::Report(UnitReport::PackageDelivered),
            Self::PackageDropped => Effect::Report(UnitReport::PackageDropped),
            Self::PackageInspected => Effect::Report(UnitReport::PackageInspected),
        }
    }
}

impl std::fmt::Display for UnitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitTask => write!(f, "WAIT_TASK"),
            Self::GoToTerminal => write!(f, "GO_TO_TERMINAL"),
            Self::GoToWarehouse => write!(f, "GO_TO_WAREHOUSE"),
            Self::DeliverPackage => write!(f, "DELIVER_PACKAGE"),
            Self::PackageDropped => write!(f, "PACKAGE_DROPPED"),
            Self::GoToInspection => write!(f, "GO_TO_INSPECTION"),
            Self::PackageInspected => write!(f, "PACKAGE_INSPECTED"),
        }
    }
}

/// Action the driver performs on entering a state
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send WAITING_FOR_TASK and wait for a directive
    RequestTask,

    /// Travel to `destination`, reporting progress each step
    Move { destination: Location, may_drop: bool },

    /// Send a terminal report to the coordinator
    Report(UnitReport),
}

/// Result of performing an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitEvent {
    Directive(Directive),
    NoReply,
    Arrived,
    Dropped,
    Reported,
}

impl std::fmt::Display for UnitEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directive(directive) => write!(f, "directive {}", directive),
            Self::NoReply => write!(f, "no-reply"),
            Self::Arrived => write!(f, "arrived"),
            Self::Dropped => write!(f, "dropped"),
            Self::Reported => write!(f, "reported"),
        }
    }
}

/// Next state and its entry effect
pub fn transition(state: UnitState, event: UnitEvent) -> Result<(UnitState, Effect), FsmError> {
    let next = match (state, event) {
        (UnitState::WaitTask, UnitEvent::Directive(Directive::GoToTerminal)) => UnitState::GoToTerminal,
        (UnitState::WaitTask, UnitEvent::Directive(Directive::GoToWarehouse)) => UnitState::GoToWarehouse,
        (UnitState::WaitTask, UnitEvent::Directive(Directive::GoToInspection)) => UnitState::GoToInspection,
        (UnitState::WaitTask, UnitEvent::NoReply) => UnitState::WaitTask,
        (UnitState::GoToTerminal, UnitEvent::Arrived) => UnitState::DeliverPackage,
        (UnitState::GoToTerminal, UnitEvent::Dropped) => UnitState::PackageDropped,
        (UnitState::GoToWarehouse, UnitEvent::Arrived) => UnitState::WaitTask,
        (UnitState::GoToInspection, UnitEvent::Arrived) => UnitState::PackageInspected,
        (
            UnitState::DeliverPackage | UnitState::PackageDropped | UnitState::PackageInspected,
            UnitEvent::Reported,
        ) => UnitState::WaitTask,
        (state, event) => return Err(FsmError::UnexpectedEvent { state, event }),
    };

    Ok((next, next.entry_effect()))
}

//! Unit error types

use thiserror::Error;

use super::fsm::{UnitEvent, UnitState};
use crate::transport::TransportError;

/// Errors from the unit state machine
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("State {state} does not accept event {event}")]
    UnexpectedEvent { state: UnitState, event: UnitEvent },
}

/// Errors that stop a unit step
#[derive(Debug, Error)]
pub enum UnitError {
    #[error(transparent)]
    Fsm(#[from] FsmError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

//! Transport units
//!
//! Each unit runs its own task: a pure state machine ([`transition`]) driven by
//! [`UnitAgent`], which talks to the coordinator over a [`crate::transport::Transport`].

mod agent;
mod config;
mod error;
mod fsm;

pub use agent::{UnitAgent, progress};
pub use config::UnitConfig;
pub use error::{FsmError, UnitError};
pub use fsm::{Effect, UnitEvent, UnitState, transition};

//! fleetd - package transport fleet coordinator
//!
//! A single coordinator owns a bounded registry of packages. Packages arrive
//! on a random timer; transport units ask for work, carry packages to the
//! terminal (or get diverted to inspection), and report the outcome so the
//! coordinator can reconcile its registry.
//!
//! # Core Concepts
//!
//! - **Single owner**: only the coordinator task mutates package state
//! - **Bounded registry**: live packages never exceed the configured capacity
//! - **Pure unit FSM**: transitions are a function; effects run in the driver
//! - **Injectable randomness**: every draw goes through [`dice::Dice`]
//!
//! # Modules
//!
//! - [`domain`] - Package and identifier types
//! - [`protocol`] - JSON messages exchanged by units and the coordinator
//! - [`transport`] - Addressed messaging and the in-process switchboard
//! - [`coordinator`] - Registry, assignment, arrivals and the dispatch actor
//! - [`unit`] - Unit state machine and driver
//! - [`fleet`] - Launching and stopping a whole fleet
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod dice;
pub mod domain;
pub mod fleet;
pub mod protocol;
pub mod transport;
pub mod unit;

pub use config::{Config, FleetConfig};
pub use coordinator::{Coordinator, CoordinatorConfig, CoordinatorHandle, CoordinatorSnapshot};
pub use domain::{AgentId, Package, PackageId, PackageStatus};
pub use fleet::Fleet;
pub use protocol::{Directive, Location, UnitReport};
pub use transport::{Envelope, Switchboard, Transport};
pub use unit::{UnitAgent, UnitConfig, UnitState};

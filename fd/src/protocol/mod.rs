//! Message contract between units and the coordinator

mod error;
mod messages;

pub use error::DecodeError;
pub use messages::{Directive, Location, UnitReport};

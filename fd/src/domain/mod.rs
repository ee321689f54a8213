//! Domain types shared by the coordinator and the units

mod id;
mod package;

pub use id::{AgentId, PackageId, generate_package_id};
pub use package::{Package, PackageStatus};

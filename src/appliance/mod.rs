//! Controllable appliances and the registry the decision engine queries.

pub mod registry;
pub mod types;

pub use registry::{ApplianceSet, Registry};
pub use types::{
    Appliance, ApplianceId, ApplianceSpec, ApplianceView, Category, Endpoint, Priority, Status,
};

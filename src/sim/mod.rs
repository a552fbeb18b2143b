//! Offline one-day simulation of the control loop.

pub mod clock;
pub mod engine;
/// Uncontrolled household consumption.
pub mod household;
/// Simulation price curves.
pub mod prices;
pub mod report;
pub mod types;

pub use engine::{Engine, banded_day};
pub use report::SimReport;
pub use types::StepResult;

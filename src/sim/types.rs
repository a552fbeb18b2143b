//! Per-step simulation record.

use std::fmt;
use std::sync::Arc;

use crate::engine::Action;
use crate::price::PriceBand;

/// Complete record of one simulation timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Timestep index.
    pub timestep: usize,
    /// Simulation time in hours.
    pub time_hr: f32,
    /// Hour of day used for the price lookup.
    pub hour: u32,
    /// Price band in force at this step.
    pub band: PriceBand,
    /// Household load outside the controlled appliances (kW).
    pub household_kw: f32,
    /// Rated load of appliances running during this step (kW).
    pub appliance_kw: f32,
    /// Total load seen by the engine (kW).
    pub active_kw: f32,
    /// Rolling average of the total load.
    pub average_kwh: f32,
    /// Action taken at the end of this step, if any.
    pub action: Option<Action>,
    /// Appliance the action was applied to.
    pub appliance: Option<Arc<str>>,
    /// Whether the total load reached the ceiling.
    pub over_load: bool,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} h={:>2} band={:<6} house={:>5.2} appl={:>5.2} total={:>5.2} avg={:>5.2}",
            self.timestep,
            self.hour,
            self.band,
            self.household_kw,
            self.appliance_kw,
            self.active_kw,
            self.average_kwh,
        )?;
        if let (Some(action), Some(name)) = (self.action, &self.appliance) {
            write!(f, " -> {action} {name}")?;
        }
        if self.over_load {
            write!(f, " [over]")?;
        }
        Ok(())
    }
}

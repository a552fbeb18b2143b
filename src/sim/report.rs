//! Post-hoc summary of a simulated day.

use std::fmt;

use super::types::StepResult;
use crate::engine::Action;
use crate::price::PriceBand;

/// Aggregate figures derived from a complete simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    /// Number of start intents applied.
    pub starts: usize,
    /// Number of stop intents applied.
    pub stops: usize,
    /// Highest total load (kW).
    pub peak_active_kw: f32,
    /// Highest rolling average.
    pub peak_average_kwh: f32,
    /// Steps where the total load reached the ceiling.
    pub steps_over_load: usize,
    /// Controlled-appliance energy drawn in Low, Normal and High hours (kWh).
    pub appliance_kwh_by_band: [f32; 3],
}

impl SimReport {
    /// Computes the report from the step records.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation step results
    /// * `dt_hours` - Timestep duration in hours
    pub fn from_results(results: &[StepResult], dt_hours: f32) -> Self {
        let mut report = Self {
            starts: 0,
            stops: 0,
            peak_active_kw: 0.0,
            peak_average_kwh: 0.0,
            steps_over_load: 0,
            appliance_kwh_by_band: [0.0; 3],
        };

        for r in results {
            match r.action {
                Some(Action::Start) => report.starts += 1,
                Some(Action::Stop) => report.stops += 1,
                None => {}
            }
            report.peak_active_kw = report.peak_active_kw.max(r.active_kw);
            report.peak_average_kwh = report.peak_average_kwh.max(r.average_kwh);
            if r.over_load {
                report.steps_over_load += 1;
            }
            report.appliance_kwh_by_band[usize::from(r.band.index())] += r.appliance_kw * dt_hours;
        }

        report
    }

    pub fn appliance_kwh(&self, band: PriceBand) -> f32 {
        self.appliance_kwh_by_band[usize::from(band.index())]
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Day Report ---")?;
        writeln!(f, "Starts / stops:        {} / {}", self.starts, self.stops)?;
        writeln!(f, "Peak load:             {:.2} kW", self.peak_active_kw)?;
        writeln!(f, "Peak rolling average:  {:.2}", self.peak_average_kwh)?;
        writeln!(f, "Steps over ceiling:    {}", self.steps_over_load)?;
        write!(
            f,
            "Appliance energy:      low {:.2} / normal {:.2} / high {:.2} kWh",
            self.appliance_kwh(PriceBand::Low),
            self.appliance_kwh(PriceBand::Normal),
            self.appliance_kwh(PriceBand::High),
        )
    }
}

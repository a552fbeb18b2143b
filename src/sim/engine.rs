//! One-day simulation of the control loop without hardware.
//!
//! Appliances answer like the mock dispatcher: every intent is confirmed and
//! applied before the next step.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::appliance::{Registry, Status};
use crate::capacity::CapacityLimits;
use crate::config::{ConfigError, HomeConfig};
use crate::engine::{self as decision, Action};
use crate::error::ValidationError;
use crate::price::{DayPrices, apply_bands};
use crate::schedule::EvaluationGate;

use super::clock::Clock;
use super::household::HouseholdLoad;
use super::prices::simulation_day;
use super::types::StepResult;

/// Simulation engine owning the household, appliances and price day.
pub struct Engine {
    steps_per_day: usize,
    dt_hours: f32,
    limits: CapacityLimits,
    registry: Registry,
    prices: Arc<DayPrices>,
    household: HouseholdLoad,
    gate: EvaluationGate,
    window: VecDeque<f32>,
    window_len: usize,
    start: DateTime<Utc>,
}

impl Engine {
    /// Creates an engine.
    ///
    /// # Arguments
    ///
    /// * `steps_per_day` - Timesteps in the simulated day
    /// * `limits` - Capacity ceilings
    /// * `registry` - Appliances under control
    /// * `prices` - Banded price day
    /// * `household` - Uncontrolled household load
    /// * `gate` - Evaluation rate limit, applied in simulated time
    /// * `window_len` - Timesteps in the rolling average
    pub fn new(
        steps_per_day: usize,
        limits: CapacityLimits,
        registry: Registry,
        prices: DayPrices,
        household: HouseholdLoad,
        gate: EvaluationGate,
        window_len: usize,
    ) -> Self {
        let steps_per_day = steps_per_day.max(1);
        Self {
            steps_per_day,
            dt_hours: 24.0 / steps_per_day as f32,
            limits,
            registry,
            prices: Arc::new(prices),
            household,
            gate,
            window: VecDeque::with_capacity(window_len.max(1)),
            window_len: window_len.max(1),
            start: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .unwrap_or_default(),
        }
    }

    /// Builds an engine from configuration, banding the simulation prices.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the appliances or prices are invalid.
    pub fn from_config(config: &HomeConfig) -> Result<Self, ConfigError> {
        let s = &config.simulation;
        let day = simulation_day(s.prices.as_deref(), s.seed).map_err(|e| ConfigError {
            field: "simulation.prices".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(
            s.steps_per_day,
            config.capacity_limits(),
            config.registry()?,
            apply_bands(day, config.band_config()),
            HouseholdLoad::new(
                s.base_kw,
                s.amp_kw,
                s.phase_rad,
                s.noise_std,
                s.steps_per_day,
                s.seed,
            ),
            EvaluationGate::new(config.min_interval()),
            s.average_window_steps,
        ))
    }

    pub fn dt_hours(&self) -> f32 {
        self.dt_hours
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn prices(&self) -> &DayPrices {
        &self.prices
    }

    fn clock(&self) -> Clock {
        let step = Duration::seconds((86_400 / self.steps_per_day) as i64);
        Clock::new(self.start, step, self.steps_per_day)
    }

    /// Executes one timestep at simulated time `at`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the household model produced an
    /// invalid reading.
    pub fn step(&mut self, t: usize, at: DateTime<Utc>) -> Result<StepResult, ValidationError> {
        let hour = ((t * 24) / self.steps_per_day) as u32;

        let household_kw = self.household.demand_kw(t);
        let appliance_kw = self.registry.snapshot().running_kw();
        let active_kw = household_kw + appliance_kw;

        if self.window.len() == self.window_len {
            self.window.pop_front();
        }
        self.window.push_back(active_kw);
        let average_kwh = self.window.iter().sum::<f32>() / self.window.len() as f32;

        let reading = self.limits.reading(active_kw, average_kwh)?;
        let band = self.prices.band_at(hour);

        let mut action = None;
        let mut appliance = None;
        if self.gate.is_open(&at) {
            let set = self.registry.snapshot();
            if let Some(intent) = decision::evaluate(band, &reading, &set) {
                if let Some(a) = self.registry.get(intent.appliance) {
                    a.set_status(match intent.action {
                        Action::Start => Status::On,
                        Action::Stop => Status::Off,
                    });
                    self.gate.record(&at);
                    tracing::debug!(step = t, %band, intent = %intent, "simulated intent");
                    action = Some(intent.action);
                    appliance = Some(intent.name);
                }
            }
        }

        Ok(StepResult {
            timestep: t,
            time_hr: t as f32 * self.dt_hours,
            hour,
            band,
            household_kw,
            appliance_kw,
            active_kw,
            average_kwh,
            action,
            appliance,
            over_load: reading.is_active_load_over(),
        })
    }

    /// Executes the whole day and returns the step records.
    ///
    /// # Errors
    ///
    /// Stops at the first step that fails.
    pub fn run(&mut self) -> Result<Vec<StepResult>, ValidationError> {
        let mut results = Vec::with_capacity(self.steps_per_day);
        let mut clock = self.clock();
        while let Some(tick) = clock.tick() {
            results.push(self.step(tick.step, tick.at)?);
        }
        Ok(results)
    }
}

/// The simulation's price day with bands applied.
///
/// # Errors
///
/// Returns [`ValidationError::HourOutOfRange`] if more than 24 prices are configured.
pub fn banded_day(config: &HomeConfig) -> Result<DayPrices, ValidationError> {
    let s = &config.simulation;
    simulation_day(s.prices.as_deref(), s.seed).map(|day| apply_bands(day, config.band_config()))
}

//! Load and rolling-average readings checked against configured ceilings.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Configured ceilings for the two capacity readings.
///
/// Set once from configuration and copied into every reading; there is no
/// process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityLimits {
    /// Maximum instantaneous load (kW).
    pub active_load_max_kw: f32,
    /// Maximum rolling-average consumption (kWh).
    pub average_max_kwh: f32,
}

impl CapacityLimits {
    pub fn new(active_load_max_kw: f32, average_max_kwh: f32) -> Self {
        Self {
            active_load_max_kw,
            average_max_kwh,
        }
    }

    /// Builds a reading checked against these limits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Negative`] if either value is negative or NaN.
    pub fn reading(
        &self,
        active_load_kw: f32,
        average_consumption_kwh: f32,
    ) -> Result<CapacityReading, ValidationError> {
        CapacityReading::new(active_load_kw, average_consumption_kwh, *self)
    }
}

/// One pair of sensor readings together with the ceilings they are judged by.
///
/// "Over" means the reading has reached the ceiling, not strictly passed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityReading {
    active_load_kw: f32,
    average_consumption_kwh: f32,
    limits: CapacityLimits,
}

impl CapacityReading {
    /// # Errors
    ///
    /// Returns [`ValidationError::Negative`] if either value is negative or NaN.
    pub fn new(
        active_load_kw: f32,
        average_consumption_kwh: f32,
        limits: CapacityLimits,
    ) -> Result<Self, ValidationError> {
        non_negative("active_load", active_load_kw)?;
        non_negative("average_consumption", average_consumption_kwh)?;
        Ok(Self {
            active_load_kw,
            average_consumption_kwh,
            limits,
        })
    }

    pub fn active_load_kw(&self) -> f32 {
        self.active_load_kw
    }

    pub fn average_consumption_kwh(&self) -> f32 {
        self.average_consumption_kwh
    }

    pub fn limits(&self) -> CapacityLimits {
        self.limits
    }

    /// `true` when the active load has reached its ceiling.
    pub fn is_active_load_over(&self) -> bool {
        self.active_load_kw >= self.limits.active_load_max_kw
    }

    /// `true` when adding `additional_kw` would reach the active load ceiling.
    ///
    /// Used before admitting a new load.
    pub fn is_active_load_over_with(&self, additional_kw: f32) -> bool {
        self.active_load_kw + additional_kw >= self.limits.active_load_max_kw
    }

    /// `true` when the rolling average has reached its ceiling.
    pub fn is_average_over(&self) -> bool {
        self.average_consumption_kwh >= self.limits.average_max_kwh
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ValidationError> {
    // NaN fails the comparison and is rejected too
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative {
            field,
            value: f64::from(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> CapacityLimits {
        CapacityLimits::new(5.0, 5.0)
    }

    #[test]
    fn negative_readings_are_rejected() {
        assert!(matches!(
            limits().reading(-0.1, 1.0),
            Err(ValidationError::Negative {
                field: "active_load",
                ..
            })
        ));
        assert!(matches!(
            limits().reading(1.0, -3.0),
            Err(ValidationError::Negative {
                field: "average_consumption",
                ..
            })
        ));
        assert!(limits().reading(f32::NAN, 1.0).is_err());
    }

    #[test]
    fn zero_readings_are_accepted() {
        let r = limits().reading(0.0, 0.0).expect("zero is valid");
        assert!(!r.is_active_load_over());
        assert!(!r.is_average_over());
    }

    #[test]
    fn reaching_the_ceiling_counts_as_over() {
        let r = limits().reading(5.0, 5.0).expect("valid reading");
        assert!(r.is_active_load_over());
        assert!(r.is_average_over());

        let r = limits().reading(4.9, 4.9).expect("valid reading");
        assert!(!r.is_active_load_over());
        assert!(!r.is_average_over());
    }

    #[test]
    fn additional_load_is_added_before_comparing() {
        let r = limits().reading(3.0, 0.0).expect("valid reading");
        assert!(!r.is_active_load_over_with(1.5));
        assert!(r.is_active_load_over_with(2.0));
        assert!(r.is_active_load_over_with(2.5));
    }
}

//! One rule chain per price band.
//!
//! Rules run in order and the first rule that proposes an intent wins.

use crate::appliance::ApplianceSet;
use crate::capacity::CapacityReading;

use super::intent::ControlIntent;

/// A rule chain evaluated against one reading and one appliance snapshot.
pub trait Strategy {
    fn evaluate(&self, reading: &CapacityReading, set: &ApplianceSet) -> Option<ControlIntent>;
}

/// Cheap hours: run the special tier, and let optional loads ride along
/// only while a special appliance is running.
#[derive(Debug, Default, Clone, Copy)]
pub struct LowPriceStrategy;

impl LowPriceStrategy {
    fn start_special(reading: &CapacityReading, set: &ApplianceSet) -> Option<ControlIntent> {
        set.special_inactive()
            .filter(|a| !reading.is_active_load_over_with(a.kilowatts))
            .map(ControlIntent::start)
    }

    fn shed_load(reading: &CapacityReading, set: &ApplianceSet) -> Option<ControlIntent> {
        if !reading.is_average_over() && set.has_special_running() {
            return None;
        }
        if let Some(a) = set.normal_active() {
            return Some(ControlIntent::stop(a));
        }
        if !reading.is_active_load_over() {
            return None;
        }
        set.special_active().map(ControlIntent::stop)
    }

    fn start_normal(reading: &CapacityReading, set: &ApplianceSet) -> Option<ControlIntent> {
        if !set.has_special_running() {
            return None;
        }
        set.normal_inactive()
            .filter(|a| !reading.is_active_load_over_with(a.kilowatts))
            .map(ControlIntent::start)
    }
}

impl Strategy for LowPriceStrategy {
    fn evaluate(&self, reading: &CapacityReading, set: &ApplianceSet) -> Option<ControlIntent> {
        Self::start_special(reading, set)
            .or_else(|| Self::shed_load(reading, set))
            .or_else(|| Self::start_normal(reading, set))
    }
}

/// Ordinary hours: no special tier, optional loads as capacity allows.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalPriceStrategy;

impl Strategy for NormalPriceStrategy {
    fn evaluate(&self, reading: &CapacityReading, set: &ApplianceSet) -> Option<ControlIntent> {
        set.special_active()
            .map(ControlIntent::stop)
            .or_else(|| stop_when_both_over(reading, set))
            .or_else(|| {
                set.normal_inactive()
                    .filter(|a| !reading.is_active_load_over_with(a.kilowatts))
                    .map(ControlIntent::start)
            })
    }
}

/// Expensive hours: only the baseline tier may run.
#[derive(Debug, Default, Clone, Copy)]
pub struct HighPriceStrategy;

impl Strategy for HighPriceStrategy {
    fn evaluate(&self, reading: &CapacityReading, set: &ApplianceSet) -> Option<ControlIntent> {
        set.any_active_non_zero_tier()
            .map(ControlIntent::stop)
            .or_else(|| stop_when_both_over(reading, set))
            .or_else(|| {
                set.zero_inactive()
                    .filter(|a| !reading.is_active_load_over_with(a.kilowatts))
                    .map(ControlIntent::start)
            })
    }
}

fn stop_when_both_over(reading: &CapacityReading, set: &ApplianceSet) -> Option<ControlIntent> {
    if reading.is_active_load_over() && reading.is_average_over() {
        set.normal_active().map(ControlIntent::stop)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::appliance::{ApplianceId, ApplianceView, Priority, Status};
    use crate::capacity::CapacityLimits;
    use crate::engine::intent::Action;

    fn set(entries: &[(i32, Status, f32)]) -> ApplianceSet {
        ApplianceSet::new(
            entries
                .iter()
                .enumerate()
                .map(|(i, (p, s, kw))| ApplianceView {
                    id: ApplianceId(i),
                    name: Arc::from(format!("a{i}")),
                    priority: Priority(*p),
                    status: *s,
                    kilowatts: *kw,
                })
                .collect(),
        )
    }

    fn reading(active: f32, avg: f32) -> CapacityReading {
        CapacityLimits::new(5.0, 5.0)
            .reading(active, avg)
            .expect("valid reading")
    }

    #[test]
    fn low_stops_special_when_load_over_and_nothing_else_runs() {
        let s = set(&[(-1, Status::On, 2.0), (0, Status::Off, 2.0)]);
        let intent = LowPriceStrategy.evaluate(&reading(6.0, 5.0), &s);
        assert_eq!(
            intent.map(|i| (i.action, i.appliance)),
            Some((Action::Stop, ApplianceId(0)))
        );
    }

    #[test]
    fn low_does_not_start_optional_loads_without_a_running_special() {
        let s = set(&[(2, Status::Off, 0.5)]);
        assert_eq!(LowPriceStrategy.evaluate(&reading(0.0, 0.0), &s), None);
    }

    #[test]
    fn normal_prefers_stopping_special_over_everything() {
        let s = set(&[(3, Status::On, 1.0), (-1, Status::On, 1.0)]);
        let intent = NormalPriceStrategy.evaluate(&reading(9.0, 9.0), &s);
        assert_eq!(intent.map(|i| i.appliance), Some(ApplianceId(1)));
    }

    #[test]
    fn high_stops_first_running_non_baseline_in_registry_order() {
        let s = set(&[(0, Status::On, 1.0), (2, Status::On, 1.0), (-1, Status::On, 1.0)]);
        let intent = HighPriceStrategy.evaluate(&reading(0.0, 0.0), &s);
        assert_eq!(intent.map(|i| i.appliance), Some(ApplianceId(1)));
    }

    #[test]
    fn high_leaves_running_baseline_alone_under_the_ceilings() {
        let s = set(&[(0, Status::On, 1.0), (0, Status::Off, 1.0)]);
        let intent = HighPriceStrategy.evaluate(&reading(4.5, 1.0), &s);
        assert_eq!(intent, None);
    }
}

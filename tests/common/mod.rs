//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use homeload::appliance::{ApplianceSet, ApplianceSpec, Category, Registry, Status};
use homeload::capacity::{CapacityLimits, CapacityReading};

/// Load and average ceilings used by most rule cases (5 kW / 5 kWh).
pub fn limits() -> CapacityLimits {
    CapacityLimits::new(5.0, 5.0)
}

/// Higher ceilings for the near-threshold cases (10 kW / 9.9 kWh).
pub fn ten_limits() -> CapacityLimits {
    CapacityLimits::new(10.0, 9.9)
}

pub fn reading(limits: CapacityLimits, active_kw: f32, average_kwh: f32) -> CapacityReading {
    limits
        .reading(active_kw, average_kwh)
        .expect("non-negative reading")
}

/// Appliance spec with endpoints on `base_url`.
pub fn spec_at(base_url: &str, name: &str, priority: i32, status: Status, wattage: u32) -> ApplianceSpec {
    let slug = name.to_lowercase().replace(' ', "-");
    ApplianceSpec {
        name: name.to_string(),
        category: Category::Kitchen,
        priority,
        status,
        status_url: format!("{base_url}/{slug}/status"),
        start_url: format!("{base_url}/{slug}/start"),
        stop_url: format!("{base_url}/{slug}/stop"),
        wattage,
    }
}

pub fn spec(name: &str, priority: i32, status: Status, wattage: u32) -> ApplianceSpec {
    spec_at("http://appliances.local", name, priority, status, wattage)
}

/// The three-appliance house: A1 special (2 kW), A2 baseline, A3 tier 4 (1.5 kW).
pub fn house(a1: Status, a2: Status, a3: Status, a2_watts: u32) -> Registry {
    Registry::from_specs(&[
        spec("A1", -1, a1, 2000),
        spec("A2", 0, a2, a2_watts),
        spec("A3", 4, a3, 1500),
    ])
    .expect("valid house")
}

pub fn house_set(a1: Status, a2: Status, a3: Status, a2_watts: u32) -> ApplianceSet {
    house(a1, a2, a3, a2_watts).snapshot()
}

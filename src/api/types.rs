//! API request and response bodies.

use serde::{Deserialize, Serialize};

use crate::appliance::{Appliance, Category, Status};
use crate::engine::ControlIntent;

/// One registry entry as listed by `GET /appliances`.
#[derive(Debug, Serialize)]
pub struct ApplianceRecord {
    pub name: String,
    pub category: Category,
    pub priority: i32,
    pub status: Status,
    pub kilowatts: f32,
}

impl From<&Appliance> for ApplianceRecord {
    fn from(a: &Appliance) -> Self {
        Self {
            name: a.name().to_string(),
            category: a.category(),
            priority: a.priority().0,
            status: a.status(),
            kilowatts: a.kilowatts(),
        }
    }
}

/// Sensor reading pushed by `POST /readings`.
///
/// Either field may be absent. A load alone is latched; an average triggers
/// an evaluation against the latest load.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadingRequest {
    /// Instantaneous load (kW).
    pub active_power: Option<f32>,
    /// Rolling-average consumption (kWh).
    pub estimated_consumption: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    /// Intent dispatched by this reading, if any.
    pub intent: Option<ControlIntent>,
}

/// Error response body for 4xx and 5xx replies.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

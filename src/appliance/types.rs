//! Appliance identity, priority tiers, status and endpoints.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Room or area an appliance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Category {
    Entrance,
    BathroomDownstairs,
    LivingRoom,
    Kitchen,
    StorageRoomDownstairs,
    Stairs,
    HallwayUpstairs,
    StorageRoomUpstairs,
    Purple,
    Gym,
    BathroomUpstairs,
    Bedroom,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Entrance,
        Category::BathroomDownstairs,
        Category::LivingRoom,
        Category::Kitchen,
        Category::StorageRoomDownstairs,
        Category::Stairs,
        Category::HallwayUpstairs,
        Category::StorageRoomUpstairs,
        Category::Purple,
        Category::Gym,
        Category::BathroomUpstairs,
        Category::Bedroom,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category \"{s}\""))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Operating status of an appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Status {
    On,
    Off,
    /// Excluded from control entirely.
    Disabled,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Status::On),
            "off" => Ok(Status::Off),
            "disabled" => Ok(Status::Disabled),
            _ => Err(format!("unknown status \"{s}\", expected On, Off or Disabled")),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Importance tier of an appliance.
///
/// `-1` is the special tier run during cheap-price windows, `0` is the
/// baseline tier, and positive tiers are optional loads where a larger number
/// means less important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    pub const SPECIAL: Priority = Priority(-1);
    pub const BASELINE: Priority = Priority(0);

    pub fn is_special(self) -> bool {
        self == Self::SPECIAL
    }

    pub fn is_baseline(self) -> bool {
        self == Self::BASELINE
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated absolute URL an appliance answers on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(Url);

impl Endpoint {
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedUrl`] for blank, relative or
    /// otherwise unparseable URLs.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::MalformedUrl {
                url: raw.to_string(),
                reason: "url cannot be blank".to_string(),
            });
        }
        Url::parse(raw)
            .map(Self)
            .map_err(|e| ValidationError::MalformedUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Appliance definition as it appears in configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceSpec {
    pub name: String,
    pub category: Category,
    pub priority: i32,
    /// Initial status; replaced by the live status when probing is enabled.
    pub status: Status,
    pub status_url: String,
    pub start_url: String,
    pub stop_url: String,
    /// Rated power draw in watts.
    pub wattage: u32,
}

/// Position of an appliance in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ApplianceId(pub usize);

/// A controllable appliance.
///
/// Everything except the status is fixed at load time. The status sits
/// behind its own lock so confirmed start/stop calls can update it while
/// evaluations read other appliances.
#[derive(Debug)]
pub struct Appliance {
    id: ApplianceId,
    name: Arc<str>,
    category: Category,
    priority: Priority,
    kilowatts: f32,
    status_url: Endpoint,
    start_url: Endpoint,
    stop_url: Endpoint,
    status: RwLock<Status>,
}

impl Appliance {
    /// Builds an appliance from its configuration entry.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedUrl`] if any endpoint is invalid.
    pub fn from_spec(id: ApplianceId, spec: &ApplianceSpec) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: Arc::from(spec.name.as_str()),
            category: spec.category,
            priority: Priority(spec.priority),
            kilowatts: spec.wattage as f32 / 1000.0,
            status_url: Endpoint::parse(&spec.status_url)?,
            start_url: Endpoint::parse(&spec.start_url)?,
            stop_url: Endpoint::parse(&spec.stop_url)?,
            status: RwLock::new(spec.status),
        })
    }

    pub fn id(&self) -> ApplianceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Rated power draw in kilowatts.
    pub fn kilowatts(&self) -> f32 {
        self.kilowatts
    }

    pub fn status_url(&self) -> &Endpoint {
        &self.status_url
    }

    pub fn start_url(&self) -> &Endpoint {
        &self.start_url
    }

    pub fn stop_url(&self) -> &Endpoint {
        &self.stop_url
    }

    pub fn status(&self) -> Status {
        *self.status.read()
    }

    pub fn set_status(&self, status: Status) {
        let previous = std::mem::replace(&mut *self.status.write(), status);
        if previous != status {
            tracing::debug!(appliance = %self.name, from = %previous, to = %status, "status changed");
        }
    }

    pub(crate) fn reindex(&mut self, id: ApplianceId) {
        self.id = id;
    }

    /// Point-in-time copy of the fields the decision engine reads.
    pub fn view(&self) -> ApplianceView {
        ApplianceView {
            id: self.id,
            name: Arc::clone(&self.name),
            priority: self.priority,
            status: self.status(),
            kilowatts: self.kilowatts,
        }
    }
}

/// Snapshot of one appliance as seen by a single evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplianceView {
    pub id: ApplianceId,
    pub name: Arc<str>,
    pub priority: Priority,
    pub status: Status,
    pub kilowatts: f32,
}

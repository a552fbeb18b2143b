//! TOML configuration and preset definitions.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::appliance::{ApplianceSpec, Category, Endpoint, Registry, Status};
use crate::capacity::CapacityLimits;
use crate::price::{BandConfig, HOURS_PER_DAY};

/// Top-level configuration parsed from TOML.
///
/// Every section has defaults matching the `demo` preset except for the
/// appliance list, which is empty unless given. Load from TOML with
/// [`HomeConfig::from_toml_file`] or use [`HomeConfig::demo`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomeConfig {
    /// Load and average ceilings.
    #[serde(default)]
    pub consumption: ConsumptionConfig,
    /// Price banding and the price feed.
    #[serde(default)]
    pub prices: PricesConfig,
    /// Evaluation rate limit.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// HTTP server and dispatch backend.
    #[serde(default)]
    pub server: ServerConfig,
    /// Offline one-day simulation.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Controllable appliances in priority-query order.
    #[serde(default)]
    pub appliances: Vec<ApplianceSpec>,
}

/// Capacity ceilings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    /// Maximum instantaneous load (kW, must be > 0).
    pub active_load_max_kw: f32,
    /// Maximum rolling-average consumption (kWh, must be > 0).
    pub average_max_kwh: f32,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            active_load_max_kw: 7.0,
            average_max_kwh: 5.0,
        }
    }
}

/// Price banding and feed parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricesConfig {
    /// Width of the cheapest window (hours, 0 disables it).
    pub low_hours: usize,
    /// Width of the costliest window (hours, 0 disables it).
    pub high_hours: usize,
    /// Base url of the price api; absent means offline.
    pub api_url: Option<String>,
    /// Seconds between checks for a new day (must be > 0).
    pub poll_secs: u64,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            low_hours: 4,
            high_hours: 3,
            api_url: None,
            poll_secs: 60,
        }
    }
}

/// Evaluation rate limit.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Minimum seconds between evaluations that dispatched an intent.
    pub min_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: 300,
        }
    }
}

/// HTTP server and dispatch backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address for the api.
    pub bind: String,
    /// `"http"` calls appliance endpoints, `"mock"` answers in process.
    pub dispatcher: String,
    /// Read each appliance's live status at startup.
    pub probe_status: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            dispatcher: "mock".to_string(),
            probe_status: false,
        }
    }
}

/// Offline one-day simulation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Timesteps in the simulated day (must be > 0).
    pub steps_per_day: usize,
    /// Random seed for household noise and the default price curve.
    pub seed: u64,
    /// Mean household load (kW).
    pub base_kw: f32,
    /// Daily swing of household load (kW).
    pub amp_kw: f32,
    /// Phase offset of the daily swing (radians).
    pub phase_rad: f32,
    /// Gaussian noise standard deviation (kW, must be >= 0).
    pub noise_std: f32,
    /// Timesteps in the rolling average (must be > 0).
    pub average_window_steps: usize,
    /// Hourly prices for the day; a seeded curve is used when absent.
    pub prices: Option<Vec<f64>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps_per_day: 96,
            seed: 42,
            base_kw: 1.5,
            amp_kw: 1.0,
            phase_rad: 1.2,
            noise_std: 0.1,
            average_window_steps: 4,
            prices: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.steps_per_day"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn appliance(
    name: &str,
    category: Category,
    priority: i32,
    status: Status,
    host: &str,
    wattage: u32,
) -> ApplianceSpec {
    ApplianceSpec {
        name: name.to_string(),
        category,
        priority,
        status,
        status_url: format!("http://{host}/status"),
        start_url: format!("http://{host}/start"),
        stop_url: format!("http://{host}/stop"),
        wattage,
    }
}

impl HomeConfig {
    /// Returns the demo house: one special-tier water heater, a baseline
    /// floor heater, two optional heaters and one disabled appliance.
    pub fn demo() -> Self {
        Self {
            appliances: vec![
                appliance(
                    "Water heater",
                    Category::BathroomDownstairs,
                    -1,
                    Status::Off,
                    "water-heater.local",
                    2000,
                ),
                appliance(
                    "Bathroom floor",
                    Category::BathroomUpstairs,
                    0,
                    Status::Off,
                    "bathroom-floor.local",
                    1500,
                ),
                appliance(
                    "Living room panel",
                    Category::LivingRoom,
                    1,
                    Status::Off,
                    "living-panel.local",
                    1000,
                ),
                appliance(
                    "Gym heater",
                    Category::Gym,
                    3,
                    Status::Off,
                    "gym-heater.local",
                    800,
                ),
                appliance(
                    "Storage dehumidifier",
                    Category::StorageRoomDownstairs,
                    4,
                    Status::Disabled,
                    "dehumidifier.local",
                    300,
                ),
            ],
            ..Self::default()
        }
    }

    /// Returns the apartment preset: low ceilings, short bands, two loads.
    pub fn apartment() -> Self {
        Self {
            consumption: ConsumptionConfig {
                active_load_max_kw: 4.0,
                average_max_kwh: 3.0,
            },
            prices: PricesConfig {
                low_hours: 2,
                high_hours: 2,
                ..PricesConfig::default()
            },
            simulation: SimulationConfig {
                base_kw: 0.8,
                amp_kw: 0.5,
                ..SimulationConfig::default()
            },
            appliances: vec![
                appliance(
                    "Boiler",
                    Category::Kitchen,
                    -1,
                    Status::Off,
                    "boiler.local",
                    1200,
                ),
                appliance(
                    "Bedroom heater",
                    Category::Bedroom,
                    0,
                    Status::Off,
                    "bedroom-heater.local",
                    600,
                ),
            ],
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "apartment"];

    /// Loads a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "apartment" => Ok(Self::apartment()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    pub fn capacity_limits(&self) -> CapacityLimits {
        CapacityLimits::new(
            self.consumption.active_load_max_kw,
            self.consumption.average_max_kwh,
        )
    }

    pub fn band_config(&self) -> BandConfig {
        BandConfig {
            low_hours: self.prices.low_hours,
            high_hours: self.prices.high_hours,
        }
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.min_interval_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.prices.poll_secs)
    }

    /// Builds the registry from the configured appliances.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first invalid appliance.
    pub fn registry(&self) -> Result<Registry, ConfigError> {
        Registry::from_specs(&self.appliances).map_err(|e| ConfigError {
            field: "appliances".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: String| errors.push(ConfigError { field, message });

        let c = &self.consumption;
        if c.active_load_max_kw.is_nan() || c.active_load_max_kw <= 0.0 {
            push(
                "consumption.active_load_max_kw".into(),
                "must be > 0".into(),
            );
        }
        if c.average_max_kwh.is_nan() || c.average_max_kwh <= 0.0 {
            push("consumption.average_max_kwh".into(), "must be > 0".into());
        }

        let hours = usize::from(HOURS_PER_DAY);
        let p = &self.prices;
        if p.low_hours > hours {
            push("prices.low_hours".into(), format!("must be <= {hours}"));
        }
        if p.high_hours > hours {
            push("prices.high_hours".into(), format!("must be <= {hours}"));
        }
        if p.poll_secs == 0 {
            push("prices.poll_secs".into(), "must be > 0".into());
        }
        if let Some(url) = &p.api_url {
            if let Err(e) = Endpoint::parse(url) {
                push("prices.api_url".into(), e.to_string());
            }
        }

        let srv = &self.server;
        if srv.bind.parse::<SocketAddr>().is_err() {
            push(
                "server.bind".into(),
                format!("must be a socket address, got \"{}\"", srv.bind),
            );
        }
        if srv.dispatcher != "http" && srv.dispatcher != "mock" {
            push(
                "server.dispatcher".into(),
                format!("must be \"http\" or \"mock\", got \"{}\"", srv.dispatcher),
            );
        }

        let s = &self.simulation;
        if s.steps_per_day == 0 {
            push("simulation.steps_per_day".into(), "must be > 0".into());
        }
        if s.average_window_steps == 0 {
            push("simulation.average_window_steps".into(), "must be > 0".into());
        }
        if s.noise_std.is_nan() || s.noise_std < 0.0 {
            push("simulation.noise_std".into(), "must be >= 0".into());
        }
        if let Some(prices) = &s.prices {
            if prices.is_empty() || prices.len() > hours {
                push(
                    "simulation.prices".into(),
                    format!("must hold 1 to {hours} hourly values, got {}", prices.len()),
                );
            }
        }

        let mut names = HashSet::new();
        for (i, a) in self.appliances.iter().enumerate() {
            let field = |name: &str| format!("appliances[{i}].{name}");
            if a.name.trim().is_empty() {
                push(field("name"), "must not be blank".into());
            } else if !names.insert(a.name.as_str()) {
                push(field("name"), format!("duplicate name \"{}\"", a.name));
            }
            if a.wattage == 0 {
                push(field("wattage"), "must be > 0".into());
            }
            if a.status == Status::Disabled {
                continue;
            }
            for (key, url) in [
                ("status_url", &a.status_url),
                ("start_url", &a.start_url),
                ("stop_url", &a.stop_url),
            ] {
                if let Err(e) = Endpoint::parse(url) {
                    push(field(key), e.to_string());
                }
            }
        }

        errors
    }
}

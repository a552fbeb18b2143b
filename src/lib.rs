//! Price-aware household appliance control.
//!
//! Decides, from the current load, the rolling average and the hour's price
//! band, which single appliance to start or stop.

#[cfg(feature = "api")]
pub mod api;
pub mod appliance;
pub mod capacity;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod feed;
pub mod io;
pub mod price;
pub mod schedule;
pub mod service;
/// One-day simulation, report and step records.
pub mod sim;
pub mod telemetry;

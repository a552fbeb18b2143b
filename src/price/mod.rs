//! Hourly prices, band computation and the shared day table.

pub mod band;
pub mod book;
pub mod types;

pub use band::{BandConfig, Extreme, Window, apply_bands, find_window};
pub use book::PriceBook;
pub use types::{DayPrices, HOURS_PER_DAY, PriceBand, PricePoint};

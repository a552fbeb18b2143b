//! Shared, banded price table for the current day.

use std::sync::Arc;

use parking_lot::RwLock;

use super::band::{BandConfig, apply_bands};
use super::types::{DayPrices, PriceBand};

/// The day's banded prices, replaced as a whole.
///
/// Readers get an `Arc` to the table current at the time of the call, so a
/// refresh never shows them a half-written day.
#[derive(Debug, Default)]
pub struct PriceBook {
    current: RwLock<Arc<DayPrices>>,
}

impl PriceBook {
    pub fn new(day: DayPrices) -> Self {
        Self {
            current: RwLock::new(Arc::new(day)),
        }
    }

    /// Bands `day` with `config` and installs it.
    pub fn install(&self, day: DayPrices, config: BandConfig) -> Arc<DayPrices> {
        let banded = Arc::new(apply_bands(day, config));
        self.replace(Arc::clone(&banded));
        banded
    }

    /// Swaps in an already-banded table.
    pub fn replace(&self, day: Arc<DayPrices>) {
        log_bands(&day);
        *self.current.write() = day;
    }

    pub fn snapshot(&self) -> Arc<DayPrices> {
        Arc::clone(&self.current.read())
    }

    /// Band of `hour` in the current table; Normal when it has no price.
    pub fn band_at(&self, hour: u32) -> PriceBand {
        self.current.read().band_at(hour)
    }

    /// Relabels every hour of the current table as Normal.
    pub fn reset_to_normal(&self) {
        let mut current = self.current.write();
        let normal = Arc::new(current.with_all_normal());
        *current = normal;
        tracing::info!("price bands reset to normal");
    }
}

fn log_bands(day: &DayPrices) {
    for (band, label) in [(PriceBand::Low, "low"), (PriceBand::High, "high")] {
        let hours = day.hours_in(band);
        if hours.is_empty() {
            tracing::info!("no {label} price hours");
        } else {
            tracing::info!(?hours, "{label} price hours");
        }
    }
}

//! Sliding-window search for the cheapest and costliest stretch of the day.

use serde::{Deserialize, Serialize};

use super::types::{DayPrices, PriceBand};

/// How many consecutive hours make up the Low and High bands.
///
/// A count of 0 disables that band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandConfig {
    pub low_hours: usize,
    pub high_hours: usize,
}

/// Contiguous run of hours, by index into the day table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub len: usize,
}

/// Which end of the price range a search is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Lowest,
    Highest,
}

impl Extreme {
    fn improves(self, candidate: f64, best: f64) -> bool {
        match self {
            Extreme::Lowest => candidate < best,
            Extreme::Highest => candidate > best,
        }
    }
}

/// Finds the `width`-hour window with the lowest or highest average price.
///
/// The best window is replaced only on a strict improvement, so among equal
/// averages the earliest window wins. The returned window is truncated to the
/// end of `prices`. Returns `None` when `width` is 0 or there are no prices.
pub fn find_window(prices: &[f64], width: usize, extreme: Extreme) -> Option<Window> {
    if width == 0 || prices.is_empty() {
        return None;
    }

    let divisor = width as f64;
    let mut sum: f64 = prices.iter().take(width).sum();
    let mut best_avg = sum / divisor;
    let mut best_start = 0;

    for i in width..prices.len() {
        sum = sum - prices[i - width] + prices[i];
        let avg = sum / divisor;
        if extreme.improves(avg, best_avg) {
            best_avg = avg;
            best_start = i + 1 - width;
        }
    }

    Some(Window {
        start: best_start,
        len: width.min(prices.len() - best_start),
    })
}

/// Labels `window` with `band`.
///
/// Every point whose hour falls inside the window is relabeled, so a feed
/// that repeats an hour gets both copies labeled.
fn label(day: &mut DayPrices, window: Window, band: PriceBand) {
    let hours: Vec<u8> = day.points()[window.start..window.start + window.len]
        .iter()
        .map(|p| p.hour())
        .collect();
    for p in day.points_mut() {
        if hours.contains(&p.hour()) {
            p.set_band(band);
        }
    }
}

/// Runs the Low search and then the High search over `day`.
///
/// The searches are independent. When both windows share hours the High
/// label, written second, is the one that stays. A synthesized day has no
/// real prices to rank and is returned all Normal.
pub fn apply_bands(mut day: DayPrices, config: BandConfig) -> DayPrices {
    if day.is_synthesized() {
        return day;
    }
    let values = day.values();

    if let Some(w) = find_window(&values, config.low_hours, Extreme::Lowest) {
        label(&mut day, w, PriceBand::Low);
    }
    if let Some(w) = find_window(&values, config.high_hours, Extreme::Highest) {
        label(&mut day, w, PriceBand::High);
    }

    day
}

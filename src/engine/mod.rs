//! Decision engine: picks the rule chain for the current price band and runs it.
//!
//! The engine is pure. It reads a capacity reading and an appliance snapshot
//! and never touches live appliance state.

pub mod intent;
pub mod strategy;

pub use intent::{Action, ControlIntent};
pub use strategy::{HighPriceStrategy, LowPriceStrategy, NormalPriceStrategy, Strategy};

use crate::appliance::ApplianceSet;
use crate::capacity::CapacityReading;
use crate::price::PriceBand;

/// Rule chain used for `band`.
pub fn strategy_for(band: PriceBand) -> &'static dyn Strategy {
    match band {
        PriceBand::Low => &LowPriceStrategy,
        PriceBand::Normal => &NormalPriceStrategy,
        PriceBand::High => &HighPriceStrategy,
    }
}

/// Runs one evaluation and returns at most one intent.
///
/// `None` is an ordinary outcome: nothing needs to change.
pub fn evaluate(
    band: PriceBand,
    reading: &CapacityReading,
    set: &ApplianceSet,
) -> Option<ControlIntent> {
    strategy_for(band).evaluate(reading, set)
}

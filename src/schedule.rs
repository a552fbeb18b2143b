//! When to evaluate and when to refresh prices.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Default spacing between evaluations that acted.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(300);

/// Rate limit on acted-on evaluations.
///
/// Only evaluations that dispatched an intent are recorded, so quiet periods
/// do not hold the gate closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationGate {
    min_interval: Duration,
    last_acted: Option<DateTime<Utc>>,
}

impl EvaluationGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_acted: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_acted(&self) -> Option<DateTime<Utc>> {
        self.last_acted
    }

    /// Whether an evaluation may run at `now`.
    pub fn is_open<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let Some(last) = self.last_acted else {
            return true;
        };
        match chrono::Duration::from_std(self.min_interval) {
            Ok(interval) => last + interval < now.with_timezone(&Utc),
            // an interval too large for chrono never reopens
            Err(_) => false,
        }
    }

    /// Records that an intent was dispatched at `at`.
    pub fn record<Tz: TimeZone>(&mut self, at: &DateTime<Tz>) {
        self.last_acted = Some(at.with_timezone(&Utc));
    }
}

impl Default for EvaluationGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

/// Once-per-local-day price refresh tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyRefresh {
    last_success: Option<NaiveDate>,
}

impl DailyRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_success(&self) -> Option<NaiveDate> {
        self.last_success
    }

    /// Due when nothing has been fetched yet or the calendar day has changed.
    pub fn is_due<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.last_success != Some(now.date_naive())
    }

    pub fn mark_done<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        self.last_success = Some(now.date_naive());
    }
}

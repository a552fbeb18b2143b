//! Long-running control service.
//!
//! Ties the registry, price book, engine, evaluation gate and dispatcher
//! together. One evaluation cycle is: validate the reading, check the gate,
//! look up the band for the current hour, snapshot the registry, run the
//! engine, dispatch the intent, apply the confirmed status and record the
//! gate time.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Timelike, Utc};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::appliance::{Registry, Status};
use crate::capacity::CapacityLimits;
use crate::config::HomeConfig;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::engine::{self, Action, ControlIntent};
use crate::error::ValidationError;
use crate::feed::{FeedError, PriceFeed};
use crate::price::{BandConfig, DayPrices, PriceBook};
use crate::schedule::{DailyRefresh, EvaluationGate};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Static parameters of a service, taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceSettings {
    pub limits: CapacityLimits,
    pub bands: BandConfig,
    pub min_interval: Duration,
    pub poll_interval: Duration,
}

impl ServiceSettings {
    pub fn from_config(config: &HomeConfig) -> Self {
        Self {
            limits: config.capacity_limits(),
            bands: config.band_config(),
            min_interval: config.min_interval(),
            poll_interval: config.poll_interval(),
        }
    }
}

pub struct Service {
    settings: ServiceSettings,
    registry: Registry,
    prices: PriceBook,
    feed: PriceFeed,
    dispatcher: Arc<dyn Dispatcher>,
    // held across evaluate -> dispatch -> apply
    gate: tokio::sync::Mutex<EvaluationGate>,
    refresh: Mutex<DailyRefresh>,
    last_active_load: Mutex<Option<f32>>,
}

impl Service {
    pub fn new(
        settings: ServiceSettings,
        registry: Registry,
        feed: PriceFeed,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        Self {
            gate: tokio::sync::Mutex::new(EvaluationGate::new(settings.min_interval)),
            settings,
            registry,
            prices: PriceBook::default(),
            feed,
            dispatcher,
            refresh: Mutex::new(DailyRefresh::new()),
            last_active_load: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn prices(&self) -> &PriceBook {
        &self.prices
    }

    /// Reads the live status of every appliance.
    ///
    /// An appliance whose status cannot be read keeps its configured status.
    pub async fn probe_statuses(&self) {
        for appliance in self.registry.iter() {
            match self.dispatcher.probe_status(appliance).await {
                Ok(status) => {
                    if status == Status::Disabled {
                        warn!(appliance = appliance.name(), "unknown live status, excluded from control");
                    }
                    appliance.set_status(status);
                }
                Err(e) => {
                    warn!(appliance = appliance.name(), error = %e, "status probe failed, keeping configured status");
                }
            }
        }
    }

    /// Latches the instantaneous load for the next average reading.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Negative`] for a negative or NaN reading.
    pub fn record_active_load(&self, kw: f32) -> Result<(), ValidationError> {
        // reuse the reading check; the average is not known yet
        self.settings.limits.reading(kw, 0.0)?;
        *self.last_active_load.lock() = Some(kw);
        Ok(())
    }

    /// Accepts a rolling-average reading and evaluates with the latched load.
    ///
    /// Without a prior load reading nothing is evaluated.
    ///
    /// # Errors
    ///
    /// See [`Service::evaluate`].
    pub async fn record_average(
        &self,
        kwh: f32,
        now: DateTime<Local>,
    ) -> Result<Option<ControlIntent>, ServiceError> {
        let active = *self.last_active_load.lock();
        let Some(active) = active else {
            info!(average_kwh = kwh, "average received before any load reading, skipping");
            // still reject bad values so callers see them
            self.settings.limits.reading(0.0, kwh)?;
            return Ok(None);
        };
        self.evaluate(active, kwh, now).await
    }

    /// Runs one evaluation cycle.
    ///
    /// Returns the intent that was dispatched, if any. An intent whose
    /// acknowledgement does not confirm it is still returned, but the
    /// appliance status is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for a negative reading and
    /// [`ServiceError::Dispatch`] when the appliance could not be reached.
    pub async fn evaluate(
        &self,
        active_kw: f32,
        average_kwh: f32,
        now: DateTime<Local>,
    ) -> Result<Option<ControlIntent>, ServiceError> {
        let reading = self.settings.limits.reading(active_kw, average_kwh)?;

        let mut gate = self.gate.lock().await;
        if !gate.is_open(&now) {
            debug!(last_acted = ?gate.last_acted(), "evaluation gate closed");
            return Ok(None);
        }

        let band = self.prices.band_at(now.hour());
        let set = self.registry.snapshot();
        let Some(intent) = engine::evaluate(band, &reading, &set) else {
            debug!(%band, active_kw, average_kwh, "no change needed");
            return Ok(None);
        };

        let Some(appliance) = self.registry.get(intent.appliance) else {
            warn!(appliance = %intent.name, "intent for unknown appliance dropped");
            return Ok(None);
        };

        let ack = self.dispatcher.dispatch(appliance, intent.action).await?;
        gate.record(&now);

        if ack.confirmed {
            appliance.set_status(match intent.action {
                Action::Start => Status::On,
                Action::Stop => Status::Off,
            });
            info!(
                appliance = %intent.name,
                action = %intent.action,
                %band,
                active_kw,
                average_kwh,
                "intent dispatched"
            );
        } else {
            error!(
                appliance = %intent.name,
                action = %intent.action,
                reply = %ack.body,
                "appliance did not confirm"
            );
        }

        Ok(Some(intent))
    }

    /// Whether the day's prices still need fetching at `now`.
    pub fn refresh_due(&self, now: DateTime<Local>) -> bool {
        self.refresh.lock().is_due(&now)
    }

    /// Fetches, bands and installs the prices for the day of `now`.
    ///
    /// On failure a zero-priced day is installed and the refresh stays due,
    /// so the next poll tries again.
    ///
    /// # Errors
    ///
    /// Returns the feed or validation error that prevented the refresh.
    pub async fn refresh_prices(&self, now: DateTime<Local>) -> Result<Arc<DayPrices>, ServiceError> {
        let fetched = self
            .feed
            .fetch_day(now.with_timezone(&Utc))
            .await
            .map_err(ServiceError::from)
            .and_then(|pairs| DayPrices::from_pairs(pairs).map_err(ServiceError::from));

        match fetched {
            Ok(day) => {
                let installed = self.prices.install(day, self.settings.bands);
                self.refresh.lock().mark_done(&now);
                info!(hours = installed.points().len(), "prices refreshed");
                Ok(installed)
            }
            Err(e) => {
                error!(error = %e, "price refresh failed, using a flat day");
                self.prices.install(DayPrices::zeroed(), self.settings.bands);
                Err(e)
            }
        }
    }
}

/// Polls for a new day and refreshes prices until `shutdown` resolves.
pub async fn run_price_worker(service: Arc<Service>, shutdown: impl Future<Output = ()>) {
    let mut ticker = tokio::time::interval(service.settings.poll_interval);
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("price worker stopping");
                break;
            }
            _ = ticker.tick() => {
                let now = Local::now();
                if service.refresh_due(now) {
                    info!(date = %now.date_naive(), "new day, fetching prices");
                    if let Err(e) = service.refresh_prices(now).await {
                        debug!(error = %e, "price refresh will be retried on the next tick");
                    }
                }
            }
        }
    }
}

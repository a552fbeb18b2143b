//! Day-ahead price feed client.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("price request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("price api answered with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("price payload could not be parsed: {0}")]
    Decode(String),
    #[error("invalid price api url \"{url}\": {reason}")]
    Url { url: String, reason: String },
}

/// One entry of the `pricesDay` response.
#[derive(Debug, Deserialize)]
struct RawPrice {
    #[serde(rename = "timeStamp", alias = "TimeStamp", alias = "timestamp")]
    time_stamp: String,
    #[serde(alias = "Price")]
    price: f64,
}

/// Client for the `{api_url}/pricesDay` endpoint.
///
/// Without an api url the feed is offline and every fetch returns an empty
/// list, which the price book turns into a zero-priced day.
#[derive(Debug, Clone)]
pub struct PriceFeed {
    api_url: Option<Url>,
    client: Client,
}

impl PriceFeed {
    /// # Errors
    ///
    /// Fails on a malformed `api_url` or if the HTTP client cannot be built.
    pub fn new(api_url: Option<&str>) -> Result<Self, FeedError> {
        let api_url = api_url
            .map(|raw| {
                Url::parse(raw.trim_end_matches('/')).map_err(|e| FeedError::Url {
                    url: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { api_url, client })
    }

    pub fn offline() -> Self {
        Self {
            api_url: None,
            client: Client::new(),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.api_url.is_none()
    }

    /// Fetches the prices for the day containing `now`.
    ///
    /// Returns `(local hour, price)` pairs in response order.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] on transport failure, a non-2xx answer, or a
    /// payload with an unreadable timestamp.
    pub async fn fetch_day(&self, now: DateTime<Utc>) -> Result<Vec<(u32, f64)>, FeedError> {
        let Some(base) = &self.api_url else {
            return Ok(Vec::new());
        };

        let url = format!("{}/pricesDay", base.as_str().trim_end_matches('/'));
        let date = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let resp = self.client.get(url).query(&[("date", date)]).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Vec<RawPrice> =
            serde_json::from_str(&body).map_err(|e| FeedError::Decode(e.to_string()))?;
        let pairs = raw
            .into_iter()
            .map(|r| {
                local_hour(&r.time_stamp)
                    .map(|hour| (hour, r.price))
                    .ok_or_else(|| FeedError::Decode(format!("bad timestamp \"{}\"", r.time_stamp)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = pairs.len(), "fetched day prices");
        Ok(pairs)
    }
}

/// Local hour of an RFC 3339 timestamp, or of a naive timestamp read as
/// local time.
fn local_hour(raw: &str) -> Option<u32> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Local).hour());
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.hour())
}

//! Outbound calls to appliance endpoints.
//!
//! A [`Dispatcher`] performs the start/stop call for an intent and reads an
//! appliance's live status. Appliance endpoints answer start/stop with free
//! text; the action counts as done only when that text contains the matching
//! word ("started" or "stopped").

pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::appliance::{Appliance, Status};
use crate::engine::Action;

pub use http::HttpDispatcher;
pub use mock::MockDispatcher;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unreadable status from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Reply to a start or stop call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub action: Action,
    pub body: String,
    pub confirmed: bool,
}

impl Acknowledgement {
    /// Interprets `body` as the reply to `action`.
    pub fn parse(action: Action, body: impl Into<String>) -> Self {
        let body = body.into();
        let confirmed = body
            .to_ascii_lowercase()
            .contains(action.acknowledgement());
        Self {
            action,
            body,
            confirmed,
        }
    }
}

/// Status document served on an appliance's status endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusReply {
    on_state: Value,
}

impl StatusReply {
    /// `true` / `"true"` is On, `false` / `"false"` is Off, anything else
    /// takes the appliance out of control.
    pub(crate) fn status(&self) -> Status {
        match &self.on_state {
            Value::Bool(true) => Status::On,
            Value::Bool(false) => Status::Off,
            Value::String(s) if s.eq_ignore_ascii_case("true") => Status::On,
            Value::String(s) if s.eq_ignore_ascii_case("false") => Status::Off,
            _ => Status::Disabled,
        }
    }
}

#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Calls the start or stop endpoint of `appliance`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the call itself fails. A reply that does
    /// not confirm the action is not an error; see
    /// [`Acknowledgement::confirmed`].
    async fn dispatch(
        &self,
        appliance: &Appliance,
        action: Action,
    ) -> Result<Acknowledgement, DispatchError>;

    /// Reads the live on/off state of `appliance`.
    async fn probe_status(&self, appliance: &Appliance) -> Result<Status, DispatchError>;
}

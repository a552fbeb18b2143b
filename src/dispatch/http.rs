use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Acknowledgement, DispatchError, Dispatcher, StatusReply};
use crate::appliance::{Appliance, Endpoint, Status};
use crate::engine::Action;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Dispatcher that talks to appliances over HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
}

impl HttpDispatcher {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get(&self, endpoint: &Endpoint) -> Result<reqwest::Response, DispatchError> {
        let url = endpoint.as_str();
        let resp = self
            .client
            .get(endpoint.url().clone())
            .send()
            .await
            .map_err(|source| DispatchError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DispatchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(
        &self,
        appliance: &Appliance,
        action: Action,
    ) -> Result<Acknowledgement, DispatchError> {
        let endpoint = match action {
            Action::Start => appliance.start_url(),
            Action::Stop => appliance.stop_url(),
        };
        let body = self
            .get(endpoint)
            .await?
            .text()
            .await
            .map_err(|source| DispatchError::Request {
                url: endpoint.to_string(),
                source,
            })?;
        Ok(Acknowledgement::parse(action, body))
    }

    async fn probe_status(&self, appliance: &Appliance) -> Result<Status, DispatchError> {
        let endpoint = appliance.status_url();
        let body = self
            .get(endpoint)
            .await?
            .text()
            .await
            .map_err(|source| DispatchError::Request {
                url: endpoint.to_string(),
                source,
            })?;
        let reply: StatusReply =
            serde_json::from_str(&body).map_err(|e| DispatchError::Decode {
                url: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        Ok(reply.status())
    }
}

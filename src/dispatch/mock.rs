use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Acknowledgement, DispatchError, Dispatcher};
use crate::appliance::{Appliance, Status};
use crate::engine::Action;

/// Reply the mock gives to every start or stop call.
pub const MOCK_REPLY: &str = "started and stopped";

/// In-process dispatcher for development and tests.
///
/// Confirms every action and reports every appliance as On. Calls are kept
/// so callers can see what would have been sent.
#[derive(Debug)]
pub struct MockDispatcher {
    reply: String,
    probe: Status,
    calls: Mutex<Vec<(String, Action)>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::with_reply(MOCK_REPLY)
    }

    /// Mock that answers every call with `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            probe: Status::On,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_probe(mut self, status: Status) -> Self {
        self.probe = status;
        self
    }

    /// `(appliance name, action)` for every dispatch so far.
    pub fn calls(&self) -> Vec<(String, Action)> {
        self.calls.lock().clone()
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatcher for MockDispatcher {
    async fn dispatch(
        &self,
        appliance: &Appliance,
        action: Action,
    ) -> Result<Acknowledgement, DispatchError> {
        self.calls.lock().push((appliance.name().to_string(), action));
        Ok(Acknowledgement::parse(action, self.reply.clone()))
    }

    async fn probe_status(&self, _appliance: &Appliance) -> Result<Status, DispatchError> {
        Ok(self.probe)
    }
}

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::appliance::{ApplianceId, ApplianceView};

/// What to do with an appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    /// Word an appliance endpoint must answer with to confirm this action.
    pub fn acknowledgement(self) -> &'static str {
        match self {
            Action::Start => "started",
            Action::Stop => "stopped",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Start => "start",
            Action::Stop => "stop",
        })
    }
}

/// Single start or stop request produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlIntent {
    pub action: Action,
    #[serde(skip)]
    pub appliance: ApplianceId,
    #[serde(rename = "appliance")]
    pub name: Arc<str>,
}

impl ControlIntent {
    pub fn start(target: &ApplianceView) -> Self {
        Self::new(Action::Start, target)
    }

    pub fn stop(target: &ApplianceView) -> Self {
        Self::new(Action::Stop, target)
    }

    fn new(action: Action, target: &ApplianceView) -> Self {
        Self {
            action,
            appliance: target.id,
            name: Arc::clone(&target.name),
        }
    }
}

impl fmt::Display for ControlIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.name)
    }
}

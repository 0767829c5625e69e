//! Per-service action reporting
//!
//! Orchestration is best-effort: one service failing must not stop the
//! rest of the invocation, but the failure has to surface in the exit
//! status. Handlers record every service outcome here and the binary
//! derives its exit code from the finished report.

use serde::{Deserialize, Serialize};

/// Orchestration action being reported on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceAction {
    Up,
    Down,
    Build,
    Clean,
}

impl std::fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceAction::Up => write!(f, "up"),
            ServiceAction::Down => write!(f, "down"),
            ServiceAction::Build => write!(f, "build"),
            ServiceAction::Clean => write!(f, "clean"),
        }
    }
}

/// Outcome of one service's action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    /// Service the result belongs to
    pub service: String,

    /// Whether the action succeeded
    pub success: bool,

    /// Success message
    pub message: String,

    /// Error message if failed
    pub error: Option<String>,
}

/// Aggregated outcome of one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    /// The action that was performed
    pub action: ServiceAction,

    /// Services whose action succeeded
    pub succeeded: Vec<ActionResult>,

    /// Services whose action failed
    pub failed: Vec<ActionResult>,
}

impl ActionReport {
    pub fn new(action: ServiceAction) -> Self {
        Self {
            action,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, service: impl Into<String>, message: impl Into<String>) {
        self.succeeded.push(ActionResult {
            service: service.into(),
            success: true,
            message: message.into(),
            error: None,
        });
    }

    pub fn add_failure(&mut self, service: impl Into<String>, error: impl Into<String>) {
        self.failed.push(ActionResult {
            service: service.into(),
            success: false,
            message: String::new(),
            error: Some(error.into()),
        });
    }

    /// One-line summary for the end of an invocation.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} succeeded, {} failed",
            self.action,
            self.succeeded.len(),
            self.failed.len()
        )
    }
}

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Non-fatal diagnostic raised during an operation, e.g. a requested volume
/// shrink that the control plane cannot perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub summary: String,
    pub detail: String,
}

/// Per-operation context: the caller-owned cancellation signal plus a sink
/// for non-fatal warnings.
///
/// The token bounds every blocking wait inside the operation; the caller
/// decides the deadline policy (different operations tolerate different
/// maximum wait times) and cancels the token when it elapses.
pub struct OpContext {
    cancel: CancellationToken,
    warnings: Mutex<Vec<Warning>>,
}

impl OpContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            warnings: Mutex::new(Vec::new()),
        }
    }

    /// Context without a deadline — the operation waits as long as it takes.
    pub fn detached() -> Self {
        Self::new(CancellationToken::new())
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn warn(&self, summary: impl Into<String>, detail: impl Into<String>) {
        let warning = Warning {
            summary: summary.into(),
            detail: detail.into(),
        };
        tracing::warn!(summary = %warning.summary, detail = %warning.detail, "reconcile warning");
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }

    /// Warnings accumulated so far, in the order they were raised.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for OpContext {
    fn default() -> Self {
        Self::detached()
    }
}

use thiserror::Error;

use cirrus_api::ApiError;

use crate::filter::FilterError;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A remote call failed at the transport or server level. Propagated
    /// verbatim; the core never retries on the caller's behalf.
    #[error("client error: {0}")]
    Client(#[from] ApiError),

    /// The expected entity is absent. A normal read outcome when the
    /// entity was deleted out-of-band; the host drops it from desired
    /// state without attempting deletion.
    #[error("not found: {0}")]
    NotFound(String),

    /// A lookup matched more than one candidate. Always a configuration
    /// bug — never recovered automatically.
    #[error("ambiguous result: more than one {0} matches")]
    Ambiguous(String),

    /// The operation is structurally impossible, typically an in-place
    /// change to an immutable attribute. The host must replace the
    /// resource (delete + create) instead.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// The caller's deadline elapsed while waiting. The remote operation
    /// may still complete later: this means "result unknown", not proof of
    /// remote failure.
    #[error("timeout while waiting for {0}")]
    Timeout(String),

    /// The remote side settled an order in a failed state.
    #[error("order {0} failed on the remote side")]
    OrderFailed(u64),

    /// A create left partial side effects behind and the best-effort
    /// rollback failed as well. Both errors are reported so the host can
    /// decide whether manual intervention is needed.
    #[error("{source} (cleanup also failed: {cleanup})")]
    CleanupFailed {
        source: Box<ReconcileError>,
        cleanup: Box<ReconcileError>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReconcileError {
    /// Map a remote read failure: a client-side NotFound becomes the
    /// reconciler's NotFound outcome, everything else stays a client error.
    pub(crate) fn from_read(what: impl Into<String>, err: ApiError) -> Self {
        if err.is_not_found() {
            Self::NotFound(what.into())
        } else {
            Self::Client(err)
        }
    }

    pub(crate) fn from_filter(what: &str, err: FilterError) -> Self {
        match err {
            FilterError::NoResults => Self::NotFound(format!("no {what} matches the selector")),
            FilterError::AmbiguousResults => Self::Ambiguous(what.to_string()),
        }
    }
}

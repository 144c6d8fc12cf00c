use thiserror::Error;

/// Failure surface of every remote call.
///
/// `NotFound` is a separate variant (not a status-code check at call sites)
/// because reconcilers treat it as a normal outcome: a read maps it to
/// "entity deleted out-of-band" and a delete maps it to success.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

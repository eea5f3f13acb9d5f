use remote_authority::RemoteError;
use thiserror::Error;

/// Failed authenticate call.
///
/// `message` is the same text recorded as the store's `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthenticateError {
    message: String,
    #[source]
    source: RemoteError,
}

impl AuthenticateError {
    #[must_use]
    pub fn new(message: impl Into<String>, source: RemoteError) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Underlying failure reported by the remote authority.
    #[must_use]
    pub fn remote(&self) -> &RemoteError {
        &self.source
    }
}

//! Backend trait definitions for sentiment API clients

use async_trait::async_trait;

use crate::corpus::Label;

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Rate limited by remote service")]
    RateLimited,

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Service reported an error: {0}")]
    Declared(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// A sentiment classification service.
///
/// Implementations normalise whatever their service returns into a
/// [`Label`] before returning; the evaluation core never looks at native
/// response shapes.
#[async_trait]
pub trait SentimentBackend: Send + Sync {
    /// Unique, stable name (e.g. "datumbox", "repustate")
    fn name(&self) -> &str;

    /// Assign a sentiment label to the text
    async fn classify(&self, text: &str) -> BackendResult<Label>;
}

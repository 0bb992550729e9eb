use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// `success: false`; the server's message is shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("response contained no data")]
    MissingData,
}

/// The `{success, message, data}` wrapper every API response uses.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    fn check(&mut self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            let message = self
                .message
                .take()
                .unwrap_or_else(|| "request failed".to_string());
            Err(ApiError::Rejected(message))
        }
    }

    pub fn into_data(mut self) -> Result<T, ApiError> {
        self.check()?;
        self.data.ok_or(ApiError::MissingData)
    }

    /// For endpoints whose success carries no payload.
    pub fn into_ack(mut self) -> Result<(), ApiError> {
        self.check()
    }
}

/// Body of `GET /health`. Not wrapped in an envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

use thiserror::Error;

/// Failures of the application lookup
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("application '{0}' not found")]
    NotFound(String),

    #[error("application service answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("application service unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed application record: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

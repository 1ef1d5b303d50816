use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unexpected response from upload service: {message}")]
    Protocol { message: String },

    #[error("Remote upload job failed: {message}")]
    RemoteJobFailed { message: String },

    #[error("Gave up polling job {token} after {attempts} attempts")]
    PollTimeout { token: String, attempts: u32 },

    #[error("Upload service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn remote_job_failed(message: impl Into<String>) -> Self {
        Self::RemoteJobFailed {
            message: message.into(),
        }
    }

    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Failures a caller may reasonably try again. The crate itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Network(_) | AppError::Io(_) | AppError::PollTimeout { .. } => true,
            AppError::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AppError::InvalidArgument(_)
                | AppError::Protocol { .. }
                | AppError::RemoteJobFailed { .. }
                | AppError::Validation { .. }
                | AppError::Config(_)
        )
    }
}

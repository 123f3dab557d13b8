use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NetworkError(_) => "NETWORK_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::ConfigError(_) => "CONFIG_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the learner may simply try the same action again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::NetworkError(_))
    }

    /// Message shown to the learner in place of the raw error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Conflict(_) => "Maximum attempts reached for this quiz.".to_string(),
            AppError::NotFound(_) => {
                "This quiz or attempt could not be found. Please reload the page.".to_string()
            }
            AppError::ValidationError(_) => {
                "Your answers were rejected by the server. Please reload the page.".to_string()
            }
            AppError::NetworkError(_) => {
                "Could not reach the server. Please try again.".to_string()
            }
            AppError::Unauthorized(_) => "Your session has expired. Please sign in again.".to_string(),
            AppError::InvalidState(msg) => msg.clone(),
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Maps a non-success HTTP response onto the error taxonomy.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = if body.trim().is_empty() {
            status.to_string()
        } else {
            body.trim().to_string()
        };

        match status {
            StatusCode::CONFLICT => AppError::Conflict(detail),
            StatusCode::NOT_FOUND => AppError::NotFound(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::ValidationError(detail)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(detail),
            _ => AppError::NetworkError(format!("{}: {}", status.as_u16(), detail)),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return AppError::InternalError(format!("Response decoding error: {}", err));
        }
        if let Some(status) = err.status() {
            return AppError::from_status(status, &err.to_string());
        }
        AppError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

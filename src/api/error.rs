use thiserror::Error;

/// Failure talking to the records backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS trouble and friends.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx answer. `message` carries the backend's own explanation when
    /// the body had one.
    #[error("server responded with status {status}")]
    Server {
        status: u16,
        message: Option<String>,
    },
    #[error("resource not found")]
    NotFound { message: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Message reported by the backend itself, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } | ApiError::NotFound { message } => {
                message.as_deref()
            }
            ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }

    /// The text shown to the user: the backend message verbatim when present,
    /// otherwise the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

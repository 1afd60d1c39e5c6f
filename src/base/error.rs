use thiserror::Error;

/// Errors raised while talking to the content backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout, ...)
    #[error("network error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status code
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },

    /// The addressed record does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The payload could not be mapped to or from the expected shape
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A service reported failure through its envelope
    #[error("{0}")]
    Remote(String),
}

impl ApiError {
    /// HTTP-like status code describing the failure
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Status { status, .. } => *status,
            ApiError::NotFound(_) => 404,
            _ => 500,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ApiError::Transport(err.to_string()),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound("/tags/1".to_string()).status_code(), 404);
        assert_eq!(
            ApiError::Status { status: 401, message: "unauthorized".to_string() }.status_code(),
            401
        );
        assert_eq!(ApiError::Transport("refused".to_string()).status_code(), 500);
    }

    #[test]
    fn test_remote_message_is_passed_through() {
        let err = ApiError::Remote("failed to load categories".to_string());
        assert_eq!(err.to_string(), "failed to load categories");
    }
}

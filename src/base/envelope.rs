use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};

/// Uniform response envelope returned by every service call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub data: Option<T>,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Successful envelope with status 200
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::with_code(200, data, message)
    }

    /// Successful envelope carrying a custom status code (e.g. 201 for creation)
    pub fn with_code(code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            code,
            data: Some(data),
            message: message.into(),
            success: true,
        }
    }

    /// Failure envelope; transport failures are always reported as 500
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            data: None,
            message: message.into(),
            success: false,
        }
    }

    /// Wraps a service result, logging and flattening any error into the envelope
    pub fn from_result(result: ApiResult<T>, success_message: &str, failure_context: &str) -> Self {
        Self::from_result_with_code(200, result, success_message, failure_context)
    }

    pub fn from_result_with_code(
        code: u16,
        result: ApiResult<T>,
        success_message: &str,
        failure_context: &str,
    ) -> Self {
        match result {
            Ok(data) => Self::with_code(code, data, success_message),
            Err(err) => {
                log::error!("{}: {}", failure_context, err);
                Self::failure(err.to_string())
            }
        }
    }

    /// Converts the envelope back into a `Result`, using `fallback` when the
    /// failure carries no message
    pub fn into_result(self, fallback: &str) -> ApiResult<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ApiError::Remote(format!("{}: empty response", fallback))),
            (false, _) if self.message.trim().is_empty() => Err(ApiError::Remote(fallback.to_string())),
            (false, _) => Err(ApiError::Remote(self.message)),
        }
    }
}

//! Error handling for the Tangyuling API
//!
//! Provides consistent error responses in English and Korean

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid date format (ISO 8601 required): {0}")]
    InvalidDate(String),

    // Observation API errors
    #[error("{api} API request failed: {message}")]
    FetchTransport {
        api: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("{api} API returned unparsable body: {body}")]
    FetchParse { api: &'static str, body: String },

    #[error("{api} API response has unexpected shape: {message}")]
    FetchSchema { api: &'static str, message: String },

    #[error("{api} API returned no usable samples")]
    FetchEmptyResult { api: &'static str },

    // Model errors
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Model inference failed: {0}")]
    ModelInference(String),

    // Batch errors
    #[error("Prediction failed for all {attempted} beaches")]
    AllSitesFailed { attempted: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_ko: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Upstream answered with a non-success HTTP status
    pub fn upstream_status(api: &'static str, status: u16) -> Self {
        AppError::FetchTransport {
            api,
            status: Some(status),
            message: status.to_string(),
        }
    }

    /// Upstream could not be reached or the body could not be read
    pub fn upstream_unreachable(api: &'static str, err: impl std::fmt::Display) -> Self {
        AppError::FetchTransport {
            api,
            status: None,
            message: err.to_string(),
        }
    }

    /// Whether the caller, not the service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation { .. } | AppError::InvalidDate(_))
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } | AppError::InvalidDate(_) => "VALIDATION_ERROR",
            AppError::FetchTransport { .. } => "FETCH_TRANSPORT_ERROR",
            AppError::FetchParse { .. } => "FETCH_PARSE_ERROR",
            AppError::FetchSchema { .. } => "FETCH_SCHEMA_ERROR",
            AppError::FetchEmptyResult { .. } => "FETCH_EMPTY_RESULT",
            AppError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            AppError::ModelInference(_) => "MODEL_INFERENCE_ERROR",
            AppError::AllSitesFailed { .. } => "ALL_SITES_FAILED",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn message_ko(&self) -> String {
        match self {
            AppError::Validation { message, .. } => format!("입력값이 올바르지 않습니다: {}", message),
            AppError::InvalidDate(msg) => {
                format!("날짜 형식이 올바르지 않습니다 (ISO 8601 형식 필요): {}", msg)
            }
            AppError::FetchTransport { message, .. } => format!("API 요청 실패: {}", message),
            AppError::FetchParse { body, .. } => format!("JSON 파싱 실패: {}", body),
            AppError::FetchSchema { .. } => "응답 데이터 형식이 올바르지 않습니다".to_string(),
            AppError::FetchEmptyResult { .. } => "유효한 데이터가 없습니다".to_string(),
            AppError::ModelLoad(msg) => format!("모델 로드 실패: {}", msg),
            AppError::ModelInference(msg) => format!("예측 실패: {}", msg),
            AppError::AllSitesFailed { .. } => "모든 해변의 예측에 실패했습니다".to_string(),
            AppError::Configuration(msg) => format!("설정 오류: {}", msg),
            AppError::Internal(_) => "서버 내부 오류가 발생했습니다".to_string(),
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            AppError::Validation { field, .. } => Some(field.clone()),
            AppError::InvalidDate(_) => Some("date".to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_detail = ErrorDetail {
            code: self.code().to_string(),
            message_en: self.to_string(),
            message_ko: self.message_ko(),
            field: self.field(),
        };

        // Log the error for debugging
        if self.is_client_error() {
            tracing::warn!("Rejected request: {}", self);
        } else {
            tracing::error!("Error: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_bad_request() {
        let err = AppError::InvalidDate("not-a-date".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::Validation {
            field: "latitude".to_string(),
            message: "latitude must be between -90 and 90".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_pipeline_errors_are_server_errors() {
        let errors = [
            AppError::upstream_status("current", 500),
            AppError::FetchEmptyResult { api: "wind" },
            AppError::ModelLoad("missing".to_string()),
            AppError::AllSitesFailed { attempted: 11 },
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_transport_message_carries_status() {
        let err = AppError::upstream_status("current", 500);
        assert_eq!(err.to_string(), "current API request failed: 500");
        assert!(matches!(
            err,
            AppError::FetchTransport {
                status: Some(500),
                ..
            }
        ));

        let err = AppError::upstream_unreachable("wind", "operation timed out");
        assert_eq!(err.to_string(), "wind API request failed: operation timed out");
    }

    #[test]
    fn test_parse_message_carries_body() {
        let err = AppError::FetchParse {
            api: "current",
            body: "Invalid JSON response".to_string(),
        };
        assert!(err.to_string().contains("Invalid JSON response"));
        assert!(err.message_ko().starts_with("JSON 파싱 실패"));
    }
}

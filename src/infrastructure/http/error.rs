//! HTTP Error Handling
//!
//! 两种错误形态:
//! - ApiError: 放映 API 的统一信封 {errno, error, data}，HTTP 状态码恒为 200
//! - StatusError: 生成端点与故事库端点使用真实状态码，响应体为 {"error": "..."}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::services::PassthroughError;
use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Conflict(String),
}

impl ApiError {
    fn errno(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::Conflict(_) => errno::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let msg = match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Internal(msg)
            | ApiError::Conflict(msg) => msg,
        };

        if errno >= errno::INTERNAL_ERROR {
            tracing::error!(errno, error = %msg, "API error");
        } else {
            tracing::warn!(errno, error = %msg, "API request rejected");
        }

        (StatusCode::OK, Json(ErrorResponse::new(errno, msg))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::BusinessRuleViolation(msg) => ApiError::Conflict(msg),
            ApplicationError::InvalidState(msg) => ApiError::BadRequest(msg),
            ApplicationError::StorageError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

/// 带真实 HTTP 状态码的错误
#[derive(Debug)]
pub struct StatusError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct StatusErrorBody {
    error: String,
}

impl StatusError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for StatusError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(StatusErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<PassthroughError> for StatusError {
    fn from(e: PassthroughError) -> Self {
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, e.to_string())
    }
}

impl From<ApplicationError> for StatusError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "Story not found or invalid")
            }
            ApplicationError::StorageError(msg) => {
                tracing::error!(error = %msg, "Story library read failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Could not read story file")
            }
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

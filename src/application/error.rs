//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{LibraryError, SessionError};
use crate::domain::slideshow::SlideshowError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 业务规则违反
    #[error("Business rule violation: {0}")]
    BusinessRuleViolation(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建业务规则违反错误
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<SessionError> for ApplicationError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => Self::not_found("Session", id),
            SessionError::AlreadyExists(id) => {
                Self::internal(format!("Session already exists: {}", id))
            }
            SessionError::Slideshow(e @ SlideshowError::GenerationInProgress) => {
                Self::business_rule(e.to_string())
            }
            SessionError::Slideshow(e @ SlideshowError::NoStory) => Self::invalid_state(e.to_string()),
        }
    }
}

impl From<LibraryError> for ApplicationError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::NotFound(name) => Self::not_found("Story", name),
            LibraryError::ReadError(msg) | LibraryError::IoError(msg) => Self::StorageError(msg),
        }
    }
}

//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 错误响应结构
//!
//! # 错误分类
//!
//! | 分类 | 说明 | 重试策略 |
//! |------|------|----------|
//! | Validation | 非法输入 | 不重试，立即返回调用方 |
//! | Network | 远端不可达/超时 | 下次调度自动重试，从不致命 |
//! | Forbidden | 许可证/设备被拒 | 不自动重试，提示用户 |
//! | NotFound | 租户/许可证不存在 | 不重试 |
//! | Conflict | 设备配额已满等 | 不重试，返回可操作的提示 |
//! | Database | 本地存储故障 | 对当前操作致命 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::cloud::RemoteError;
use crate::db::repository::RepoError;

/// API 错误响应结构
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Resource conflict: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    #[error("Forbidden: {0}")]
    /// 许可证/设备被拒绝 (403)
    Forbidden(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Remote store unreachable: {0}")]
    /// 远端不可达 (503)，可恢复，降级到离线行为
    Network(String),

    #[error("Database error: {0}")]
    /// 本地数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),

            AppError::Network(msg) => {
                error!(target: "remote", error = %msg, "Remote store unreachable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "E9003",
                    "Remote store unreachable",
                )
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Network(msg) => AppError::Network(msg),
            RemoteError::NotFound(msg) => AppError::NotFound(msg),
            RemoteError::Rejected(msg) => AppError::Forbidden(msg),
            RemoteError::InvalidResponse(msg) => AppError::Internal(msg),
        }
    }
}

impl From<crate::tenant::TenantResolutionError> for AppError {
    fn from(err: crate::tenant::TenantResolutionError) -> Self {
        use crate::tenant::TenantResolutionError::*;
        match err {
            NotFound(slug) => AppError::NotFound(format!("Tenant '{slug}' not found")),
            Local(e) => e.into(),
            Remote(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Application-level Result type used in HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

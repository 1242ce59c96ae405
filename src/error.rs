//! 统一错误类型定义
//!
//! 提供分层的错误处理系统，支持：
//! - 结构化错误信息
//! - 上下文信息追踪
//! - HTTP 与 GraphQL 两种错误出口

use async_graphql::ErrorExtensions;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::ErrorCode;

/// 错误上下文信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    pub operation: String,
    pub resource: Option<String>,
    pub user_id: Option<String>,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Default::default()
        }
    }
}

/// 结构化错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub user_message: String,
    pub details: Option<serde_json::Value>,
    pub context: Option<ErrorContext>,
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    // ===== 数据库错误 =====
    /// 数据库查询错误
    #[error("Database query failed: {source}")]
    DatabaseQuery {
        source: sqlx::Error,
        query: String,
        context: ErrorContext,
    },

    /// 记录不存在
    #[error("{resource} not found: {id}")]
    NotFound {
        resource: String,
        id: String,
        context: ErrorContext,
    },

    // ===== 文件系统错误 =====
    /// 文件未找到
    #[error("File not found: {path}")]
    FileNotFound { path: String, context: ErrorContext },

    /// 文件读写错误
    #[error("File I/O error: {source}")]
    FileIo {
        source: std::io::Error,
        path: Option<String>,
        context: ErrorContext,
    },

    // ===== 验证错误 =====
    /// 输入验证失败
    #[error("Validation failed: {field} - {reason}")]
    Validation {
        field: String,
        reason: String,
        value: Option<String>,
        context: ErrorContext,
    },

    // ===== 认证错误 =====
    /// 认证失败，携带对外暴露的错误码
    #[error("Authentication failed: {code}")]
    Unauthorized { code: ErrorCode, context: ErrorContext },

    // ===== 机器人错误 =====
    /// Telegram Bot API 请求失败
    #[error("Bot request failed: {method} - {source}")]
    BotRequest {
        source: teloxide::RequestError,
        method: String,
        context: ErrorContext,
    },

    // ===== 系统错误 =====
    /// 事件频道未注册
    #[error("Channel not registered: {channel}")]
    ChannelNotRegistered {
        channel: String,
        context: ErrorContext,
    },
}

impl AppError {
    /// 创建错误响应
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            AppError::DatabaseQuery {
                source,
                query,
                context,
            } => {
                error!(
                    "Database query failed: {} - Query: {} - Context: {:?}",
                    source, query, context
                );
                ErrorResponse {
                    code: "DATABASE_QUERY_ERROR".to_string(),
                    message: format!("Database query failed: {}", source),
                    user_message: "Не удалось выполнить запрос, попробуйте позже".to_string(),
                    details: Some(json!({ "query": query })),
                    context: Some(context.clone()),
                }
            }

            AppError::NotFound {
                resource,
                id,
                context,
            } => {
                warn!("{} not found: {} - Context: {:?}", resource, id, context);
                ErrorResponse {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found: {}", resource, id),
                    user_message: "Запись не найдена".to_string(),
                    details: Some(json!({ "resource": resource, "id": id })),
                    context: Some(context.clone()),
                }
            }

            AppError::FileNotFound { path, context } => {
                warn!("File not found: {} - Context: {:?}", path, context);
                ErrorResponse {
                    code: "FILE_NOT_FOUND".to_string(),
                    message: format!("File not found: {}", path),
                    user_message: "Файл не найден".to_string(),
                    details: Some(json!({ "path": path })),
                    context: Some(context.clone()),
                }
            }

            AppError::FileIo {
                source,
                path,
                context,
            } => {
                error!(
                    "File I/O error: {} - Path: {:?} - Context: {:?}",
                    source, path, context
                );
                ErrorResponse {
                    code: "FILE_IO_ERROR".to_string(),
                    message: format!("File I/O error: {}", source),
                    user_message: "Ошибка чтения файла".to_string(),
                    details: Some(json!({ "path": path })),
                    context: Some(context.clone()),
                }
            }

            AppError::Validation {
                field,
                reason,
                value,
                context,
            } => {
                warn!(
                    "Validation failed: {} - {} - Value: {:?} - Context: {:?}",
                    field, reason, value, context
                );
                ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: format!("Validation failed for field '{}': {}", field, reason),
                    user_message: format!("Некорректное значение поля {}", field),
                    details: Some(json!({
                        "field": field,
                        "reason": reason,
                        "value": value
                    })),
                    context: Some(context.clone()),
                }
            }

            AppError::Unauthorized { code, context } => {
                warn!("Authentication failed: {} - Context: {:?}", code, context);
                ErrorResponse {
                    code: code.as_str().to_string(),
                    message: format!("Authentication failed: {}", code),
                    user_message: code.user_message().to_string(),
                    details: None,
                    context: Some(context.clone()),
                }
            }

            AppError::BotRequest {
                source,
                method,
                context,
            } => {
                warn!(
                    "Bot request failed: {} - {} - Context: {:?}",
                    method, source, context
                );
                ErrorResponse {
                    code: "BOT_API_ERROR".to_string(),
                    message: format!("Bot request failed: {} - {}", method, source),
                    user_message: "Ошибка Telegram".to_string(),
                    details: Some(json!({ "method": method })),
                    context: Some(context.clone()),
                }
            }

            AppError::ChannelNotRegistered { channel, context } => {
                error!(
                    "Channel not registered: {} - Context: {:?}",
                    channel, context
                );
                ErrorResponse {
                    code: "CHANNEL_NOT_REGISTERED".to_string(),
                    message: format!("Channel not registered: {}", channel),
                    user_message: "Внутренняя ошибка сервера".to_string(),
                    details: Some(json!({ "channel": channel })),
                    context: Some(context.clone()),
                }
            }
        }
    }

    /// 获取 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            AppError::DatabaseQuery { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound { .. } | AppError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::FileIo { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::BotRequest { .. } => StatusCode::BAD_GATEWAY,
            AppError::ChannelNotRegistered { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 认证错误码（仅认证错误有）
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            AppError::Unauthorized { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_response = self.to_error_response();
        let status = self.http_status();

        let body = Json(json!({
            "error": error_response,
            "status_code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// GraphQL 出口：错误码写入 `extensions.code`
impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let response = self.to_error_response();
        async_graphql::Error::new(response.message).extend_with(|_, extensions| {
            extensions.set("code", response.code);
            extensions.set("userMessage", response.user_message);
        })
    }
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 创建带上下文的文件未找到错误
    pub fn file_not_found(path: impl Into<String>, operation: impl Into<String>) -> Self {
        let path_str = path.into();
        AppError::FileNotFound {
            path: path_str.clone(),
            context: ErrorContext {
                operation: operation.into(),
                resource: Some(path_str),
                ..Default::default()
            },
        }
    }

    /// 创建带上下文的文件读写错误
    pub fn file_io(
        error: std::io::Error,
        path: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        AppError::FileIo {
            source: error,
            path: Some(path.into()),
            context: ErrorContext::new(operation),
        }
    }

    /// 创建带上下文的验证错误
    pub fn validation_error(
        field: impl Into<String>,
        reason: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
            value: None,
            context: ErrorContext::new(operation),
        }
    }

    /// 创建带上下文的数据库查询错误
    pub fn db_query_error(
        error: sqlx::Error,
        query: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        AppError::DatabaseQuery {
            source: error,
            query: query.into(),
            context: ErrorContext::new(operation),
        }
    }

    /// 创建记录不存在错误
    pub fn not_found(
        resource: impl Into<String>,
        id: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        let id = id.into();
        AppError::NotFound {
            resource: resource.into(),
            id: id.clone(),
            context: ErrorContext {
                operation: operation.into(),
                resource: Some(id),
                ..Default::default()
            },
        }
    }

    /// 创建认证错误
    pub fn unauthorized(code: ErrorCode, operation: impl Into<String>) -> Self {
        AppError::Unauthorized {
            code,
            context: ErrorContext::new(operation),
        }
    }

    /// 创建机器人请求错误
    pub fn bot_request(error: teloxide::RequestError, method: impl Into<String>) -> Self {
        let method = method.into();
        AppError::BotRequest {
            source: error,
            context: ErrorContext::new(format!("bot:{}", method)),
            method,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            AppError::DatabaseQuery { context, .. }
            | AppError::NotFound { context, .. }
            | AppError::FileNotFound { context, .. }
            | AppError::FileIo { context, .. }
            | AppError::Validation { context, .. }
            | AppError::Unauthorized { context, .. }
            | AppError::BotRequest { context, .. }
            | AppError::ChannelNotRegistered { context, .. } => context,
        }
    }

    /// 添加用户ID到错误上下文
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.context_mut().user_id = Some(user_id.into());
        self
    }

    /// 添加元数据到错误上下文
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }
}

use chrono::Utc;

use super::ErrorCode;
use crate::error::{AppError, AppResult};
use crate::services::session::{SessionLookup, SessionStore};

/// 随 GraphQL 请求传入的访问令牌（来自 Cookie）
#[derive(Debug, Clone, Default)]
pub struct RequestToken(pub Option<String>);

/// 已认证的访问者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub token: String,
}

/// 将请求令牌解析为访问者
pub async fn authenticate(store: &SessionStore, token: Option<&str>) -> AppResult<Viewer> {
    let token = match token {
        None => {
            return Err(AppError::unauthorized(
                ErrorCode::AuthenticationRequired,
                "authenticate",
            ))
        }
        Some(token) if token.trim().is_empty() => {
            return Err(AppError::unauthorized(
                ErrorCode::Unauthenticated,
                "authenticate",
            ))
        }
        Some(token) => token,
    };

    match store.lookup(token, Utc::now()).await? {
        SessionLookup::Active(session) => Ok(Viewer {
            user_id: session.user_id,
            token: session.token,
        }),
        SessionLookup::Expired(session) => Err(AppError::unauthorized(
            ErrorCode::TokenExpired,
            "authenticate",
        )
        .with_user_id(session.user_id)),
        SessionLookup::Missing => Err(AppError::unauthorized(
            ErrorCode::InvalidToken,
            "authenticate",
        )),
    }
}

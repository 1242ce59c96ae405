use serde::{Deserialize, Serialize};
use std::fmt;

/// 认证失败错误码，会原样暴露给客户端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthenticated,
    InvalidToken,
    TokenExpired,
    AuthenticationRequired,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 4] = [
        ErrorCode::Unauthenticated,
        ErrorCode::InvalidToken,
        ErrorCode::TokenExpired,
        ErrorCode::AuthenticationRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCode::Unauthenticated => "Вы не авторизованы",
            ErrorCode::InvalidToken => "Недействительный токен",
            ErrorCode::TokenExpired => "Срок действия сессии истёк",
            ErrorCode::AuthenticationRequired => "Требуется авторизация",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! 认证相关：令牌提取、Cookie 策略、错误码、访问者解析

pub mod cookie;
pub mod error_code;
pub mod token;
pub mod viewer;

pub use cookie::CookiePolicy;
pub use error_code::ErrorCode;
pub use token::{access_token, AccessToken, ACCESS_TOKEN_COOKIE};
pub use viewer::{authenticate, RequestToken, Viewer};

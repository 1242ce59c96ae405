//! Booking Backend Library
//!
//! 这个库模块用于支持测试和作为库使用

pub mod auth;
pub mod bot;
pub mod config;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod models;
pub mod pubsub;
pub mod router;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::AppState;
pub use models::*;
pub use router::build_router;

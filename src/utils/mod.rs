//! 工具函数模块

pub mod logging;
pub mod mime;

pub use mime::resolve_mime;

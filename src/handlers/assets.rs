//! 二维码静态资源

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::utils::resolve_mime;

/// 二维码资源的挂载点
pub const QR_CODES_MOUNT: &str = "/assets/qr-codes";

/// 二维码子路由，挂载在 `QR_CODES_MOUNT` 下
pub fn qr_code_routes() -> Router<Arc<AppState>> {
    Router::new().route("/*file", get(serve_qr_code))
}

/// 只允许目录下的单个文件名
pub fn validate_file_name(file: &str) -> AppResult<()> {
    let invalid = file.is_empty()
        || file.contains('/')
        || file.contains('\\')
        || file.contains("..")
        || file.starts_with('.');

    if invalid {
        return Err(AppError::Validation {
            field: "file".to_string(),
            reason: "invalid file name".to_string(),
            value: Some(file.to_string()),
            context: crate::error::ErrorContext::new("serve_qr_code"),
        });
    }
    Ok(())
}

pub async fn serve_qr_code(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
) -> AppResult<Response> {
    validate_file_name(&file)?;

    let path = state.config.qr_codes_dir.join(&file);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::file_not_found(file, "serve_qr_code"));
        }
        Err(e) => {
            return Err(AppError::file_io(
                e,
                path.to_string_lossy(),
                "serve_qr_code",
            ));
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, resolve_mime(&file)),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        bytes,
    )
        .into_response())
}

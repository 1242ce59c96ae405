//! HTTP 路由组装
//!
//! 挂载顺序：二维码资源子路由、GraphQL 端点（含订阅流），最后是健康检查。

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{self, assets::QR_CODES_MOUNT, AppState};

pub const GRAPHQL_PATH: &str = "/graphql";
pub const GRAPHQL_STREAM_PATH: &str = "/graphql/stream";

/// CORS：开发环境回显请求来源，生产环境只允许对外地址的来源；均携带 Cookie
fn cors_layer(state: &AppState) -> CorsLayer {
    let origin = if state.config.environment().is_development() {
        AllowOrigin::mirror_request()
    } else {
        match url::Url::parse(&state.config.public_uri)
            .ok()
            .and_then(|url| HeaderValue::from_str(&url.origin().ascii_serialization()).ok())
        {
            Some(origin) => AllowOrigin::exact(origin),
            None => {
                tracing::warn!(public_uri = %state.config.public_uri, "Cannot derive CORS origin");
                AllowOrigin::mirror_request()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .nest(QR_CODES_MOUNT, handlers::qr_code_routes())
        .route(
            GRAPHQL_PATH,
            get(handlers::graphiql).post(handlers::graphql_handler),
        )
        .route(GRAPHQL_STREAM_PATH, get(handlers::graphql_stream_handler))
        .route("/api/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                // 添加响应压缩：支持gzip, deflate, br
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

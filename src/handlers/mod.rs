use axum::response::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::auth::CookiePolicy;
use crate::config::AppConfig;
use crate::graphql::BookingSchema;
use crate::pubsub::PubSub;

pub mod assets;
pub mod graphql;

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: Arc<AppConfig>,
    pub pubsub: PubSub,
    pub schema: BookingSchema,
}

impl AppState {
    /// 由同一组共享组件构建状态和 GraphQL schema
    pub fn new(db: sqlx::SqlitePool, config: Arc<AppConfig>, pubsub: PubSub) -> Self {
        let cookie_policy = CookiePolicy::for_environment(config.environment());
        let schema = crate::graphql::create_schema(db.clone(), pubsub.clone(), cookie_policy);
        Self {
            db,
            config,
            pubsub,
            schema,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub use assets::{qr_code_routes, serve_qr_code};
pub use graphql::{graphiql, graphql_handler, graphql_stream_handler};

//! 测试公共模块

#![allow(dead_code)]

use booking_backend::{
    config::AppConfig, pubsub::PubSub, services::session::SessionStore, AppState,
};
use chrono::{Duration, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// 创建测试数据库连接池
pub async fn create_test_db() -> (SqlitePool, TempDir) {
    booking_backend::utils::logging::init_test_logging();

    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}?mode=rwc", db_path.to_string_lossy());

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to create test database");

    // 运行迁移
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    (pool, temp_dir)
}

pub fn test_config(qr_codes_dir: PathBuf) -> AppConfig {
    AppConfig {
        port: 4000,
        database_url: "sqlite:test.db".to_string(),
        app_env: "development".to_string(),
        log_level: "debug".to_string(),
        public_uri: "http://localhost:4000/graphql".to_string(),
        qr_codes_dir,
        telegram_bot_token: None,
        mini_app_url: None,
    }
}

/// 创建测试应用状态
pub async fn create_test_app_state() -> (Arc<AppState>, TempDir) {
    let (pool, temp_dir) = create_test_db().await;
    let qr_dir = temp_dir.path().join("qr-codes");
    std::fs::create_dir_all(&qr_dir).expect("Failed to create qr-codes dir");

    let state = AppState::new(
        pool,
        Arc::new(test_config(qr_dir)),
        PubSub::with_default_channels(),
    );
    (Arc::new(state), temp_dir)
}

/// 插入测试路线
pub async fn insert_route(pool: &SqlitePool, id: &str, title: &str, age_minutes: i64) {
    let created_at = Utc::now() - Duration::minutes(age_minutes);
    sqlx::query(
        "INSERT INTO routes (id, title, description, qr_code, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(title)
    .bind(Option::<String>::None)
    .bind(format!("{}.png", id))
    .bind(created_at)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("Failed to insert route");
}

/// 签发测试会话，返回令牌
pub async fn issue_token(pool: &SqlitePool, user_id: &str, ttl: Option<Duration>) -> String {
    SessionStore::new(pool.clone())
        .issue(user_id, ttl)
        .await
        .expect("Failed to issue session")
        .token
}

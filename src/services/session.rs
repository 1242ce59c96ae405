//! 会话存储：签发、校验、吊销访问令牌

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::SessionRecord;

/// 令牌查询结果
#[derive(Debug, Clone)]
pub enum SessionLookup {
    Active(SessionRecord),
    Expired(SessionRecord),
    Missing,
}

#[derive(Clone)]
pub struct SessionStore {
    db: SqlitePool,
}

impl SessionStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// 签发新会话；`ttl` 为空则不过期
    pub async fn issue(&self, user_id: &str, ttl: Option<Duration>) -> AppResult<SessionRecord> {
        let now = Utc::now();
        let record = SessionRecord {
            token: uuid::Uuid::new_v4().simple().to_string(),
            user_id: user_id.to_string(),
            expires_at: ttl.map(|ttl| now + ttl),
            created_at: now,
        };

        let query = "INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)";
        sqlx::query(query)
            .bind(&record.token)
            .bind(&record.user_id)
            .bind(record.expires_at)
            .bind(record.created_at)
            .execute(&self.db)
            .await
            .map_err(|e| AppError::db_query_error(e, query, "issue_session"))?;

        tracing::debug!(user_id = %record.user_id, "Session issued");
        Ok(record)
    }

    pub async fn lookup(&self, token: &str, now: DateTime<Utc>) -> AppResult<SessionLookup> {
        let query = "SELECT token, user_id, expires_at, created_at FROM sessions WHERE token = ?";
        let session = sqlx::query_as::<_, SessionRecord>(query)
            .bind(token)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| AppError::db_query_error(e, query, "lookup_session"))?;

        Ok(match session {
            None => SessionLookup::Missing,
            Some(session) => match session.expires_at {
                Some(expires_at) if expires_at <= now => SessionLookup::Expired(session),
                _ => SessionLookup::Active(session),
            },
        })
    }

    /// 吊销会话，返回是否确有记录被删除
    pub async fn revoke(&self, token: &str) -> AppResult<bool> {
        let query = "DELETE FROM sessions WHERE token = ?";
        let result = sqlx::query(query)
            .bind(token)
            .execute(&self.db)
            .await
            .map_err(|e| AppError::db_query_error(e, query, "revoke_session"))?;

        Ok(result.rows_affected() > 0)
    }
}

//! 反馈存储

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{FeedbackRecord, NewFeedback};

const INSERT_FEEDBACK: &str = "INSERT INTO feedback (id, reason, reply_to, message, created_at, updated_at)
     VALUES (?, ?, ?, ?, ?, ?)";

/// 新建一条反馈；每次调用都会生成新记录
pub async fn create_feedback(db: &SqlitePool, input: NewFeedback) -> AppResult<FeedbackRecord> {
    let now = Utc::now();
    let record = FeedbackRecord {
        id: uuid::Uuid::new_v4().to_string(),
        reason: input.reason,
        reply_to: input.reply_to,
        message: input.message,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(INSERT_FEEDBACK)
        .bind(&record.id)
        .bind(&record.reason)
        .bind(&record.reply_to)
        .bind(&record.message)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(db)
        .await
        .map_err(|e| AppError::db_query_error(e, INSERT_FEEDBACK, "create_feedback"))?;

    tracing::info!(feedback_id = %record.id, reason = %record.reason, "Feedback created");

    Ok(record)
}

//! 预约存储

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{BookingRecord, NewBooking};
use crate::services::routes::get_route;

const INSERT_BOOKING: &str = "INSERT INTO bookings (id, route_id, user_id, date, guests, comment, created_at, updated_at)
     VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

/// 为用户创建预约
pub async fn create_booking(
    db: &SqlitePool,
    user_id: &str,
    input: NewBooking,
) -> AppResult<BookingRecord> {
    if input.guests < 1 {
        return Err(AppError::Validation {
            field: "guests".to_string(),
            reason: "must be at least 1".to_string(),
            value: Some(input.guests.to_string()),
            context: crate::error::ErrorContext::new("create_booking"),
        }
        .with_user_id(user_id));
    }

    if get_route(db, &input.route_id).await?.is_none() {
        return Err(AppError::not_found("Route", input.route_id, "create_booking"));
    }

    let now = Utc::now();
    let record = BookingRecord {
        id: uuid::Uuid::new_v4().to_string(),
        route_id: input.route_id,
        user_id: user_id.to_string(),
        date: input.date,
        guests: input.guests,
        comment: input
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(INSERT_BOOKING)
        .bind(&record.id)
        .bind(&record.route_id)
        .bind(&record.user_id)
        .bind(record.date)
        .bind(record.guests)
        .bind(&record.comment)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(db)
        .await
        .map_err(|e| AppError::db_query_error(e, INSERT_BOOKING, "create_booking"))?;

    tracing::info!(
        booking_id = %record.id,
        route_id = %record.route_id,
        user_id = %record.user_id,
        "Booking created"
    );

    Ok(record)
}

/// 按ID获取某个用户的预约，别人的预约视为不存在
pub async fn get_user_booking(
    db: &SqlitePool,
    user_id: &str,
    booking_id: &str,
) -> AppResult<Option<BookingRecord>> {
    let query = "SELECT * FROM bookings WHERE id = ? AND user_id = ?";
    sqlx::query_as::<_, BookingRecord>(query)
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::db_query_error(e, query, "get_user_booking"))
}

/// 用户的全部预约，最新的在前
pub async fn list_user_bookings(db: &SqlitePool, user_id: &str) -> AppResult<Vec<BookingRecord>> {
    let query = "SELECT * FROM bookings WHERE user_id = ? ORDER BY created_at DESC, id DESC";
    sqlx::query_as::<_, BookingRecord>(query)
        .bind(user_id)
        .fetch_all(db)
        .await
        .map_err(|e| AppError::db_query_error(e, query, "list_user_bookings"))
}

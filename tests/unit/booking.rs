use assert_matches::assert_matches;
use booking_backend::services::{booking, feedback};
use booking_backend::{AppError, NewBooking, NewFeedback};
use chrono::{TimeZone, Utc};

use crate::common::{create_test_db, insert_route};

fn new_booking(route_id: &str, guests: i64, comment: Option<&str>) -> NewBooking {
    NewBooking {
        route_id: route_id.to_string(),
        date: Utc.with_ymd_and_hms(2026, 11, 1, 10, 0, 0).unwrap(),
        guests,
        comment: comment.map(str::to_string),
    }
}

#[tokio::test]
async fn test_create_booking_normalizes_comment() {
    let (pool, _temp_dir) = create_test_db().await;
    insert_route(&pool, "r-1", "Lake", 5).await;

    let blank = booking::create_booking(&pool, "user-1", new_booking("r-1", 2, Some("   ")))
        .await
        .unwrap();
    assert_eq!(blank.comment, None);

    let trimmed = booking::create_booking(&pool, "user-1", new_booking("r-1", 2, Some(" hi ")))
        .await
        .unwrap();
    assert_eq!(trimmed.comment.as_deref(), Some("hi"));
    assert_eq!(trimmed.user_id, "user-1");
}

#[tokio::test]
async fn test_create_booking_rejects_invalid_input() {
    let (pool, _temp_dir) = create_test_db().await;
    insert_route(&pool, "r-1", "Lake", 5).await;

    assert_matches!(
        booking::create_booking(&pool, "user-1", new_booking("r-1", 0, None)).await,
        Err(AppError::Validation { field, .. }) if field == "guests"
    );
    assert_matches!(
        booking::create_booking(&pool, "user-1", new_booking("r-404", 1, None)).await,
        Err(AppError::NotFound { .. })
    );
    assert!(booking::list_user_bookings(&pool, "user-1")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_bookings_are_scoped_to_user() {
    let (pool, _temp_dir) = create_test_db().await;
    insert_route(&pool, "r-1", "Lake", 5).await;

    let mine = booking::create_booking(&pool, "user-1", new_booking("r-1", 1, None))
        .await
        .unwrap();
    booking::create_booking(&pool, "user-2", new_booking("r-1", 3, None))
        .await
        .unwrap();

    let listed = booking::list_user_bookings(&pool, "user-1").await.unwrap();
    assert_eq!(listed, vec![mine.clone()]);

    assert_eq!(
        booking::get_user_booking(&pool, "user-1", &mine.id).await.unwrap(),
        Some(mine.clone())
    );
    assert_eq!(
        booking::get_user_booking(&pool, "user-2", &mine.id).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_feedback_rows_are_independent() {
    let (pool, _temp_dir) = create_test_db().await;
    let input = || NewFeedback {
        reason: "bug".to_string(),
        reply_to: "a@b.com".to_string(),
        message: "broken".to_string(),
    };

    let first = feedback::create_feedback(&pool, input()).await.unwrap();
    let second = feedback::create_feedback(&pool, input()).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(first.reply_to, "a@b.com");
    assert!(first.created_at <= second.created_at);
}

//! 路线查询（分页）

use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::RouteRecord;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// 一页路线
#[derive(Debug, Clone)]
pub struct RoutePage {
    pub routes: Vec<RouteRecord>,
    pub next_cursor: Option<String>,
}

impl RoutePage {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// 游标即偏移量的十进制字符串
pub fn parse_cursor(after: Option<&str>) -> AppResult<i64> {
    match after {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|offset| *offset >= 0)
            .ok_or_else(|| {
                AppError::validation_error("after", "cursor must be a non-negative integer", "list_routes")
            }),
    }
}

pub async fn list_routes(db: &SqlitePool, first: i64, after: Option<&str>) -> AppResult<RoutePage> {
    if !(1..=MAX_PAGE_SIZE).contains(&first) {
        return Err(AppError::validation_error(
            "first",
            format!("must be between 1 and {}", MAX_PAGE_SIZE),
            "list_routes",
        )
        .with_metadata("first", first));
    }
    let offset = parse_cursor(after)?;

    // 多取一条用于判断是否还有下一页
    let query = "SELECT id, title, description, qr_code, created_at, updated_at
         FROM routes ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?";
    let mut routes = sqlx::query_as::<_, RouteRecord>(query)
        .bind(first + 1)
        .bind(offset)
        .fetch_all(db)
        .await
        .map_err(|e| AppError::db_query_error(e, query, "list_routes"))?;

    let next_cursor = if routes.len() as i64 > first {
        routes.truncate(first as usize);
        Some((offset + first).to_string())
    } else {
        None
    };

    Ok(RoutePage {
        routes,
        next_cursor,
    })
}

pub async fn get_route(db: &SqlitePool, id: &str) -> AppResult<Option<RouteRecord>> {
    let query = "SELECT id, title, description, qr_code, created_at, updated_at FROM routes WHERE id = ?";
    sqlx::query_as::<_, RouteRecord>(query)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::db_query_error(e, query, "get_route"))
}

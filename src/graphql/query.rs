use async_graphql::{Context, ErrorExtensions, Object, Result as GraphQLResult, ID};
use sqlx::SqlitePool;

use super::require_viewer;
use super::types::{Booking, Route, RoutesPage};
use crate::services::{booking, routes};

/// GraphQL 查询根对象
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// 路线列表（游标分页）
    async fn routes(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> GraphQLResult<RoutesPage> {
        let db = ctx.data::<SqlitePool>()?;
        let first = first.map_or(routes::DEFAULT_PAGE_SIZE, i64::from);
        let page = routes::list_routes(db, first, after.as_deref())
            .await
            .map_err(|e| e.extend())?;
        Ok(page.into())
    }

    /// 根据ID查询单条路线
    async fn route(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<Route>> {
        let db = ctx.data::<SqlitePool>()?;
        let route = routes::get_route(db, &id).await.map_err(|e| e.extend())?;
        Ok(route.map(Route::from))
    }

    /// 当前用户的预约，最新的在前
    async fn my_bookings(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Booking>> {
        let viewer = require_viewer(ctx).await?;
        let db = ctx.data::<SqlitePool>()?;
        let bookings = booking::list_user_bookings(db, &viewer.user_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(bookings.into_iter().map(Booking::from).collect())
    }

    /// 当前用户的单个预约
    async fn booking(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<Booking>> {
        let viewer = require_viewer(ctx).await?;
        let db = ctx.data::<SqlitePool>()?;
        let booking = booking::get_user_booking(db, &viewer.user_id, &id)
            .await
            .map_err(|e| e.extend())?;
        Ok(booking.map(Booking::from))
    }
}

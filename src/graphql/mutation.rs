use async_graphql::{Context, ErrorExtensions, Object, Result as GraphQLResult};
use axum::http::header::SET_COOKIE;
use sqlx::SqlitePool;

use super::require_viewer;
use super::types::{Booking, CreateBookingInput, CreateFeedbackInput, Feedback};
use crate::auth::{CookiePolicy, RequestToken, ACCESS_TOKEN_COOKIE};
use crate::pubsub::{CreatedBooking, CreatedBookingChannel, PubSub};
use crate::services::session::SessionStore;
use crate::services::{booking, feedback};

/// GraphQL 变更根对象
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// 提交反馈，每次调用都会新建一条记录
    async fn create_feedback(
        &self,
        ctx: &Context<'_>,
        input: CreateFeedbackInput,
    ) -> GraphQLResult<Feedback> {
        let db = ctx.data::<SqlitePool>()?;
        let record = feedback::create_feedback(db, input.into())
            .await
            .map_err(|e| e.extend())?;
        Ok(record.into())
    }

    /// 创建预约并广播到 createdBooking 频道
    async fn create_booking(
        &self,
        ctx: &Context<'_>,
        input: CreateBookingInput,
    ) -> GraphQLResult<Booking> {
        let viewer = require_viewer(ctx).await?;
        let db = ctx.data::<SqlitePool>()?;
        let pubsub = ctx.data::<PubSub>()?;

        let record = booking::create_booking(db, &viewer.user_id, input.into())
            .await
            .map_err(|e| e.extend())?;

        // 预约已落库，广播失败只记录日志
        if let Err(e) = pubsub.publish::<CreatedBookingChannel>(CreatedBooking {
            created_booking: record.clone(),
        }) {
            tracing::error!(booking_id = %record.id, "Failed to publish createdBooking: {}", e);
        }

        Ok(record.into())
    }

    /// 退出登录：总是清除 Cookie，令牌仍在会话表中时一并吊销
    async fn sign_out(&self, ctx: &Context<'_>) -> GraphQLResult<bool> {
        let store = ctx.data::<SessionStore>()?;
        let policy = ctx.data::<CookiePolicy>()?;
        ctx.append_http_header(SET_COOKIE, policy.removal(ACCESS_TOKEN_COOKIE).to_string());

        let token = ctx
            .data_opt::<RequestToken>()
            .and_then(|token| token.0.as_deref())
            .map(str::trim)
            .filter(|token| !token.is_empty());
        let Some(token) = token else {
            return Ok(false);
        };

        let revoked = store.revoke(token).await.map_err(|e| e.extend())?;
        tracing::info!(revoked, "Signed out");
        Ok(revoked)
    }
}

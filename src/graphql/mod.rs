//! GraphQL API
//!
//! 反馈、路线、预约的查询与变更，以及新预约的订阅推送。
//! 访问令牌由 HTTP 层从 Cookie 中取出，以 `RequestToken` 随请求传入。

pub mod mutation;
pub mod query;
pub mod subscription;
pub mod types;

use async_graphql::{Context, ErrorExtensions, Result as GraphQLResult, Schema};
use sqlx::SqlitePool;

use crate::auth::{authenticate, CookiePolicy, RequestToken, Viewer};
use crate::pubsub::PubSub;
use crate::services::session::SessionStore;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use subscription::SubscriptionRoot;

/// GraphQL 架构
pub type BookingSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// 创建GraphQL schema，共享状态以 data 注入
pub fn create_schema(db: SqlitePool, pubsub: PubSub, cookie_policy: CookiePolicy) -> BookingSchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(SessionStore::new(db.clone()))
        .data(db)
        .data(pubsub)
        .data(cookie_policy)
        .finish()
}

/// 解析当前访问者，失败时返回带错误码的 GraphQL 错误
pub(crate) async fn require_viewer(ctx: &Context<'_>) -> GraphQLResult<Viewer> {
    let store = ctx.data::<SessionStore>()?;
    let token = ctx
        .data_opt::<RequestToken>()
        .and_then(|token| token.0.as_deref());
    authenticate(store, token).await.map_err(|e| e.extend())
}

use async_graphql::http::{GraphiQLSource, ALL_WEBSOCKET_PROTOCOLS};
use async_graphql::Data;
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::{
    extract::{State, WebSocketUpgrade},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::{AccessToken, RequestToken};
use crate::handlers::AppState;
use crate::router::{GRAPHQL_PATH, GRAPHQL_STREAM_PATH};
use crate::utils::logging::OperationTimer;

/// GraphQL处理函数：令牌从 Cookie 取出后随请求下发给解析器
pub async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    AccessToken(token): AccessToken,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = req.into_inner().data(RequestToken(token));
    let operation = request
        .operation_name
        .clone()
        .unwrap_or_else(|| "anonymous".to_string());

    let timer = OperationTimer::start(format!("graphql:{}", operation));
    let response = state.schema.execute(request).await;
    timer.finish(response.errors.len());

    response.into()
}

/// 订阅流：握手请求里的 Cookie 令牌作为连接数据，整个连接内有效
pub async fn graphql_stream_handler(
    State(state): State<Arc<AppState>>,
    AccessToken(token): AccessToken,
    protocol: GraphQLProtocol,
    upgrade: WebSocketUpgrade,
) -> Response {
    let schema = state.schema.clone();
    upgrade
        .protocols(ALL_WEBSOCKET_PROTOCOLS)
        .on_upgrade(move |stream| {
            let mut data = Data::default();
            data.insert(RequestToken(token));
            GraphQLWebSocket::new(stream, schema, protocol)
                .with_data(data)
                .serve()
        })
}

/// GraphiQL 调试页面
pub async fn graphiql() -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint(GRAPHQL_PATH)
            .subscription_endpoint(GRAPHQL_STREAM_PATH)
            .finish(),
    )
}

use async_graphql::{Context, ErrorExtensions, Result, Subscription};
use futures_util::{future, Stream, StreamExt};

use super::require_viewer;
use super::types::Booking;
use crate::pubsub::{CreatedBookingChannel, PubSub};

/// GraphQL 订阅根对象
pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// 当前用户的新预约推送，只包含订阅之后创建的预约
    async fn created_booking(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Booking>> {
        let viewer = require_viewer(ctx).await?;
        let pubsub = ctx.data::<PubSub>()?;
        let events = pubsub
            .subscribe::<CreatedBookingChannel>()
            .map_err(|e| e.extend())?;

        let user_id = viewer.user_id;
        Ok(events
            .filter(move |event| future::ready(event.created_booking.user_id == user_id))
            .map(|event| Booking::from(event.created_booking)))
    }
}

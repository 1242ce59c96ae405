//! 进程内事件总线
//!
//! 频道在启动时显式注册，每个频道名对应一种静态声明的负载类型。
//! 发布只投递给发布时刻已订阅的接收者：不排队、不持久化、不回放。

use futures_util::Stream;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::{AppError, AppResult, ErrorContext};
use crate::models::BookingRecord;

/// 默认频道容量，慢订阅者落后超过此数量会丢失旧事件
pub const DEFAULT_CAPACITY: usize = 100;

/// 频道声明
pub trait Channel: 'static {
    const NAME: &'static str;
    type Payload: Clone + Send + Sync + 'static;
}

/// `createdBooking` 频道
pub struct CreatedBookingChannel;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBooking {
    pub created_booking: BookingRecord,
}

impl Channel for CreatedBookingChannel {
    const NAME: &'static str = "createdBooking";
    type Payload = CreatedBooking;
}

/// 频道注册表句柄，克隆后共享同一组频道
#[derive(Clone)]
pub struct PubSub {
    channels: Arc<HashMap<&'static str, Box<dyn Any + Send + Sync>>>,
}

pub struct PubSubBuilder {
    channels: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl PubSubBuilder {
    pub fn channel<C: Channel>(mut self, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel::<C::Payload>(capacity.max(1));
        self.channels.insert(C::NAME, Box::new(tx));
        self
    }

    pub fn build(self) -> PubSub {
        tracing::debug!(channels = ?self.channels.keys().collect::<Vec<_>>(), "PubSub ready");
        PubSub {
            channels: Arc::new(self.channels),
        }
    }
}

impl PubSub {
    pub fn builder() -> PubSubBuilder {
        PubSubBuilder {
            channels: HashMap::new(),
        }
    }

    /// 本服务使用的全部频道
    pub fn with_default_channels() -> Self {
        Self::builder()
            .channel::<CreatedBookingChannel>(DEFAULT_CAPACITY)
            .build()
    }

    fn sender<C: Channel>(&self, operation: &str) -> AppResult<&broadcast::Sender<C::Payload>> {
        self.channels
            .get(C::NAME)
            .and_then(|sender| sender.downcast_ref::<broadcast::Sender<C::Payload>>())
            .ok_or_else(|| AppError::ChannelNotRegistered {
                channel: C::NAME.to_string(),
                context: ErrorContext::new(operation),
            })
    }

    /// 发布事件，返回送达的订阅者数量
    pub fn publish<C: Channel>(&self, payload: C::Payload) -> AppResult<usize> {
        let sender = self.sender::<C>("publish")?;
        // 没有订阅者时 send 返回 Err，这不是错误
        let delivered = sender.send(payload).unwrap_or(0);
        tracing::debug!(channel = C::NAME, delivered, "Event published");
        Ok(delivered)
    }

    /// 订阅频道，只会收到订阅之后发布的事件
    pub fn subscribe<C: Channel>(&self) -> AppResult<impl Stream<Item = C::Payload>> {
        let receiver = self.sender::<C>("subscribe")?.subscribe();
        Ok(into_stream(C::NAME, receiver))
    }

    pub fn subscriber_count<C: Channel>(&self) -> AppResult<usize> {
        Ok(self.sender::<C>("subscriber_count")?.receiver_count())
    }
}

fn into_stream<T: Clone + Send + 'static>(
    channel: &'static str,
    receiver: broadcast::Receiver<T>,
) -> impl Stream<Item = T> {
    futures_util::stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(payload) => return Some((payload, receiver)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(channel, skipped, "Subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}

//! Telegram 机器人
//!
//! 长轮询和更新分发交给 teloxide 的 `Dispatcher`，
//! 这里只把命令消息和菜单回调接到 `Composer` 上。

pub mod menu;

use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt, UpdateHandler};
use teloxide::error_handlers::ErrorHandler;
use teloxide::payloads::{EditMessageReplyMarkupSetters, SendMessageSetters};
use teloxide::prelude::{dptree, Requester, ResponseResult};
use teloxide::types::{CallbackQuery, Message, Update};
use teloxide::{Bot, RequestError};

use crate::error::{AppError, AppResult};
use crate::utils::logging::OperationTimer;

pub use menu::{compose, Composer, Reply, START_MENU_TEXT};

const SHUTDOWN_ATTEMPTS: usize = 20;
const SHUTDOWN_RETRY_DELAY: Duration = Duration::from_millis(100);

/// 注册斜杠命令列表
pub async fn register_commands(bot: &Bot, composer: &Composer) -> AppResult<()> {
    bot.set_my_commands(composer.bot_commands())
        .await
        .map_err(|e| AppError::bot_request(e, "setMyCommands"))?;
    Ok(())
}

/// 命令消息：回复文本并附带菜单键盘
pub async fn handle_message(bot: Bot, msg: Message, composer: Arc<Composer>) -> ResponseResult<()> {
    let Some(reply) = msg.text().and_then(|text| composer.reply_to(text)) else {
        return Ok(());
    };

    let timer = OperationTimer::start(format!("bot:message:{}", msg.chat.id));
    let mut request = bot.send_message(msg.chat.id, reply.text);
    if let Some(keyboard) = reply.keyboard {
        request = request.reply_markup(keyboard);
    }
    let result = request.await;
    timer.finish(usize::from(result.is_err()));

    result?;
    Ok(())
}

/// 菜单回调：切换键盘，然后应答回调
pub async fn handle_callback(
    bot: Bot,
    query: CallbackQuery,
    composer: Arc<Composer>,
) -> ResponseResult<()> {
    let timer = OperationTimer::start(format!("bot:callback:{}", query.id));
    let mut failures = 0;

    let keyboard = query.data.as_deref().and_then(|data| composer.navigate(data));
    if let (Some(keyboard), Some(message)) = (keyboard, query.message.as_ref()) {
        if let Err(e) = bot
            .edit_message_reply_markup(message.chat.id, message.id)
            .reply_markup(keyboard)
            .await
        {
            tracing::warn!(callback = %query.id, "Failed to switch menu: {}", e);
            failures += 1;
        }
    }

    // 回调总是需要应答，否则客户端会一直转圈
    let answered = bot.answer_callback_query(query.id.clone()).await;
    timer.finish(failures + usize::from(answered.is_err()));

    answered?;
    Ok(())
}

/// 更新处理树
pub fn schema() -> UpdateHandler<RequestError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

struct TracingErrorHandler;

impl ErrorHandler<RequestError> for TracingErrorHandler {
    fn handle_error(self: Arc<Self>, error: RequestError) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            tracing::warn!("Bot handler failed: {}", error);
        })
    }
}

/// 启动长轮询，`shutdown` 完成后停止
pub async fn run(bot: Bot, composer: Composer, shutdown: impl Future<Output = ()> + Send + 'static) {
    if let Err(e) = register_commands(&bot, &composer).await {
        // to_error_response 负责记录日志
        e.to_error_response();
    }

    let mut dispatcher = Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![Arc::new(composer)])
        .default_handler(|_| async {})
        .error_handler(Arc::new(TracingErrorHandler))
        .build();

    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown.await;
        // 调度器尚未进入运行状态时会拒绝停止，稍后重试
        for _ in 0..SHUTDOWN_ATTEMPTS {
            match token.shutdown() {
                Ok(stopped) => {
                    stopped.await;
                    return;
                }
                Err(_) => tokio::time::sleep(SHUTDOWN_RETRY_DELAY).await,
            }
        }
        tracing::warn!("Bot dispatcher did not accept shutdown");
    });

    tracing::info!("Bot polling started");
    dispatcher.dispatch().await;
    tracing::info!("Bot polling stopped");
}

use clap::{Parser, ValueEnum};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use std::str::FromStr;
use std::sync::Arc;

use booking_backend::{bot, build_router, pubsub::PubSub, AppConfig, AppState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_enum, default_value_t = RunMode::All)]
    mode: RunMode,

    /// 覆盖配置中的端口
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum RunMode {
    All,
    Server,
    Bot,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // 先加载配置（在日志初始化前）
    let mut config = AppConfig::load()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    let config = Arc::new(config);

    // 使用配置中的日志级别初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_level))
                .unwrap_or_else(|_| "booking_backend=info".into()),
        )
        .init();

    tracing::info!(environment = ?config.environment(), "Configuration loaded successfully");

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    let db = sqlx::SqlitePool::connect_with(options).await?;

    // 运行数据库迁移
    sqlx::migrate!()
        .run(&db)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    let pubsub = PubSub::with_default_channels();
    let state = Arc::new(AppState::new(db, config.clone(), pubsub));

    let bot_task = match (cli.mode, config.bot_token()) {
        (RunMode::Server, _) => None,
        (_, None) => {
            tracing::warn!("TELEGRAM_BOT_TOKEN not set, bot disabled");
            None
        }
        (_, Some(token)) => {
            let bot = teloxide::Bot::new(token);
            let mini_app_url = config.mini_app_url()?;
            let site_url = config.site_url()?;
            let composer = bot::compose(mini_app_url.as_ref(), Some(&site_url));
            Some(tokio::spawn(bot::run(bot, composer, shutdown_signal())))
        }
    };

    if cli.mode == RunMode::Bot {
        if let Some(task) = bot_task {
            task.await?;
        }
        return Ok(());
    }

    let app = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(stream_url = %config.stream_url()?, "Booking backend starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = bot_task {
        task.await?;
    }

    Ok(())
}

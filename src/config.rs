use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 运行环境
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// 只有显式的 development 才算开发环境，其余一律按生产处理
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub app_env: String,
    pub log_level: String,
    /// GraphQL 对外地址，订阅流地址在其后追加 `/stream`
    pub public_uri: String,
    pub qr_codes_dir: PathBuf,
    pub telegram_bot_token: Option<String>,
    pub mini_app_url: Option<String>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        // 默认值 + 环境变量覆盖
        let settings = ::config::Config::builder()
            .set_default("port", 4000)?
            .set_default("database_url", "sqlite:./data/booking.db")?
            .set_default("app_env", "development")?
            .set_default("log_level", "booking_backend=info,tower_http=info")?
            .set_default("public_uri", "http://localhost:4000/graphql")?
            .set_default("qr_codes_dir", "./data/qr-codes")?
            .add_source(::config::Environment::default().try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;

        // 确保二维码目录存在
        std::fs::create_dir_all(&config.qr_codes_dir)?;

        // 启动时校验订阅地址和机器人用到的地址
        config.stream_url()?;
        config.site_url()?;
        config.mini_app_url()?;

        Ok(config)
    }

    pub fn environment(&self) -> Environment {
        Environment::from_name(&self.app_env)
    }

    /// GraphQL 订阅流地址
    pub fn stream_url(&self) -> anyhow::Result<url::Url> {
        let base = self.public_uri.trim_end_matches('/');
        let url = url::Url::parse(&format!("{}/stream", base))?;
        Ok(url)
    }

    /// 站点地址：对外地址的 origin
    pub fn site_url(&self) -> anyhow::Result<url::Url> {
        let public = url::Url::parse(&self.public_uri)?;
        let site = url::Url::parse(&public.origin().ascii_serialization())?;
        Ok(site)
    }

    /// 迷你应用地址（空字符串视为未配置）
    pub fn mini_app_url(&self) -> anyhow::Result<Option<url::Url>> {
        match self.mini_app_url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Ok(Some(url::Url::parse(raw)?)),
            _ => Ok(None),
        }
    }

    /// 机器人令牌（空字符串视为未配置）
    pub fn bot_token(&self) -> Option<&str> {
        self.telegram_bot_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

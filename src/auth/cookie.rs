use axum_extra::extract::cookie::{Cookie, Expiration, SameSite};

use crate::config::Environment;

/// 认证 Cookie 的写入策略
///
/// 启动时构建一次，之后只读；所有写 Cookie 的地方都通过它生成，
/// 保证属性一致。`expires` 为空即会话 Cookie。
#[derive(Debug, Clone, PartialEq)]
pub struct CookiePolicy {
    pub http_only: bool,
    pub same_site: SameSite,
    pub secure: bool,
    pub path: &'static str,
    pub domain: Option<String>,
    pub expires: Option<Expiration>,
}

impl CookiePolicy {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            http_only: true,
            same_site: SameSite::Lax,
            secure: !environment.is_development(),
            path: "/",
            domain: None,
            expires: None,
        }
    }

    /// 按策略生成 Cookie
    pub fn cookie(&self, name: impl Into<String>, value: impl Into<String>) -> Cookie<'static> {
        let mut builder = Cookie::build((name.into(), value.into()))
            .http_only(self.http_only)
            .same_site(self.same_site)
            .secure(self.secure)
            .path(self.path);

        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(expires) = self.expires {
            builder = builder.expires(expires);
        }

        builder.build()
    }

    /// 生成对应的删除 Cookie（属性相同，值清空并立即过期）
    pub fn removal(&self, name: impl Into<String>) -> Cookie<'static> {
        let mut cookie = self.cookie(name, "");
        cookie.make_removal();
        cookie
    }
}

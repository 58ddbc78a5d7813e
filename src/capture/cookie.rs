//! Cookie 写入策略
//!
//! 点击标识需要跨子域共享：写入时剥离 www. 前缀、使用根路径，
//! SameSite 取 Lax 以便顶级跳转携带 Cookie。

use chrono::{Duration, Utc};

use crate::config::CaptureConfig;
use crate::storage::CookieAttributes;

/// 从页面 host 推导 Cookie 域（剥离前导 www.）
pub fn derive_cookie_domain(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// 构建点击标识 Cookie，有效期取配置的天数
pub fn attribution_cookie(config: &CaptureConfig, host: &str, value: &str) -> CookieAttributes {
    cookie_with_days(config, host, value, config.cookie_max_age_days)
}

/// 构建已过期的同名 Cookie（写入即删除）
pub fn expired_cookie(config: &CaptureConfig, host: &str) -> CookieAttributes {
    cookie_with_days(config, host, "", -1)
}

fn cookie_with_days(
    config: &CaptureConfig,
    host: &str,
    value: &str,
    days: i64,
) -> CookieAttributes {
    CookieAttributes {
        name: config.cookie_name.clone(),
        value: value.to_string(),
        domain: derive_cookie_domain(host).to_string(),
        path: "/".to_string(),
        expires: Utc::now() + Duration::days(days),
        same_site: config.same_site,
    }
}

//! 点击标识捕获管理器
//!
//! 页面加载时初始化一次：URL 参数优先，其次 Cookie，最后本地存储。
//! 任何一步失败都不会中断初始化，持久化目标各自独立尝试。

use std::borrow::Cow;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, error, warn};
use url::Url;

use super::cookie::{attribution_cookie, expired_cookie};
use crate::config::{CaptureConfig, get_config};
use crate::errors::{ClicktraceError, Result};
use crate::storage::{CookieStore, KeyValueStore};

pub struct ClickIdCapture {
    config: CaptureConfig,
    cookies: Arc<dyn CookieStore>,
    storage: Arc<dyn KeyValueStore>,
    page_url: String,
    host: String,
    current: RwLock<Option<String>>,
}

/// debug() 返回的状态快照，各项独立读取，互不影响
#[derive(Debug, Clone, Serialize)]
pub struct CaptureSnapshot {
    pub current: Option<String>,
    pub cookie: Option<String>,
    pub storage: Option<String>,
    pub timestamp: Option<String>,
    pub url: Option<String>,
}

impl ClickIdCapture {
    /// 使用全局配置初始化（页面加载时调用一次）
    pub fn init(
        page_url: &str,
        cookies: Arc<dyn CookieStore>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Arc<Self> {
        Self::init_with_config(get_config().capture.clone(), page_url, cookies, storage)
    }

    /// 使用显式配置初始化
    pub fn init_with_config(
        config: CaptureConfig,
        page_url: &str,
        cookies: Arc<dyn CookieStore>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Arc<Self> {
        let host = match Url::parse(page_url).map_err(ClicktraceError::from) {
            Ok(url) => url.host_str().unwrap_or_default().to_string(),
            Err(e) => {
                warn!("Failed to parse page URL \"{}\": {}", page_url, e.format_simple());
                String::new()
            }
        };

        let capture = Arc::new(Self {
            config,
            cookies,
            storage,
            page_url: page_url.to_string(),
            host,
            current: RwLock::new(None),
        });
        capture.bootstrap();
        capture
    }

    /// 初始化算法：URL 参数是权威来源，覆盖任何已保存的值
    fn bootstrap(&self) {
        if let Some(token) = self.query_value() {
            debug!("Click id found in page URL: {}", token);
            self.save(&token);
            *self.current.write() = Some(token);
        } else if let Some(saved) = self.saved_value() {
            debug!("Using previously persisted click id");
            *self.current.write() = Some(saved);
        } else {
            warn!("No click id found in URL, cookie or storage");
        }

        // 初始化状态摘要，排查归因问题时使用
        let snapshot = self.debug();
        debug!(
            url = ?snapshot.url,
            cookie = ?snapshot.cookie,
            storage = ?snapshot.storage,
            resolved = ?snapshot.current,
            "Click id capture initialized"
        );
    }

    /// 当前已知的点击标识
    ///
    /// 本次页面加载解析出的值优先，否则按 Cookie、本地存储的顺序兜底。
    pub fn get(&self) -> Option<String> {
        if let Some(current) = self.current.read().clone() {
            return Some(current);
        }
        self.saved_value()
    }

    /// 强制保存指定的点击标识
    ///
    /// 空 token 视为非法输入：既有状态保持不变，返回 false。
    /// 持久化失败不会向外抛出，只反映在返回值与日志中。
    pub fn set(&self, token: &str) -> bool {
        if let Err(e) = validate_token(token) {
            error!("Rejected click id: {}", e.format_simple());
            return false;
        }
        *self.current.write() = Some(token.to_string());
        self.save(token)
    }

    /// 清除所有已保存的点击标识，总是成功
    pub fn clear(&self) {
        if let Err(e) = self.cookies.set(&expired_cookie(&self.config, &self.host)) {
            warn!("Failed to expire click id cookie: {}", e);
        }
        if let Err(e) = self.storage.remove(&self.config.storage_key) {
            warn!("Failed to remove click id from storage: {}", e);
        }
        if let Err(e) = self.storage.remove(&self.config.timestamp_key) {
            warn!("Failed to remove click id timestamp from storage: {}", e);
        }
        *self.current.write() = None;
        debug!("Click id cleared");
    }

    /// 状态快照：内存值、Cookie、本地存储、时间戳与 URL 参数各自独立读取
    pub fn debug(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            current: self.current.read().clone(),
            cookie: self.cookies.get(&self.config.cookie_name).unwrap_or_default(),
            storage: self.storage.get(&self.config.storage_key).unwrap_or_default(),
            timestamp: self
                .storage
                .get(&self.config.timestamp_key)
                .unwrap_or_default(),
            url: self.query_value(),
        }
    }

    /// 从页面 URL 的 query string 提取点击标识参数
    fn query_value(&self) -> Option<String> {
        let url = Url::parse(&self.page_url).ok()?;
        url.query()
            .and_then(|query| extract_query_param(query, &self.config.query_param))
            .filter(|value| !value.is_empty())
            .map(Cow::into_owned)
    }

    /// 持久化到 Cookie 与本地存储（各目标独立尝试，失败只记录日志）
    fn save(&self, token: &str) -> bool {
        let mut persisted = true;

        if let Err(e) = self
            .cookies
            .set(&attribution_cookie(&self.config, &self.host, token))
        {
            error!("Failed to write click id cookie: {}", e);
            persisted = false;
        }

        match self.storage.set(&self.config.storage_key, token) {
            Ok(()) => {
                let now_ms = Utc::now().timestamp_millis().to_string();
                if let Err(e) = self.storage.set(&self.config.timestamp_key, &now_ms) {
                    warn!("Failed to write click id timestamp: {}", e);
                    persisted = false;
                }
            }
            Err(e) => {
                error!("Failed to write click id to storage: {}", e);
                persisted = false;
            }
        }

        if persisted {
            debug!("Click id persisted: {}", token);
        }
        persisted
    }

    /// 读取先前保存的点击标识
    ///
    /// Cookie 优先；本地存储兜底，并在 Cookie 缺失时回写（单向同步，
    /// 反向不做）。
    fn saved_value(&self) -> Option<String> {
        match self.cookies.get(&self.config.cookie_name) {
            Ok(Some(value)) => return Some(value),
            Ok(None) => {}
            Err(e) => warn!("Failed to read click id cookie: {}", e),
        }

        match self.storage.get(&self.config.storage_key) {
            Ok(Some(value)) => {
                if let Ok(None) = self.cookies.get(&self.config.cookie_name)
                    && let Err(e) = self
                        .cookies
                        .set(&attribution_cookie(&self.config, &self.host, &value))
                {
                    warn!("Failed to resync click id cookie from storage: {}", e);
                }
                Some(value)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read click id from storage: {}", e);
                None
            }
        }
    }
}

fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(ClicktraceError::validation(
            "click id token must be a non-empty string",
        ));
    }
    Ok(())
}

/// 从 query string 提取指定参数值
pub fn extract_query_param<'a>(query: &'a str, key: &str) -> Option<Cow<'a, str>> {
    for part in query.split('&') {
        if let Some(value) = part.strip_prefix(key).and_then(|s| s.strip_prefix('=')) {
            // urlencoding::decode 返回 Cow，未编码时零分配
            return urlencoding::decode(value).ok();
        }
    }
    None
}

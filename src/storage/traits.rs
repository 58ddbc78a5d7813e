use chrono::{DateTime, Utc};

use crate::config::SameSitePolicy;
use crate::errors::Result;

/// 待写入的 Cookie 及其属性
#[derive(Debug, Clone)]
pub struct CookieAttributes {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub expires: DateTime<Utc>,
    pub same_site: SameSitePolicy,
}

impl CookieAttributes {
    /// 渲染为 document.cookie 写入格式的属性串
    pub fn to_header_string(&self) -> String {
        format!(
            "{}={}; expires={}; path={}; domain={}; SameSite={}",
            self.name,
            self.value,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.path,
            self.domain,
            self.same_site
        )
    }

    /// 过期时间是否已在过去（过期写入等价于删除）
    pub fn is_expired(&self) -> bool {
        self.expires <= Utc::now()
    }
}

pub trait CookieStore: Send + Sync {
    /// 读取指定名称的 Cookie 值
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// 写入 Cookie；过期时间在过去等价于删除同名 Cookie
    fn set(&self, cookie: &CookieAttributes) -> Result<()>;
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

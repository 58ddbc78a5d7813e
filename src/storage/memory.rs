use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::traits::{CookieAttributes, CookieStore, KeyValueStore};
use crate::errors::Result;

struct StoredCookie {
    value: String,
    expires: DateTime<Utc>,
}

/// 内存 Cookie Jar（测试与非浏览器宿主使用）
#[derive(Default)]
pub struct MemoryCookieJar {
    inner: DashMap<String, StoredCookie>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }
}

impl CookieStore for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .inner
            .get(name)
            .filter(|cookie| cookie.expires > Utc::now())
            .map(|cookie| cookie.value.clone()))
    }

    fn set(&self, cookie: &CookieAttributes) -> Result<()> {
        if cookie.is_expired() {
            self.inner.remove(&cookie.name);
        } else {
            self.inner.insert(
                cookie.name.clone(),
                StoredCookie {
                    value: cookie.value.clone(),
                    expires: cookie.expires,
                },
            );
        }
        Ok(())
    }
}

/// 内存键值存储（localStorage 的进程内等价物）
#[derive(Default)]
pub struct MemoryStore {
    inner: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key);
        Ok(())
    }
}

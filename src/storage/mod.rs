//! 宿主环境的存储抽象
//!
//! Cookie 与本地键值存储是页面环境的外部资源，这里以 trait 形式
//! 接入，便于测试与嵌入不同宿主。

mod memory;
mod traits;

pub use memory::{MemoryCookieJar, MemoryStore};
pub use traits::{CookieAttributes, CookieStore, KeyValueStore};

//! 点击标识捕获
//!
//! 从页面 URL 捕获广告点击标识，持久化到 Cookie 与本地存储，
//! 保证后续转化能够归因到具体的广告点击。

mod cookie;
pub mod global;
mod manager;

pub use cookie::{attribution_cookie, derive_cookie_domain, expired_cookie};
pub use manager::{CaptureSnapshot, ClickIdCapture, extract_query_param};

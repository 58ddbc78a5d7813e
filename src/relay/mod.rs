//! 购买事件转发
//!
//! 拦截支付验证端点的响应，按后端下发的触发标志向 Pixel 上报
//! 购买完成事件。拦截以显式中间件的方式由宿主组合，原始响应
//! 原样透传。

mod diagnostics;
mod event;
mod fetch;
pub mod global;
mod manager;
mod pixel;

pub use diagnostics::{NoopDiagnostics, RelayDiagnostics, RelayIssue};
pub use event::{EVENT_DATA_FIELD, PurchaseEvent, TRIGGER_FIELD};
pub use fetch::{Fetch, FetchRequest, FetchResponse, InterceptedFetch};
pub use manager::PurchaseEventRelay;
#[cfg(feature = "http-pixel")]
pub use pixel::HttpPixel;
pub use pixel::{PixelSink, StdoutPixel};

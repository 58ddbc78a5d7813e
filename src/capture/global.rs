use std::sync::{Arc, OnceLock};
use tracing::trace;

use super::manager::ClickIdCapture;

pub static GLOBAL_CAPTURE: OnceLock<Arc<ClickIdCapture>> = OnceLock::new();

/// 初始化全局捕获句柄（只允许初始化一次）
pub fn set_global_capture(capture: Arc<ClickIdCapture>) {
    if GLOBAL_CAPTURE.set(capture).is_err() {
        panic!("GLOBAL_CAPTURE has already been set");
    }
}

/// 获取全局捕获句柄
pub fn get_capture() -> Option<&'static Arc<ClickIdCapture>> {
    match GLOBAL_CAPTURE.get() {
        Some(capture) => Some(capture),
        None => {
            trace!("GLOBAL_CAPTURE has not been initialized yet");
            None
        }
    }
}

/// 当前解析出的点击标识（页面全局变量的等价读取）
pub fn resolved_click_id() -> Option<String> {
    get_capture().and_then(|capture| capture.get())
}

use std::sync::{Arc, OnceLock};
use tracing::trace;

use super::manager::PurchaseEventRelay;

pub static GLOBAL_RELAY: OnceLock<Arc<PurchaseEventRelay>> = OnceLock::new();

/// 初始化全局转发句柄（只允许初始化一次）
pub fn set_global_relay(relay: Arc<PurchaseEventRelay>) {
    if GLOBAL_RELAY.set(relay).is_err() {
        panic!("GLOBAL_RELAY has already been set");
    }
}

/// 获取全局转发句柄
pub fn get_relay() -> Option<&'static Arc<PurchaseEventRelay>> {
    match GLOBAL_RELAY.get() {
        Some(relay) => Some(relay),
        None => {
            trace!("GLOBAL_RELAY has not been initialized yet");
            None
        }
    }
}

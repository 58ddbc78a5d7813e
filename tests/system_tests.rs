//! System-level tests
//!
//! Global config, logging bootstrap and the process-global handles.

use std::sync::Arc;

use clicktrace::capture::ClickIdCapture;
use clicktrace::capture::global::{resolved_click_id, set_global_capture};
use clicktrace::config::{CaptureConfig, get_config, init_config};
use clicktrace::relay::PurchaseEventRelay;
use clicktrace::relay::global::{get_relay, set_global_relay};
use clicktrace::storage::{CookieStore, KeyValueStore, MemoryCookieJar, MemoryStore};
use clicktrace::system::logging::init_logging;

#[test]
fn test_init_config_then_logging() {
    init_config();
    let config = get_config();
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.capture.query_param, "ttclid");

    let _guard = init_logging(&config.logging);
    tracing::info!("logging initialized for tests");
}

#[test]
fn test_components_from_global_config() {
    init_config();

    let relay = PurchaseEventRelay::new();
    assert_eq!(relay.endpoint_marker(), "verificar-pix");

    let capture = ClickIdCapture::init(
        "https://example.com/?ttclid=from-global-config",
        Arc::new(MemoryCookieJar::new()) as Arc<dyn CookieStore>,
        Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>,
    );
    assert_eq!(capture.get().as_deref(), Some("from-global-config"));
}

#[test]
fn test_global_handles() {
    assert_eq!(resolved_click_id(), None);

    let capture = ClickIdCapture::init_with_config(
        CaptureConfig::default(),
        "https://example.com/?ttclid=global-token",
        Arc::new(MemoryCookieJar::new()) as Arc<dyn CookieStore>,
        Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>,
    );
    set_global_capture(capture);
    assert_eq!(resolved_click_id().as_deref(), Some("global-token"));

    assert!(get_relay().is_none());
    set_global_relay(PurchaseEventRelay::with_config(Default::default()));
    assert!(get_relay().is_some());
}

//! Purchase event relay tests
//!
//! Covers manual fire, pixel presence detection, verification response
//! passthrough and the diagnostics channel.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use clicktrace::config::RelayConfig;
use clicktrace::relay::{
    PixelSink, PurchaseEvent, PurchaseEventRelay, RelayDiagnostics, RelayIssue,
};

// =============================================================================
// Test Doubles
// =============================================================================

#[derive(Default)]
struct RecordingPixel {
    calls: Mutex<Vec<(String, PurchaseEvent)>>,
}

#[async_trait]
impl PixelSink for RecordingPixel {
    async fn track(&self, event: &str, payload: &PurchaseEvent) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((event.to_string(), payload.clone()));
        Ok(())
    }
}

struct FailingPixel;

#[async_trait]
impl PixelSink for FailingPixel {
    async fn track(&self, _event: &str, _payload: &PurchaseEvent) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("pixel endpoint exploded"))
    }
}

#[derive(Default)]
struct CollectingDiagnostics {
    issues: Mutex<Vec<RelayIssue>>,
}

impl RelayDiagnostics for CollectingDiagnostics {
    fn report(&self, issue: &RelayIssue) {
        self.issues.lock().unwrap().push(issue.clone());
    }
}

fn relay_with_pixel() -> (Arc<PurchaseEventRelay>, Arc<RecordingPixel>) {
    let relay = PurchaseEventRelay::with_config(RelayConfig::default());
    let pixel = Arc::new(RecordingPixel::default());
    relay.attach_pixel(pixel.clone());
    (relay, pixel)
}

// =============================================================================
// fire_purchase
// =============================================================================

#[tokio::test]
async fn test_fire_purchase_without_pixel_returns_false() {
    let relay = PurchaseEventRelay::with_config(RelayConfig::default());
    let diagnostics = Arc::new(CollectingDiagnostics::default());
    relay.set_diagnostics(diagnostics.clone());

    assert!(!relay.fire_purchase(&json!({"value": 1.0})).await);
    assert_eq!(
        diagnostics.issues.lock().unwrap().as_slice(),
        &[RelayIssue::PixelMissing {
            event: "CompletePayment".to_string()
        }]
    );
}

#[tokio::test]
async fn test_fire_purchase_dispatches_once_with_fields_unchanged() {
    let (relay, pixel) = relay_with_pixel();

    let fired = relay
        .fire_purchase(&json!({
            "value": 49.9,
            "currency": "BRL",
            "content_type": "product",
            "order_id": "XYZ"
        }))
        .await;

    assert!(fired);
    let calls = pixel.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (event, payload) = &calls[0];
    assert_eq!(event, "CompletePayment");
    assert_eq!(payload.value, 49.9);
    assert_eq!(payload.currency, "BRL");
    assert_eq!(payload.content_type, "product");
    assert_eq!(payload.content_id, "XYZ");
    assert_eq!(payload.order_id, "XYZ");
}

#[tokio::test]
async fn test_fire_purchase_normalizes_loose_payload() {
    let (relay, pixel) = relay_with_pixel();

    assert!(relay.fire_purchase(&json!({"total": 12.5, "id": 77})).await);

    let calls = pixel.calls.lock().unwrap();
    let (_, payload) = &calls[0];
    assert_eq!(payload.value, 12.5);
    assert_eq!(payload.currency, "BRL");
    assert_eq!(payload.content_type, "product");
    assert_eq!(payload.order_id, "77");
}

#[tokio::test]
async fn test_fire_purchase_sink_failure_is_contained() {
    let relay = PurchaseEventRelay::with_config(RelayConfig::default());
    let diagnostics = Arc::new(CollectingDiagnostics::default());
    relay.set_diagnostics(diagnostics.clone());
    relay.attach_pixel(Arc::new(FailingPixel));

    assert!(!relay.fire_purchase(&json!({"value": 1.0})).await);

    let issues = diagnostics.issues.lock().unwrap();
    assert!(matches!(
        &issues[0],
        RelayIssue::PixelCallFailed { event, error }
            if event == "CompletePayment" && error.contains("exploded")
    ));
}

#[tokio::test]
async fn test_is_pixel_loaded_tracks_attach_detach() {
    let relay = PurchaseEventRelay::with_config(RelayConfig::default());
    assert!(!relay.is_pixel_loaded());

    relay.attach_pixel(Arc::new(RecordingPixel::default()));
    assert!(relay.is_pixel_loaded());

    relay.detach_pixel();
    assert!(!relay.is_pixel_loaded());
}

// =============================================================================
// handle_verification_response (passthrough semantics)
// =============================================================================

async fn assert_passthrough(relay: &PurchaseEventRelay, response: Value) {
    let expected = response.clone();
    let returned = relay.handle_verification_response(response).await;
    assert_eq!(returned, expected);
}

#[tokio::test]
async fn test_verification_passthrough_in_all_cases() {
    let (relay, _pixel) = relay_with_pixel();

    // 触发标志缺失
    assert_passthrough(&relay, json!({"status": "paid"})).await;
    // 触发标志为 false
    assert_passthrough(&relay, json!({"trigger_frontend_event": false})).await;
    // 触发标志为 true 且数据完整
    assert_passthrough(
        &relay,
        json!({
            "trigger_frontend_event": true,
            "frontend_event_data": {"value": 5.0, "order_id": "A"}
        }),
    )
    .await;
    // 触发标志为 true 但缺少数据
    assert_passthrough(&relay, json!({"trigger_frontend_event": true})).await;
    // 非对象输入
    assert_passthrough(&relay, json!("not an object")).await;
}

#[tokio::test]
async fn test_verification_trigger_fires_event() {
    let (relay, pixel) = relay_with_pixel();

    relay
        .handle_verification_response(json!({
            "trigger_frontend_event": true,
            "frontend_event_data": {
                "value": 99.0,
                "currency": "USD",
                "order_id": "ORD-1"
            }
        }))
        .await;

    let calls = pixel.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.value, 99.0);
    assert_eq!(calls[0].1.currency, "USD");
    assert_eq!(calls[0].1.order_id, "ORD-1");
}

#[tokio::test]
async fn test_verification_without_trigger_never_fires() {
    let (relay, pixel) = relay_with_pixel();

    relay
        .handle_verification_response(json!({"frontend_event_data": {"value": 1.0}}))
        .await;
    relay
        .handle_verification_response(json!({"trigger_frontend_event": "true"}))
        .await;

    assert!(pixel.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_verification_missing_payload_reports_diagnostics() {
    let (relay, pixel) = relay_with_pixel();
    let diagnostics = Arc::new(CollectingDiagnostics::default());
    relay.set_diagnostics(diagnostics.clone());

    relay
        .handle_verification_response(json!({"trigger_frontend_event": true}))
        .await;

    assert!(pixel.calls.lock().unwrap().is_empty());
    assert_eq!(
        diagnostics.issues.lock().unwrap().as_slice(),
        &[RelayIssue::MissingEventData]
    );
}

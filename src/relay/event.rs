//! 购买事件归一化
//!
//! 把松散结构的订单数据整理成固定形状的事件载荷。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RelayConfig;

/// 验证响应中的触发标志字段
pub const TRIGGER_FIELD: &str = "trigger_frontend_event";
/// 验证响应中的事件数据字段
pub const EVENT_DATA_FIELD: &str = "frontend_event_data";

/// 归一化后的购买事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub value: f64,
    pub currency: String,
    pub content_type: String,
    pub content_id: String,
    pub order_id: String,
}

impl PurchaseEvent {
    /// 从松散结构的数据构建事件
    ///
    /// value 缺失时回退 total，再回退 0；货币与内容类型取配置缺省值；
    /// 订单标识依次尝试 order_id、external_id、id，数字会转为字符串。
    /// content_id 与 order_id 携带同一个解析结果。
    pub fn from_loose(data: &Value, config: &RelayConfig) -> Self {
        let value = number_field(data, "value")
            .or_else(|| number_field(data, "total"))
            .unwrap_or(0.0);
        let currency =
            string_field(data, "currency").unwrap_or_else(|| config.default_currency.clone());
        let content_type = string_field(data, "content_type")
            .unwrap_or_else(|| config.default_content_type.clone());
        let id = ["order_id", "external_id", "id"]
            .iter()
            .find_map(|key| ident_field(data, key))
            .unwrap_or_default();

        Self {
            value,
            currency,
            content_type,
            content_id: id.clone(),
            order_id: id,
        }
    }
}

fn number_field(data: &Value, key: &str) -> Option<f64> {
    data.get(key)?.as_f64()
}

fn string_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// 标识字段允许字符串或数字
fn ident_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> RelayConfig {
        RelayConfig::default()
    }

    #[test]
    fn test_full_payload_unchanged() {
        let data = json!({
            "value": 49.9,
            "currency": "BRL",
            "content_type": "product",
            "order_id": "XYZ"
        });
        let event = PurchaseEvent::from_loose(&data, &config());
        assert_eq!(event.value, 49.9);
        assert_eq!(event.currency, "BRL");
        assert_eq!(event.content_type, "product");
        assert_eq!(event.content_id, "XYZ");
        assert_eq!(event.order_id, "XYZ");
    }

    #[test]
    fn test_value_falls_back_to_total() {
        let data = json!({"total": 10.0, "order_id": "A1"});
        let event = PurchaseEvent::from_loose(&data, &config());
        assert_eq!(event.value, 10.0);
    }

    #[test]
    fn test_empty_payload_defaults() {
        let event = PurchaseEvent::from_loose(&json!({}), &config());
        assert_eq!(event.value, 0.0);
        assert_eq!(event.currency, "BRL");
        assert_eq!(event.content_type, "product");
        assert_eq!(event.order_id, "");
    }

    #[test]
    fn test_identifier_fallback_chain() {
        let data = json!({"external_id": "EXT", "id": "ID"});
        let event = PurchaseEvent::from_loose(&data, &config());
        assert_eq!(event.order_id, "EXT");

        let data = json!({"id": "ID"});
        let event = PurchaseEvent::from_loose(&data, &config());
        assert_eq!(event.order_id, "ID");
    }

    #[test]
    fn test_numeric_identifier_stringified() {
        let data = json!({"id": 1042});
        let event = PurchaseEvent::from_loose(&data, &config());
        assert_eq!(event.order_id, "1042");
        assert_eq!(event.content_id, "1042");
    }
}

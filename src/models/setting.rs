//! Setting records and the typed inventory configuration built from them
//!
//! Settings are stored as keyed records with an opaque JSON payload. Only two
//! keys carry meaning for the domain, and [`InventoryConfig`] is the typed view
//! of those two records with their defaults applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::SettingId;

/// Key of the record whose flag gates financial mutations
pub const FINANCIAL_TRACKING_KEY: &str = "financial_tracking";

/// Key of the record holding `{"threshold": n}`
pub const LOW_STOCK_THRESHOLD_KEY: &str = "low_stock_threshold";

/// Threshold used when no record (or no usable value) exists
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// A keyed configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub id: SettingId,

    /// Unique key
    pub key: String,

    /// Opaque structured payload
    pub value: Value,

    /// Financial gate flag; meaningful on the `financial_tracking` record
    #[serde(default = "default_enabled")]
    pub financial_tracking_enabled: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

impl Setting {
    /// Create a new setting record
    pub fn new(key: impl Into<String>, value: Value, financial_tracking_enabled: bool) -> Self {
        let now = Utc::now();
        Self {
            id: SettingId::new(),
            key: key.into(),
            value,
            financial_tracking_enabled,
            created_at: now,
            updated_at: now,
        }
    }

    /// The payload with JSON-encoded strings decoded.
    ///
    /// Older records store the payload as a JSON string (`"{\"threshold\":5}"`);
    /// a string that does not parse is returned as-is.
    pub fn decoded_value(&self) -> Value {
        match &self.value {
            Value::String(raw) => {
                serde_json::from_str(raw).unwrap_or_else(|_| self.value.clone())
            }
            other => other.clone(),
        }
    }

    /// `value.threshold` as a non-negative integer, if present
    pub fn threshold(&self) -> Option<u32> {
        let value = self.decoded_value();
        let threshold = value.get("threshold")?;
        if let Some(n) = threshold.as_u64() {
            return u32::try_from(n).ok();
        }
        // Whole-number floats such as 5.0
        threshold
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
            .map(|f| f as u32)
    }
}

/// Typed view of the well-known setting records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryConfig {
    pub financial_tracking_enabled: bool,
    pub low_stock_threshold: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            financial_tracking_enabled: true,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl InventoryConfig {
    /// Fold the two well-known records into a config, applying defaults for
    /// whichever is missing
    pub fn from_records(financial: Option<&Setting>, threshold: Option<&Setting>) -> Self {
        let defaults = Self::default();
        Self {
            financial_tracking_enabled: financial
                .map(|s| s.financial_tracking_enabled)
                .unwrap_or(defaults.financial_tracking_enabled),
            low_stock_threshold: threshold
                .and_then(Setting::threshold)
                .unwrap_or(defaults.low_stock_threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_when_records_absent() {
        let config = InventoryConfig::from_records(None, None);
        assert!(config.financial_tracking_enabled);
        assert_eq!(config.low_stock_threshold, 10);
    }

    #[test]
    fn test_records_override_defaults() {
        let financial = Setting::new(FINANCIAL_TRACKING_KEY, json!({"enabled": false}), false);
        let threshold = Setting::new(LOW_STOCK_THRESHOLD_KEY, json!({"threshold": 5}), true);

        let config = InventoryConfig::from_records(Some(&financial), Some(&threshold));
        assert!(!config.financial_tracking_enabled);
        assert_eq!(config.low_stock_threshold, 5);
    }

    #[test]
    fn test_threshold_from_encoded_string() {
        let setting = Setting::new(
            LOW_STOCK_THRESHOLD_KEY,
            Value::String("{\"threshold\":25}".into()),
            true,
        );
        assert_eq!(setting.threshold(), Some(25));
    }

    #[test]
    fn test_unusable_threshold_falls_back() {
        for value in [json!({}), json!({"threshold": -3}), json!({"threshold": "x"}), json!(7)] {
            let setting = Setting::new(LOW_STOCK_THRESHOLD_KEY, value, true);
            assert_eq!(setting.threshold(), None);
            let config = InventoryConfig::from_records(None, Some(&setting));
            assert_eq!(config.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);
        }
        let whole = Setting::new(LOW_STOCK_THRESHOLD_KEY, json!({"threshold": 4.0}), true);
        assert_eq!(whole.threshold(), Some(4));
    }

    #[test]
    fn test_missing_flag_deserializes_enabled() {
        let setting = Setting::new("misc", json!(null), false);
        let mut raw = serde_json::to_value(&setting).unwrap();
        raw.as_object_mut()
            .unwrap()
            .remove("financial_tracking_enabled");
        let parsed: Setting = serde_json::from_value(raw).unwrap();
        assert!(parsed.financial_tracking_enabled);
    }
}

//! Widget timing and capacity configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default delay between a close request and the dialog config reset.
pub const DEFAULT_DIALOG_CLOSE_DELAY_MS: u64 = 300;
/// Default debounce window for free-text filter fields.
pub const DEFAULT_FILTER_DEBOUNCE_MS: u64 = 500;
/// Default time a toast stays visible.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 4_000;
/// Default number of toasts shown at once.
pub const DEFAULT_TOAST_MAX_VISIBLE: usize = 3;

#[derive(Debug, Error)]
/// Errors raised while loading a [`WidgetConfig`].
pub enum ConfigError {
    /// The JSON payload could not be decoded.
    #[error("widget config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("widget config field `{field}` must be greater than zero")]
    Zero {
        /// Offending field name.
        field: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Timing and capacity knobs shared by the widget crate.
pub struct WidgetConfig {
    /// Milliseconds between `close_dialog` and the config reset.
    pub dialog_close_delay_ms: u64,
    /// Debounce window for text-like filter fields.
    pub filter_debounce_ms: u64,
    /// Milliseconds a toast stays visible once shown.
    pub toast_duration_ms: u64,
    /// Maximum toasts visible at once.
    pub toast_max_visible: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            dialog_close_delay_ms: DEFAULT_DIALOG_CLOSE_DELAY_MS,
            filter_debounce_ms: DEFAULT_FILTER_DEBOUNCE_MS,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            toast_max_visible: DEFAULT_TOAST_MAX_VISIBLE,
        }
    }
}

impl WidgetConfig {
    /// Decodes a config from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or `toast_max_visible` is zero.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        if config.toast_max_visible == 0 {
            return Err(ConfigError::Zero {
                field: "toast_max_visible",
            });
        }
        Ok(config)
    }

    /// Dialog close delay as a [`Duration`].
    pub fn dialog_close_delay(&self) -> Duration {
        Duration::from_millis(self.dialog_close_delay_ms)
    }

    /// Filter debounce window as a [`Duration`].
    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    /// Toast visibility duration as a [`Duration`].
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WidgetConfig::from_json(r#"{"filter_debounce_ms": 250}"#).expect("config");
        assert_eq!(config.filter_debounce(), Duration::from_millis(250));
        assert_eq!(config.dialog_close_delay(), Duration::from_millis(300));
        assert_eq!(config.toast_max_visible, 3);
    }

    #[test]
    fn zero_toast_capacity_is_rejected() {
        let err = WidgetConfig::from_json(r#"{"toast_max_visible": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Zero {
                field: "toast_max_visible"
            }
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            WidgetConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }
}

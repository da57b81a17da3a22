//! Widget configuration context.

use leptos::*;
use widget_state::WidgetConfig;

/// Makes `config` available to every widget below the current owner.
pub fn provide_widget_config(config: WidgetConfig) {
    provide_context(config);
}

/// Returns the nearest provided [`WidgetConfig`], or the defaults when none was provided.
pub fn use_widget_config() -> WidgetConfig {
    use_context::<WidgetConfig>().unwrap_or_default()
}

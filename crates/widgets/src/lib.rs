//! Leptos bindings for the widget kit.
//!
//! Each binding owns a headless state container from [`widget_state`], renders it with
//! [`system_ui`] primitives, and executes the side effects the container asks for (timers,
//! handler futures, URL writes) against the browser adapters in [`widget_state_web`].
//!
//! - [`use_dialog`] returns a [`DialogHandle`] for opening, closing, and rendering a dialog.
//! - [`UniversalFilter`] renders a filter schema kept in sync with the page URL.
//! - [`ToastProvider`] and [`use_toasts`] show timed notifications.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod config;
mod dialog;
mod filter;
mod toast;

pub use config::{provide_widget_config, use_widget_config};
pub use dialog::{use_dialog, DialogForm, DialogHandle, DialogHost};
pub use filter::UniversalFilter;
pub use toast::{use_toasts, ToastContext, ToastProvider};

/// Convenience imports for pages using the widget kit.
pub mod prelude {
    pub use crate::{
        provide_widget_config, use_dialog, use_toasts, use_widget_config, DialogForm,
        DialogHandle, DialogHost, ToastContext, ToastProvider, UniversalFilter,
    };
    pub use widget_state::{
        ButtonEmphasis, ButtonRole, DialogButton, DialogConfig, DialogPatch, DialogSize,
        FilterConfig, FilterKind, FilterLayout, FilterOption, FilterValue, FilterValues,
        FiltersConfig, HandlerError, ToastKind, WidgetConfig,
    };
}

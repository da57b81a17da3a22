//! Headless state for the widget kit: dialog orchestration, URL-synced filters, and toasts.
//!
//! Nothing here depends on a UI framework or the browser. Host services are reached through the
//! [`query::QueryStore`] and [`timer::TimerHost`] traits; in-memory implementations of both are
//! provided for tests and non-browser targets, while the browser adapters live in
//! `widget_state_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod dialog;
pub mod filters;
pub mod query;
pub mod time;
pub mod timer;
pub mod toast;

pub use config::{ConfigError, WidgetConfig};
pub use dialog::{
    reduce_dialog, ButtonEmphasis, ButtonFlags, ButtonRole, ClickHandler, DialogAction,
    DialogButton, DialogConfig, DialogEffect, DialogError, DialogPatch, DialogPhase, DialogSize,
    DialogState, HandlerError, HandlerFuture, HandlerInvocation, LoadingSource,
};
pub use filters::{
    FilterConfig, FilterKind, FilterLayout, FilterOption, FilterSchemaError, FilterSchemaIssue,
    FilterSession, FilterValue, FilterValues, FiltersConfig, ParseError, ParseIssue, ValueShape,
};
pub use query::{
    HistoryMode, MemoryQueryStore, QueryListener, QueryListeners, QueryPatch, QuerySnapshot,
    QueryStore, SubscriptionId,
};
pub use timer::{Debouncer, ManualTimerHost, ManualTimerId, TimerHost};
pub use toast::{Toast, ToastId, ToastKind, ToastQueue};

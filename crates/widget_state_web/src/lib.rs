//! Browser (`wasm32`) implementations of the [`widget_state`] host contracts.
//!
//! - [`BrowserQueryStore`] reads `location.search`, writes through `history.replaceState` /
//!   `history.pushState`, and re-reads on `popstate`.
//! - [`BrowserTimerHost`] schedules tasks with `window.setTimeout`.
//!
//! Browser calls are isolated in `bridge`, which routes to a wasm implementation or an
//! in-process stand-in for host builds and tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod bridge;
pub mod query;
pub mod timer;

pub use query::BrowserQueryStore;
pub use timer::{BrowserTimeout, BrowserTimerHost};

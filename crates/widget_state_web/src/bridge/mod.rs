//! Target-routed browser interop for location, history, and timers.

use std::{rc::Rc, time::Duration};

use widget_state::{HistoryMode, QuerySnapshot};

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub use imp::{PopstateGuard, TimeoutGuard};

pub fn read_query() -> Result<QuerySnapshot, String> {
    imp::read_query()
}

pub fn write_query(query: &QuerySnapshot, mode: HistoryMode) -> Result<(), String> {
    imp::write_query(query, mode)
}

pub fn listen_popstate(callback: Rc<dyn Fn()>) -> Result<PopstateGuard, String> {
    imp::listen_popstate(callback)
}

pub fn set_timeout(delay: Duration, task: Box<dyn FnOnce()>) -> Result<TimeoutGuard, String> {
    imp::set_timeout(delay, task)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
pub use non_wasm::history_len;

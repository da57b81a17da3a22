//! Process-local stand-in for the browser location, used by host builds and tests.

use std::{cell::RefCell, rc::Rc, time::Duration};

use widget_state::{HistoryMode, QuerySnapshot};

#[derive(Default)]
struct FakeLocation {
    history: Vec<QuerySnapshot>,
}

thread_local! {
    static LOCATION: RefCell<FakeLocation> = RefCell::new(FakeLocation::default());
}

pub fn read_query() -> Result<QuerySnapshot, String> {
    Ok(LOCATION.with(|location| {
        location
            .borrow()
            .history
            .last()
            .cloned()
            .unwrap_or_default()
    }))
}

pub fn write_query(query: &QuerySnapshot, mode: HistoryMode) -> Result<(), String> {
    LOCATION.with(|location| {
        let mut location = location.borrow_mut();
        match (mode, location.history.last_mut()) {
            (HistoryMode::Replace, Some(current)) => *current = query.clone(),
            _ => location.history.push(query.clone()),
        }
    });
    Ok(())
}

pub struct PopstateGuard;

pub fn listen_popstate(_callback: Rc<dyn Fn()>) -> Result<PopstateGuard, String> {
    Ok(PopstateGuard)
}

pub struct TimeoutGuard;

pub fn set_timeout(_delay: Duration, _task: Box<dyn FnOnce()>) -> Result<TimeoutGuard, String> {
    Err("timers are only available when compiled for wasm32".to_string())
}

#[cfg(test)]
pub fn history_len() -> usize {
    LOCATION.with(|location| location.borrow().history.len())
}

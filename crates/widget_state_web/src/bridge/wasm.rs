use std::{rc::Rc, time::Duration};

use gloo_timers::callback::Timeout;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{UrlSearchParams, Window};
use widget_state::{HistoryMode, QuerySnapshot};

fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "window unavailable".to_string())
}

pub fn read_query() -> Result<QuerySnapshot, String> {
    let search = window()?
        .location()
        .search()
        .map_err(|err| format!("location.search failed: {err:?}"))?;
    let params = UrlSearchParams::new_with_str(&search)
        .map_err(|err| format!("failed to parse query string: {err:?}"))?;
    let entries = js_sys::try_iter(params.as_ref())
        .map_err(|err| format!("query params are not iterable: {err:?}"))?
        .ok_or_else(|| "query params are not iterable".to_string())?;

    let mut pairs = Vec::new();
    for entry in entries {
        let entry = js_sys::Array::from(
            &entry.map_err(|err| format!("query param iteration failed: {err:?}"))?,
        );
        if let (Some(key), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string()) {
            pairs.push((key, value));
        }
    }
    Ok(QuerySnapshot::from_pairs(pairs))
}

pub fn write_query(query: &QuerySnapshot, mode: HistoryMode) -> Result<(), String> {
    let window = window()?;
    let params =
        UrlSearchParams::new().map_err(|err| format!("failed to build query string: {err:?}"))?;
    for (key, value) in query.pairs() {
        params.append(key, value);
    }
    let search = String::from(params.to_string());

    let location = window.location();
    let pathname = location
        .pathname()
        .map_err(|err| format!("location.pathname failed: {err:?}"))?;
    let hash = location.hash().unwrap_or_default();
    let url = if search.is_empty() {
        format!("{pathname}{hash}")
    } else {
        format!("{pathname}?{search}{hash}")
    };

    let history = window
        .history()
        .map_err(|err| format!("history unavailable: {err:?}"))?;
    match mode {
        HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(&url)),
        HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(&url)),
    }
    .map_err(|err| format!("history update failed: {err:?}"))
}

/// Removes the `popstate` listener when dropped.
pub struct PopstateGuard {
    window: Window,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for PopstateGuard {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("popstate", self.closure.as_ref().unchecked_ref());
    }
}

pub fn listen_popstate(callback: Rc<dyn Fn()>) -> Result<PopstateGuard, String> {
    let window = window()?;
    let closure = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| callback()));
    window
        .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
        .map_err(|err| format!("failed to listen for popstate: {err:?}"))?;
    Ok(PopstateGuard { window, closure })
}

/// Pending `setTimeout`; dropping it clears the timeout.
pub struct TimeoutGuard {
    _timeout: Timeout,
}

pub fn set_timeout(delay: Duration, task: Box<dyn FnOnce()>) -> Result<TimeoutGuard, String> {
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
    Ok(TimeoutGuard {
        _timeout: Timeout::new(millis, task),
    })
}

//! URL query store backed by `window.location` and the History API.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use widget_state::{
    HistoryMode, QueryListener, QueryListeners, QueryPatch, QuerySnapshot, QueryStore,
    SubscriptionId,
};

use crate::bridge;

type ErrorReporter = Rc<dyn Fn(&str)>;

#[derive(Default)]
struct BrowserQueryInner {
    listeners: RefCell<QueryListeners>,
    popstate: RefCell<Option<bridge::PopstateGuard>>,
    reporter: RefCell<Option<ErrorReporter>>,
}

impl BrowserQueryInner {
    fn report(&self, message: &str) {
        let reporter = self.reporter.borrow().clone();
        if let Some(reporter) = reporter {
            reporter(message);
        }
    }

    fn read(&self) -> QuerySnapshot {
        bridge::read_query().unwrap_or_else(|err| {
            self.report(&err);
            QuerySnapshot::new()
        })
    }

    fn notify(&self, snapshot: &QuerySnapshot) {
        let listeners = self.listeners.borrow().snapshot();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

#[derive(Clone, Default)]
/// Query store over the page URL.
///
/// Writes go through `history.replaceState`/`pushState`, so they never trigger a navigation.
/// Back/forward navigation is picked up through `popstate` while at least one listener is
/// subscribed. Browser API failures are passed to the error reporter and otherwise ignored.
pub struct BrowserQueryStore {
    inner: Rc<BrowserQueryInner>,
}

impl BrowserQueryStore {
    /// Creates a store over the current page URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callback that receives browser API failures.
    pub fn with_error_reporter(self, reporter: impl Fn(&str) + 'static) -> Self {
        *self.inner.reporter.borrow_mut() = Some(Rc::new(reporter));
        self
    }

    fn ensure_popstate_listener(&self) {
        if self.inner.popstate.borrow().is_some() {
            return;
        }
        let weak: Weak<BrowserQueryInner> = Rc::downgrade(&self.inner);
        let listener = bridge::listen_popstate(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                let snapshot = inner.read();
                inner.notify(&snapshot);
            }
        }));
        match listener {
            Ok(guard) => *self.inner.popstate.borrow_mut() = Some(guard),
            Err(err) => self.inner.report(&err),
        }
    }
}

impl QueryStore for BrowserQueryStore {
    fn snapshot(&self) -> QuerySnapshot {
        self.inner.read()
    }

    fn apply(&self, patch: &QueryPatch, mode: HistoryMode) {
        let current = self.inner.read();
        let next = current.with_patch(patch);
        if next == current && mode == HistoryMode::Replace {
            return;
        }
        if let Err(err) = bridge::write_query(&next, mode) {
            self.inner.report(&err);
            return;
        }
        if next != current {
            self.inner.notify(&next);
        }
    }

    fn subscribe(&self, listener: QueryListener) -> SubscriptionId {
        let id = self.inner.listeners.borrow_mut().add(listener);
        self.ensure_popstate_listener();
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let now_empty = {
            let mut listeners = self.inner.listeners.borrow_mut();
            listeners.remove(id);
            listeners.is_empty()
        };
        if now_empty {
            self.inner.popstate.borrow_mut().take();
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn replace_writes_update_location_without_growing_history() {
        let store = BrowserQueryStore::new();
        store.set("q", Some("shoes".to_string()), HistoryMode::Replace);
        store.set("page", Some("2".to_string()), HistoryMode::Replace);

        assert_eq!(
            store.snapshot(),
            QuerySnapshot::from_pairs([("q", "shoes"), ("page", "2")])
        );
        assert_eq!(bridge::history_len(), 1);

        store.set("page", Some("3".to_string()), HistoryMode::Push);
        assert_eq!(bridge::history_len(), 2);
    }

    #[test]
    fn subscribers_hear_changes_but_not_no_op_writes() {
        let store = BrowserQueryStore::new();
        let heard = Rc::new(Cell::new(0));
        let id = {
            let heard = Rc::clone(&heard);
            store.subscribe(Rc::new(move |_| heard.set(heard.get() + 1)))
        };

        store.set("status", Some("open".to_string()), HistoryMode::Replace);
        store.set("status", Some("open".to_string()), HistoryMode::Replace);
        assert_eq!(heard.get(), 1);

        store.unsubscribe(id);
        store.set("status", None, HistoryMode::Replace);
        assert_eq!(heard.get(), 1);
        assert_eq!(store.get("status"), None);
    }
}

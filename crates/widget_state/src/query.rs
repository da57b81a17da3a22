//! URL query-parameter store contract and in-memory adapter.
//!
//! The browser URL is the shared store behind filter widgets. It is modelled as a single-writer
//! key/value store with change notification so both directions of the sync (URL to form on
//! navigation, form to URL on edits) can be exercised without a browser.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Ordered list of decoded query pairs.
pub struct QuerySnapshot {
    pairs: Vec<(String, String)>,
}

impl QuerySnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from decoded pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    /// Whether `key` is present with a non-empty value.
    pub fn is_active(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_empty())
    }

    /// Decoded pairs in order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the snapshot has no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns a copy with `patch` applied.
    ///
    /// A `Some` entry replaces the first pair for its key in place (appending when absent) and
    /// drops any duplicates; a `None` entry removes every pair for its key.
    pub fn with_patch(&self, patch: &QueryPatch) -> Self {
        let mut pairs = self.pairs.clone();
        for (key, value) in patch.entries() {
            match value {
                Some(value) => {
                    let mut seen = false;
                    pairs.retain_mut(|(candidate, existing)| {
                        if candidate != key {
                            return true;
                        }
                        if seen {
                            return false;
                        }
                        seen = true;
                        existing.clone_from(value);
                        true
                    });
                    if !seen {
                        pairs.push((key.clone(), value.clone()));
                    }
                }
                None => pairs.retain(|(candidate, _)| candidate != key),
            }
        }
        Self { pairs }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Batched set of query writes. `None` removes the parameter.
pub struct QueryPatch {
    entries: Vec<(String, Option<String>)>,
}

impl QueryPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a write and returns the patch.
    pub fn with(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a write, replacing an earlier write for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(candidate, _)| *candidate == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Writes in insertion order.
    pub fn entries(&self) -> &[(String, Option<String>)] {
        &self.entries
    }

    /// Whether the patch has no writes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a query write interacts with browser history.
pub enum HistoryMode {
    /// Replace the current history entry.
    Replace,
    /// Push a new history entry.
    Push,
}

/// Listener notified with the new snapshot after every change.
pub type QueryListener = Rc<dyn Fn(&QuerySnapshot)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Subscription handle returned by [`QueryStore::subscribe`].
pub struct SubscriptionId(u64);

/// Single-writer URL query store with change notification.
pub trait QueryStore {
    /// Current decoded query.
    fn snapshot(&self) -> QuerySnapshot;

    /// Current value for `key`.
    fn get(&self, key: &str) -> Option<String> {
        self.snapshot().get(key).map(str::to_string)
    }

    /// Applies a batched write and notifies subscribers when the query changed.
    fn apply(&self, patch: &QueryPatch, mode: HistoryMode);

    /// Writes or removes a single key.
    fn set(&self, key: &str, value: Option<String>, mode: HistoryMode) {
        self.apply(&QueryPatch::new().with(key, value), mode);
    }

    /// Registers a change listener.
    fn subscribe(&self, listener: QueryListener) -> SubscriptionId;

    /// Removes a change listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Default)]
/// Listener registry shared by store adapters.
pub struct QueryListeners {
    next_id: u64,
    listeners: Vec<(SubscriptionId, QueryListener)>,
}

impl QueryListeners {
    /// Adds a listener and returns its id.
    pub fn add(&mut self, listener: QueryListener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener.
    pub fn remove(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(candidate, _)| *candidate != id);
    }

    /// Clones the current listeners so they can be invoked without holding a borrow.
    pub fn snapshot(&self) -> Vec<QueryListener> {
        self.listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[derive(Default)]
struct MemoryQueryInner {
    history: Vec<QuerySnapshot>,
    writes: usize,
    listeners: QueryListeners,
}

impl MemoryQueryInner {
    fn current(&self) -> QuerySnapshot {
        self.history.last().cloned().unwrap_or_default()
    }
}

#[derive(Clone, Default)]
/// In-memory query store with a history stack, used by tests and non-browser targets.
pub struct MemoryQueryStore {
    inner: Rc<RefCell<MemoryQueryInner>>,
}

impl MemoryQueryStore {
    /// Creates a store seeded with `initial` as its only history entry.
    pub fn with_snapshot(initial: QuerySnapshot) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().history.push(initial);
        store
    }

    /// Simulates external navigation (link click, back/forward): pushes `snapshot` and notifies.
    pub fn navigate(&self, snapshot: QuerySnapshot) {
        self.inner.borrow_mut().history.push(snapshot.clone());
        self.notify(&snapshot);
    }

    /// Number of history entries.
    pub fn history_len(&self) -> usize {
        self.inner.borrow().history.len().max(1)
    }

    /// Number of writes applied through [`QueryStore::apply`], including no-op writes.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn notify(&self, snapshot: &QuerySnapshot) {
        let listeners = self.inner.borrow().listeners.snapshot();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl QueryStore for MemoryQueryStore {
    fn snapshot(&self) -> QuerySnapshot {
        self.inner.borrow().current()
    }

    fn apply(&self, patch: &QueryPatch, mode: HistoryMode) {
        let (changed, next) = {
            let mut inner = self.inner.borrow_mut();
            inner.writes += 1;
            let current = inner.current();
            let next = current.with_patch(patch);
            let changed = next != current;
            match mode {
                HistoryMode::Replace => match inner.history.last_mut() {
                    Some(last) => *last = next.clone(),
                    None => inner.history.push(next.clone()),
                },
                HistoryMode::Push => inner.history.push(next.clone()),
            }
            (changed, next)
        };
        if changed {
            self.notify(&next);
        }
    }

    fn subscribe(&self, listener: QueryListener) -> SubscriptionId {
        self.inner.borrow_mut().listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.borrow_mut().listeners.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn patch_replaces_in_place_and_removes_duplicates() {
        let snapshot = QuerySnapshot::from_pairs([("page", "2"), ("tags", "a"), ("tags", "b")]);
        let patched = snapshot.with_patch(
            &QueryPatch::new()
                .with("tags", Some("a,b".to_string()))
                .with("status", Some("open".to_string())),
        );
        assert_eq!(
            patched,
            QuerySnapshot::from_pairs([("page", "2"), ("tags", "a,b"), ("status", "open")])
        );
    }

    #[test]
    fn patch_none_removes_key() {
        let snapshot = QuerySnapshot::from_pairs([("q", "x"), ("page", "1")]);
        let patched = snapshot.with_patch(&QueryPatch::new().with("q", None));
        assert_eq!(patched.get("q"), None);
        assert_eq!(patched.len(), 1);
    }

    #[test]
    fn empty_value_is_present_but_not_active() {
        let snapshot = QuerySnapshot::from_pairs([("q", "")]);
        assert_eq!(snapshot.get("q"), Some(""));
        assert!(!snapshot.is_active("q"));
        assert!(!snapshot.is_active("missing"));
    }

    #[test]
    fn replace_keeps_history_length_and_push_grows_it() {
        let store = MemoryQueryStore::default();
        store.set("q", Some("a".to_string()), HistoryMode::Replace);
        store.set("q", Some("b".to_string()), HistoryMode::Replace);
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.get("q").as_deref(), Some("b"));

        store.set("q", Some("c".to_string()), HistoryMode::Push);
        assert_eq!(store.history_len(), 2);
        assert_eq!(store.writes(), 3);
    }

    #[test]
    fn subscribers_hear_changes_only() {
        let store = MemoryQueryStore::default();
        let heard = Rc::new(Cell::new(0));
        let id = {
            let heard = Rc::clone(&heard);
            store.subscribe(Rc::new(move |_| heard.set(heard.get() + 1)))
        };

        store.set("q", Some("a".to_string()), HistoryMode::Replace);
        store.set("q", Some("a".to_string()), HistoryMode::Replace);
        assert_eq!(heard.get(), 1);

        store.navigate(QuerySnapshot::from_pairs([("q", "z")]));
        assert_eq!(heard.get(), 2);

        store.unsubscribe(id);
        store.set("q", None, HistoryMode::Replace);
        assert_eq!(heard.get(), 2);
        assert_eq!(store.subscriber_count(), 0);
    }
}

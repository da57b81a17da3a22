//! Live synchronization between a filter schema's form state and a [`QueryStore`].

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
    time::Duration,
};

use super::{FilterSchemaError, FilterValue, FilterValues, FiltersConfig, ParseIssue};
use crate::{
    query::{HistoryMode, QueryPatch, QuerySnapshot, QueryStore, SubscriptionId},
    timer::{Debouncer, TimerHost},
};

type ValuesListener = Rc<dyn Fn(&FilterValues)>;

struct SessionShared<H: TimerHost> {
    schema: FiltersConfig,
    store: Rc<dyn QueryStore>,
    debouncer: Debouncer<H>,
    values: RefCell<FilterValues>,
    parse_issues: RefCell<Vec<ParseIssue>>,
    listener: RefCell<Option<ValuesListener>>,
    writing: Cell<bool>,
}

impl<H: TimerHost> SessionShared<H> {
    /// Applies one of the session's own writes to the store.
    fn write(&self, patch: &QueryPatch) {
        self.writing.set(true);
        self.store.apply(patch, HistoryMode::Replace);
        self.writing.set(false);
    }

    /// Store notification. Changes from outside the session (back/forward navigation, other
    /// writers) drop every pending write and overwrite the whole form.
    fn on_store_changed(&self, query: &QuerySnapshot) {
        if self.writing.get() {
            self.refresh(query);
        } else {
            self.debouncer.cancel_all();
            self.overwrite(query);
        }
    }

    /// Overwrites form state from `query`. Fields with a pending debounced write keep their
    /// local value so in-progress typing is not reverted by the session's other writes.
    fn refresh(&self, query: &QuerySnapshot) {
        let (mut next, issues) = self.schema.values_from_query(query);
        {
            let current = self.values.borrow();
            for param in self.debouncer.pending_keys() {
                if let Some(local) = current.get(&param) {
                    next.insert(param, local.clone());
                }
            }
        }
        *self.values.borrow_mut() = next;
        *self.parse_issues.borrow_mut() = issues;
        self.notify();
    }

    fn overwrite(&self, query: &QuerySnapshot) {
        let (next, issues) = self.schema.values_from_query(query);
        *self.values.borrow_mut() = next;
        *self.parse_issues.borrow_mut() = issues;
        self.notify();
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            let values = self.values.borrow().clone();
            listener(&values);
        }
    }
}

/// Filter form state bound to a query store.
///
/// The session subscribes to the store on start and unsubscribes on drop; dropping it also
/// cancels every pending debounced write.
pub struct FilterSession<H: TimerHost + 'static> {
    shared: Rc<SessionShared<H>>,
    subscription: SubscriptionId,
}

impl<H: TimerHost + 'static> FilterSession<H> {
    /// Validates `schema`, seeds form state from the store, and subscribes to changes.
    ///
    /// # Errors
    ///
    /// Returns an error when the schema has empty or duplicated parameters.
    pub fn start(
        schema: FiltersConfig,
        store: Rc<dyn QueryStore>,
        timers: H,
        debounce: Duration,
    ) -> Result<Self, FilterSchemaError> {
        schema.validate()?;

        let shared = Rc::new(SessionShared {
            schema,
            store,
            debouncer: Debouncer::new(timers, debounce),
            values: RefCell::new(FilterValues::new()),
            parse_issues: RefCell::new(Vec::new()),
            listener: RefCell::new(None),
            writing: Cell::new(false),
        });
        shared.refresh(&shared.store.snapshot());

        let weak: Weak<SessionShared<H>> = Rc::downgrade(&shared);
        let subscription = shared.store.subscribe(Rc::new(move |query: &QuerySnapshot| {
            if let Some(shared) = weak.upgrade() {
                shared.on_store_changed(query);
            }
        }));

        Ok(Self {
            shared,
            subscription,
        })
    }

    /// Schema the session was started with.
    pub fn schema(&self) -> &FiltersConfig {
        &self.shared.schema
    }

    /// Current form state.
    pub fn values(&self) -> FilterValues {
        self.shared.values.borrow().clone()
    }

    /// Current value for `param`.
    pub fn value(&self, param: &str) -> Option<FilterValue> {
        self.shared.values.borrow().get(param).cloned()
    }

    /// Parameters that failed to parse on the last refresh.
    pub fn parse_issues(&self) -> Vec<ParseIssue> {
        self.shared.parse_issues.borrow().clone()
    }

    /// Registers the form-state listener, replacing any previous one.
    pub fn on_values_changed(&self, listener: impl Fn(&FilterValues) + 'static) {
        *self.shared.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Records a user edit and writes it to the URL, debounced for text-like kinds.
    ///
    /// # Errors
    ///
    /// Returns an error when `param` is not declared by the schema.
    pub fn set_value(&self, param: &str, value: FilterValue) -> Result<(), FilterSchemaError> {
        let kind = self
            .shared
            .schema
            .filter(param)
            .map(|filter| filter.kind)
            .ok_or_else(|| FilterSchemaError::UnknownParam(param.to_string()))?;

        let patch = QueryPatch::new().with(param, value.to_query_value());
        self.shared
            .values
            .borrow_mut()
            .insert(param.to_string(), value);

        if kind.is_debounced() {
            let weak = Rc::downgrade(&self.shared);
            self.shared.debouncer.schedule(param, move || {
                if let Some(shared) = weak.upgrade() {
                    shared.write(&patch);
                }
            });
            self.shared.notify();
        } else {
            self.shared.notify();
            self.shared.write(&patch);
        }
        Ok(())
    }

    /// Clears every declared parameter in one write and empties the form state.
    pub fn reset(&self) {
        self.shared.debouncer.cancel_all();
        self.shared.write(&self.shared.schema.reset_patch());
        *self.shared.values.borrow_mut() = self.shared.schema.empty_values();
        self.shared.notify();
    }

    /// Re-reads the store and overwrites form state, keeping fields with a pending write.
    pub fn refresh_from_store(&self) {
        let query = self.shared.store.snapshot();
        self.shared.refresh(&query);
    }

    /// Number of declared fields active in the URL.
    pub fn active_count(&self) -> usize {
        self.shared.schema.active_count(&self.shared.store.snapshot())
    }

    /// Whether `param` has a debounced write waiting.
    pub fn has_pending_write(&self, param: &str) -> bool {
        self.shared.debouncer.is_pending(param)
    }
}

impl<H: TimerHost + 'static> Drop for FilterSession<H> {
    fn drop(&mut self) {
        self.shared.store.unsubscribe(self.subscription);
        self.shared.debouncer.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        filters::{FilterConfig, FilterKind, FilterOption},
        query::MemoryQueryStore,
        timer::ManualTimerHost,
    };

    const DEBOUNCE: Duration = Duration::from_millis(500);

    fn schema() -> FiltersConfig {
        FiltersConfig::new([
            FilterConfig::new("Name", "name", FilterKind::Text),
            FilterConfig::new("Email", "email", FilterKind::Email),
            FilterConfig::new("Status", "status", FilterKind::Select).options([
                FilterOption::new("All", "all"),
                FilterOption::new("Active", "active"),
            ]),
            FilterConfig::new("Tags", "tags", FilterKind::Multiselect).options([
                FilterOption::new("A", "a"),
                FilterOption::new("B", "b"),
            ]),
            FilterConfig::new("Verified", "verified", FilterKind::Checkbox),
        ])
    }

    fn start(
        query: QuerySnapshot,
    ) -> (FilterSession<ManualTimerHost>, MemoryQueryStore, ManualTimerHost) {
        let store = MemoryQueryStore::with_snapshot(query);
        let timers = ManualTimerHost::default();
        let session = FilterSession::start(
            schema(),
            Rc::new(store.clone()) as Rc<dyn QueryStore>,
            timers.clone(),
            DEBOUNCE,
        )
        .expect("session");
        (session, store, timers)
    }

    #[test]
    fn multiselect_round_trips_through_url() {
        let (session, store, _) = start(QuerySnapshot::new());
        session
            .set_value(
                "tags",
                FilterValue::List(vec!["a".to_string(), "b".to_string()]),
            )
            .expect("set");
        assert_eq!(store.get("tags").as_deref(), Some("a,b"));
        drop(session);

        let (reloaded, _, _) = start(QuerySnapshot::from_pairs([("tags", "a,b")]));
        assert_eq!(
            reloaded.value("tags"),
            Some(FilterValue::List(vec!["a".to_string(), "b".to_string()]))
        );
    }

    #[test]
    fn select_all_or_empty_removes_param() {
        let (session, store, _) = start(QuerySnapshot::from_pairs([("status", "active")]));

        session
            .set_value("status", FilterValue::Text("all".to_string()))
            .expect("set all");
        assert_eq!(store.get("status"), None);

        session
            .set_value("status", FilterValue::Text("active".to_string()))
            .expect("set active");
        session
            .set_value("status", FilterValue::Text(String::new()))
            .expect("set empty");
        assert!(!store.snapshot().pairs().iter().any(|(key, _)| key == "status"));
    }

    #[test]
    fn text_edits_within_window_produce_one_url_write() {
        let (session, store, timers) = start(QuerySnapshot::new());
        let writes_before = store.writes();

        for typed in ["j", "jo", "joe"] {
            session
                .set_value("name", FilterValue::Text(typed.to_string()))
                .expect("type");
            timers.advance(Duration::from_millis(120));
        }
        assert_eq!(store.writes(), writes_before);
        assert!(session.has_pending_write("name"));
        assert_eq!(session.value("name"), Some(FilterValue::Text("joe".to_string())));

        timers.advance(DEBOUNCE);
        assert_eq!(store.writes(), writes_before + 1);
        assert_eq!(store.get("name").as_deref(), Some("joe"));
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn debounce_timers_are_independent_per_field() {
        let (session, store, timers) = start(QuerySnapshot::new());

        session
            .set_value("name", FilterValue::Text("ann".to_string()))
            .expect("name");
        timers.advance(Duration::from_millis(400));
        session
            .set_value("email", FilterValue::Text("a@b.c".to_string()))
            .expect("email");

        timers.advance(Duration::from_millis(100));
        assert_eq!(store.get("name").as_deref(), Some("ann"));
        assert_eq!(store.get("email"), None);

        timers.advance(Duration::from_millis(400));
        assert_eq!(store.get("email").as_deref(), Some("a@b.c"));
    }

    #[test]
    fn immediate_write_does_not_revert_pending_text() {
        let (session, _, _) = start(QuerySnapshot::new());
        session
            .set_value("name", FilterValue::Text("draft".to_string()))
            .expect("name");
        session
            .set_value("verified", FilterValue::Flag(true))
            .expect("verified");

        assert_eq!(session.value("name"), Some(FilterValue::Text("draft".to_string())));
        assert_eq!(session.value("verified"), Some(FilterValue::Flag(true)));
    }

    #[test]
    fn navigation_during_debounce_drops_the_draft() {
        let (session, store, timers) = start(QuerySnapshot::from_pairs([("name", "old")]));
        session
            .set_value("name", FilterValue::Text("draft".to_string()))
            .expect("name");

        store.navigate(QuerySnapshot::new());
        assert_eq!(session.value("name"), Some(FilterValue::Text(String::new())));
        assert!(!session.has_pending_write("name"));

        timers.advance(DEBOUNCE);
        assert_eq!(store.snapshot(), QuerySnapshot::new());
        assert_eq!(session.value("name"), Some(FilterValue::Text(String::new())));
    }

    #[test]
    fn external_navigation_overwrites_form_state() {
        let (session, store, _) = start(QuerySnapshot::from_pairs([
            ("name", "x"),
            ("verified", "true"),
        ]));
        let notified = Rc::new(Cell::new(0));
        {
            let notified = Rc::clone(&notified);
            session.on_values_changed(move |_| notified.set(notified.get() + 1));
        }

        store.navigate(QuerySnapshot::from_pairs([("status", "active")]));

        assert_eq!(notified.get(), 1);
        assert_eq!(session.value("name"), Some(FilterValue::Text(String::new())));
        assert_eq!(session.value("verified"), Some(FilterValue::Flag(false)));
        assert_eq!(
            session.value("status"),
            Some(FilterValue::Text("active".to_string()))
        );
    }

    #[test]
    fn reset_clears_params_in_one_write_and_cancels_pending() {
        let (session, store, timers) = start(QuerySnapshot::from_pairs([
            ("status", "active"),
            ("tags", "a"),
            ("page", "4"),
        ]));
        session
            .set_value("name", FilterValue::Text("pending".to_string()))
            .expect("name");
        let writes_before = store.writes();

        session.reset();
        timers.advance(DEBOUNCE * 2);

        assert_eq!(store.writes(), writes_before + 1);
        assert_eq!(store.snapshot(), QuerySnapshot::from_pairs([("page", "4")]));
        assert_eq!(session.values(), session.schema().empty_values());
        assert_eq!(session.active_count(), 0);
    }

    #[test]
    fn active_count_tracks_url() {
        let (session, _, _) = start(QuerySnapshot::from_pairs([
            ("name", "a"),
            ("status", "active"),
            ("email", ""),
        ]));
        assert_eq!(session.active_count(), 2);
    }

    #[test]
    fn dropping_session_unsubscribes_and_cancels_timers() {
        let (session, store, timers) = start(QuerySnapshot::new());
        session
            .set_value("name", FilterValue::Text("late".to_string()))
            .expect("name");
        assert_eq!(store.subscriber_count(), 1);

        drop(session);
        timers.advance(DEBOUNCE);

        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(store.get("name"), None);
    }

    #[test]
    fn unknown_param_is_rejected() {
        let (session, _, _) = start(QuerySnapshot::new());
        assert!(matches!(
            session.set_value("nope", FilterValue::Flag(true)),
            Err(FilterSchemaError::UnknownParam(param)) if param == "nope"
        ));
    }
}

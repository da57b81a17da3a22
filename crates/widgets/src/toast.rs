//! Toast notifications provider.

use leptos::*;
use system_ui::{TextTone, ToastRegion, ToastSurface};
use widget_state::{time::unix_time_ms_now, TimerHost, ToastId, ToastKind, ToastQueue};
use widget_state_web::{BrowserTimeout, BrowserTimerHost};

use crate::config::use_widget_config;

#[derive(Clone, Copy)]
/// Leptos context for pushing and dismissing toasts.
pub struct ToastContext {
    queue: RwSignal<ToastQueue>,
    timers: StoredValue<BrowserTimerHost>,
    expiry: StoredValue<Option<BrowserTimeout>>,
}

impl ToastContext {
    /// Shows a toast, or queues it until a slot frees up.
    ///
    /// Returns `None` once the provider has been torn down.
    pub fn push(
        self,
        kind: ToastKind,
        title: impl Into<String>,
        body: Option<String>,
    ) -> Option<ToastId> {
        let title = title.into();
        let id = self
            .queue
            .try_update(|queue| queue.push(kind, title, body, unix_time_ms_now()))?;
        self.schedule_expiry();
        Some(id)
    }

    /// Removes a toast before its display time runs out.
    pub fn dismiss(self, id: ToastId) {
        let removed = self
            .queue
            .try_update(|queue| queue.dismiss(id, unix_time_ms_now()))
            .unwrap_or(false);
        if removed {
            self.schedule_expiry();
        }
    }

    fn expire_due(self) {
        if self
            .queue
            .try_update(|queue| queue.expire(unix_time_ms_now()))
            .is_some()
        {
            self.schedule_expiry();
        }
    }

    /// Arms a single timeout for the earliest visible deadline.
    fn schedule_expiry(self) {
        let Some(deadline) = self.queue.with_untracked(ToastQueue::next_deadline) else {
            self.expiry.set_value(None);
            return;
        };

        let delay = std::time::Duration::from_millis(deadline.saturating_sub(unix_time_ms_now()));
        let handle = self
            .timers
            .with_value(|timers| timers.schedule(delay, Box::new(move || self.expire_due())));
        self.expiry.set_value(Some(handle));
    }
}

#[component]
/// Provides [`ToastContext`] to descendants and renders the visible toasts after them.
pub fn ToastProvider(
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let config = use_widget_config();
    let toasts = ToastContext {
        queue: create_rw_signal(ToastQueue::from_config(&config)),
        timers: store_value(
            BrowserTimerHost::new()
                .with_error_reporter(|err| logging::warn!("toast timer error: {err}")),
        ),
        expiry: store_value(None),
    };

    provide_context(toasts);
    on_cleanup(move || {
        toasts.expiry.try_update_value(|slot| slot.take());
    });

    let visible = move || toasts.queue.with(|queue| queue.visible().to_vec());

    view! {
        {children()}
        <ToastRegion layout_class=layout_class.unwrap_or("")>
            <For
                each=visible
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <ToastSurface
                            tone=toast_tone(toast.kind)
                            title=toast.title
                            body=toast.body
                            on_dismiss=Callback::new(move |()| toasts.dismiss(id))
                        />
                    }
                }
            />
        </ToastRegion>
    }
}

/// Returns the current [`ToastContext`].
///
/// # Panics
///
/// Panics if called outside [`ToastProvider`].
pub fn use_toasts() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext not provided")
}

fn toast_tone(kind: ToastKind) -> TextTone {
    match kind {
        ToastKind::Info => TextTone::Accent,
        ToastKind::Success => TextTone::Success,
        ToastKind::Warning => TextTone::Warning,
        ToastKind::Error => TextTone::Danger,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn kinds_map_onto_feedback_tones() {
        assert_eq!(toast_tone(ToastKind::default()), TextTone::Accent);
        assert_eq!(toast_tone(ToastKind::Error), TextTone::Danger);
        assert_eq!(toast_tone(ToastKind::Warning), TextTone::Warning);
    }
}

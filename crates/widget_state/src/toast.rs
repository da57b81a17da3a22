//! Bounded toast queue with timed expiry.
//!
//! Toasts are shown oldest first, at most `max_visible` at a time. A waiting toast's display
//! clock starts only when it is promoted into a visible slot.

use serde::{Deserialize, Serialize};

use crate::config::WidgetConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Visual intent of a toast.
pub enum ToastKind {
    #[default]
    /// Neutral information.
    Info,
    /// Completed action.
    Success,
    /// Recoverable problem.
    Warning,
    /// Failed action.
    Error,
}

impl ToastKind {
    /// Stable token for DOM attributes.
    pub fn token(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identifier assigned by [`ToastQueue::push`].
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
/// One queued toast.
pub struct Toast {
    /// Queue-assigned id.
    pub id: ToastId,
    /// Visual intent.
    pub kind: ToastKind,
    /// Headline.
    pub title: String,
    /// Optional detail line.
    pub body: Option<String>,
    /// When the toast entered a visible slot, in unix milliseconds.
    pub shown_at: Option<u64>,
}

#[derive(Debug, Clone)]
/// Bounded toast queue.
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
    max_visible: usize,
    duration_ms: u64,
}

impl ToastQueue {
    /// Creates a queue. A `max_visible` of zero is treated as one.
    pub fn new(max_visible: usize, duration_ms: u64) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 0,
            max_visible: max_visible.max(1),
            duration_ms,
        }
    }

    /// Creates a queue from the shared widget config.
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.toast_max_visible, config.toast_duration_ms)
    }

    /// Enqueues a toast and shows it immediately when a slot is free.
    pub fn push(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        body: Option<String>,
        now_ms: u64,
    ) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.toasts.push(Toast {
            id,
            kind,
            title: title.into(),
            body,
            shown_at: None,
        });
        self.promote(now_ms);
        id
    }

    /// Removes a toast. Returns whether it was queued.
    pub fn dismiss(&mut self, id: ToastId, now_ms: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        let removed = self.toasts.len() != before;
        if removed {
            self.promote(now_ms);
        }
        removed
    }

    /// Removes visible toasts whose display time has elapsed and returns their ids.
    pub fn expire(&mut self, now_ms: u64) -> Vec<ToastId> {
        let duration = self.duration_ms;
        let mut expired = Vec::new();
        self.toasts.retain(|toast| match toast.shown_at {
            Some(shown_at) if now_ms >= shown_at.saturating_add(duration) => {
                expired.push(toast.id);
                false
            }
            _ => true,
        });
        if !expired.is_empty() {
            self.promote(now_ms);
        }
        expired
    }

    /// Toasts currently on screen, oldest first.
    pub fn visible(&self) -> &[Toast] {
        let end = self.toasts.len().min(self.max_visible);
        &self.toasts[..end]
    }

    /// Number of toasts waiting for a slot.
    pub fn waiting(&self) -> usize {
        self.toasts.len().saturating_sub(self.max_visible)
    }

    /// Earliest time a visible toast expires.
    pub fn next_deadline(&self) -> Option<u64> {
        self.visible()
            .iter()
            .filter_map(|toast| toast.shown_at)
            .map(|shown_at| shown_at.saturating_add(self.duration_ms))
            .min()
    }

    fn promote(&mut self, now_ms: u64) {
        let end = self.toasts.len().min(self.max_visible);
        for toast in &mut self.toasts[..end] {
            toast.shown_at.get_or_insert(now_ms);
        }
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::from_config(&WidgetConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn titles(queue: &ToastQueue) -> Vec<&str> {
        queue.visible().iter().map(|toast| toast.title.as_str()).collect()
    }

    #[test]
    fn overflow_waits_until_a_slot_frees() {
        let mut queue = ToastQueue::new(2, 1_000);
        let first = queue.push(ToastKind::Info, "one", None, 0);
        queue.push(ToastKind::Success, "two", None, 10);
        queue.push(ToastKind::Error, "three", None, 20);

        assert_eq!(titles(&queue), vec!["one", "two"]);
        assert_eq!(queue.waiting(), 1);

        assert!(queue.dismiss(first, 500));
        assert_eq!(titles(&queue), vec!["two", "three"]);
        assert_eq!(queue.visible()[1].shown_at, Some(500));
    }

    #[test]
    fn toasts_expire_after_their_display_time() {
        let mut queue = ToastQueue::new(1, 1_000);
        let first = queue.push(ToastKind::Info, "one", None, 0);
        let second = queue.push(ToastKind::Warning, "two", Some("later".to_string()), 100);

        assert_eq!(queue.next_deadline(), Some(1_000));
        assert_eq!(queue.expire(999), Vec::new());
        assert_eq!(queue.expire(1_000), vec![first]);

        assert_eq!(titles(&queue), vec!["two"]);
        assert_eq!(queue.next_deadline(), Some(2_000));
        assert_eq!(queue.expire(2_000), vec![second]);
        assert!(queue.visible().is_empty());
    }

    #[test]
    fn dismissing_unknown_toast_is_a_no_op() {
        let mut queue = ToastQueue::default();
        let id = queue.push(ToastKind::Info, "only", None, 0);
        assert!(queue.dismiss(id, 1));
        assert!(!queue.dismiss(id, 2));
        assert_eq!(queue.next_deadline(), None);
    }
}

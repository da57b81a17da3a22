//! Dialog configuration model and per-dialog orchestration state.
//!
//! A dialog has three optional buttons (cancel, middle, action). Each button carries its own
//! click handler and a [`LoadingSource`] that decides who owns its busy indicator. State changes
//! go through [`reduce_dialog`], which returns effects for the UI binding to execute.

use std::{fmt, future::Future, rc::Rc, time::Duration};

use futures::future::{FutureExt, LocalBoxFuture};
use thiserror::Error;

mod reducer;

pub use reducer::{reduce_dialog, DialogAction, DialogEffect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Button slot within a dialog footer.
pub enum ButtonRole {
    /// Dismisses the dialog.
    Cancel,
    /// Secondary action; no-op without a handler.
    Middle,
    /// Primary action; closes without a handler.
    Action,
}

impl ButtonRole {
    /// Every role in footer order.
    pub const ALL: [ButtonRole; 3] = [Self::Cancel, Self::Middle, Self::Action];

    /// Stable token for DOM attributes and logs.
    pub fn token(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Middle => "middle",
            Self::Action => "action",
        }
    }
}

impl fmt::Display for ButtonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Visual emphasis of a dialog button.
pub enum ButtonEmphasis {
    /// Standard button.
    #[default]
    Standard,
    /// Primary call to action.
    Primary,
    /// Secondary action.
    Secondary,
    /// Low-emphasis action.
    Quiet,
    /// Destructive action.
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Bounded dialog width class.
pub enum DialogSize {
    /// Narrow confirmation dialog.
    Sm,
    /// Default width.
    #[default]
    Md,
    /// Wide form dialog.
    Lg,
    /// Extra wide dialog.
    Xl,
}

impl DialogSize {
    /// Stable token for the `data-ui-size` attribute.
    pub fn token(self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
/// Failure reported by a button handler.
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a handler error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Boxed future returned by asynchronous handlers.
pub type HandlerFuture = LocalBoxFuture<'static, Result<(), HandlerError>>;

#[derive(Clone)]
/// Click handler attached to a dialog button.
pub enum ClickHandler {
    /// Handler that completes before returning.
    Sync(Rc<dyn Fn() -> Result<(), HandlerError>>),
    /// Handler whose completion is awaited.
    Async(Rc<dyn Fn() -> HandlerFuture>),
}

/// Result of invoking a [`ClickHandler`].
pub enum HandlerInvocation {
    /// The handler already finished.
    Ready(Result<(), HandlerError>),
    /// The handler must be awaited.
    Pending(HandlerFuture),
}

impl ClickHandler {
    /// Wraps a synchronous handler.
    pub fn sync(handler: impl Fn() -> Result<(), HandlerError> + 'static) -> Self {
        Self::Sync(Rc::new(handler))
    }

    /// Wraps a handler returning a future.
    pub fn future<Fut>(handler: impl Fn() -> Fut + 'static) -> Self
    where
        Fut: Future<Output = Result<(), HandlerError>> + 'static,
    {
        Self::Async(Rc::new(move || handler().boxed_local()))
    }

    /// Whether the handler is asynchronous.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    /// Invokes the handler.
    pub fn invoke(&self) -> HandlerInvocation {
        match self {
            Self::Sync(handler) => HandlerInvocation::Ready(handler()),
            Self::Async(handler) => HandlerInvocation::Pending(handler()),
        }
    }

    /// Invokes the handler and awaits it when asynchronous.
    pub async fn run(&self) -> Result<(), HandlerError> {
        match self.invoke() {
            HandlerInvocation::Ready(result) => result,
            HandlerInvocation::Pending(future) => future.await,
        }
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("ClickHandler::Sync"),
            Self::Async(_) => f.write_str("ClickHandler::Async"),
        }
    }
}

impl PartialEq for ClickHandler {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sync(a), Self::Sync(b)) => Rc::ptr_eq(a, b),
            (Self::Async(a), Self::Async(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Clone, Default)]
/// Owner of a button's busy indicator.
pub enum LoadingSource {
    /// The orchestrator tracks busy state around handler runs.
    #[default]
    Internal,
    /// The caller drives the flag; the orchestrator never touches it.
    External(Rc<dyn Fn() -> bool>),
}

impl LoadingSource {
    /// Caller-controlled loading flag read through `reader`.
    pub fn external(reader: impl Fn() -> bool + 'static) -> Self {
        Self::External(Rc::new(reader))
    }

    /// Whether the caller owns the flag.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

impl fmt::Debug for LoadingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => f.write_str("Internal"),
            Self::External(_) => f.write_str("External"),
        }
    }
}

#[derive(Debug, Clone)]
/// One dialog footer button.
pub struct DialogButton {
    /// Button label.
    pub label: String,
    /// Visual emphasis.
    pub emphasis: ButtonEmphasis,
    /// Optional click handler.
    pub on_click: Option<ClickHandler>,
    /// Busy-state owner.
    pub loading: LoadingSource,
}

impl DialogButton {
    /// Creates a button with no handler and internal loading.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            emphasis: ButtonEmphasis::Standard,
            on_click: None,
            loading: LoadingSource::Internal,
        }
    }

    /// Sets the emphasis.
    pub fn emphasis(mut self, emphasis: ButtonEmphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Attaches a synchronous handler.
    pub fn on_click(mut self, handler: impl Fn() -> Result<(), HandlerError> + 'static) -> Self {
        self.on_click = Some(ClickHandler::sync(handler));
        self
    }

    /// Attaches an asynchronous handler.
    pub fn on_click_async<Fut>(mut self, handler: impl Fn() -> Fut + 'static) -> Self
    where
        Fut: Future<Output = Result<(), HandlerError>> + 'static,
    {
        self.on_click = Some(ClickHandler::future(handler));
        self
    }

    /// Hands busy-state ownership to the caller.
    pub fn loading(mut self, reader: impl Fn() -> bool + 'static) -> Self {
        self.loading = LoadingSource::external(reader);
        self
    }
}

#[derive(Debug, Clone)]
/// Active dialog configuration.
pub struct DialogConfig<F> {
    /// Heading text.
    pub title: String,
    /// Optional line under the heading.
    pub subtitle: Option<String>,
    /// Width class.
    pub size: DialogSize,
    /// Opaque body content.
    pub form: Option<F>,
    /// Cancel button.
    pub cancel_button: Option<DialogButton>,
    /// Middle button.
    pub middle_button: Option<DialogButton>,
    /// Action button.
    pub action_button: Option<DialogButton>,
}

impl<F> Default for DialogConfig<F> {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: None,
            size: DialogSize::Md,
            form: None,
            cancel_button: None,
            middle_button: None,
            action_button: None,
        }
    }
}

impl<F> DialogConfig<F> {
    /// Creates a config with a title and nothing else.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the subtitle.
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Sets the width class.
    pub fn size(mut self, size: DialogSize) -> Self {
        self.size = size;
        self
    }

    /// Sets the body content.
    pub fn form(mut self, form: F) -> Self {
        self.form = Some(form);
        self
    }

    /// Sets the cancel button.
    pub fn cancel(mut self, button: DialogButton) -> Self {
        self.cancel_button = Some(button);
        self
    }

    /// Sets the middle button.
    pub fn middle(mut self, button: DialogButton) -> Self {
        self.middle_button = Some(button);
        self
    }

    /// Sets the action button.
    pub fn action(mut self, button: DialogButton) -> Self {
        self.action_button = Some(button);
        self
    }

    /// Button configured for `role`.
    pub fn button(&self, role: ButtonRole) -> Option<&DialogButton> {
        match role {
            ButtonRole::Cancel => self.cancel_button.as_ref(),
            ButtonRole::Middle => self.middle_button.as_ref(),
            ButtonRole::Action => self.action_button.as_ref(),
        }
    }

    /// Shallow merge: every field present in `patch` replaces this config's field.
    pub fn merged(&self, patch: DialogPatch<F>) -> Self
    where
        F: Clone,
    {
        Self {
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            subtitle: patch.subtitle.or_else(|| self.subtitle.clone()),
            size: patch.size.unwrap_or(self.size),
            form: patch.form.or_else(|| self.form.clone()),
            cancel_button: patch.cancel_button.or_else(|| self.cancel_button.clone()),
            middle_button: patch.middle_button.or_else(|| self.middle_button.clone()),
            action_button: patch.action_button.or_else(|| self.action_button.clone()),
        }
    }
}

#[derive(Debug, Clone)]
/// Per-open override. Present fields replace the base config's fields.
pub struct DialogPatch<F> {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement subtitle.
    pub subtitle: Option<String>,
    /// Replacement width class.
    pub size: Option<DialogSize>,
    /// Replacement body content.
    pub form: Option<F>,
    /// Replacement cancel button.
    pub cancel_button: Option<DialogButton>,
    /// Replacement middle button.
    pub middle_button: Option<DialogButton>,
    /// Replacement action button.
    pub action_button: Option<DialogButton>,
}

impl<F> Default for DialogPatch<F> {
    fn default() -> Self {
        Self {
            title: None,
            subtitle: None,
            size: None,
            form: None,
            cancel_button: None,
            middle_button: None,
            action_button: None,
        }
    }
}

impl<F> DialogPatch<F> {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Overrides the subtitle.
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Overrides the width class.
    pub fn size(mut self, size: DialogSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Overrides the body content.
    pub fn form(mut self, form: F) -> Self {
        self.form = Some(form);
        self
    }

    /// Overrides the cancel button.
    pub fn cancel(mut self, button: DialogButton) -> Self {
        self.cancel_button = Some(button);
        self
    }

    /// Overrides the middle button.
    pub fn middle(mut self, button: DialogButton) -> Self {
        self.middle_button = Some(button);
        self
    }

    /// Overrides the action button.
    pub fn action(mut self, button: DialogButton) -> Self {
        self.action_button = Some(button);
        self
    }

    /// Converts the patch into a standalone config, used when no base config exists.
    pub fn into_config(self) -> DialogConfig<F> {
        DialogConfig {
            title: self.title.unwrap_or_default(),
            subtitle: self.subtitle,
            size: self.size.unwrap_or_default(),
            form: self.form,
            cancel_button: self.cancel_button,
            middle_button: self.middle_button,
            action_button: self.action_button,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Internal busy flags, one per button.
pub struct ButtonFlags {
    /// Cancel button busy.
    pub cancel: bool,
    /// Middle button busy.
    pub middle: bool,
    /// Action button busy.
    pub action: bool,
}

impl ButtonFlags {
    /// Flag for `role`.
    pub fn get(&self, role: ButtonRole) -> bool {
        match role {
            ButtonRole::Cancel => self.cancel,
            ButtonRole::Middle => self.middle,
            ButtonRole::Action => self.action,
        }
    }

    /// Sets the flag for `role`.
    pub fn set(&mut self, role: ButtonRole, value: bool) {
        match role {
            ButtonRole::Cancel => self.cancel = value,
            ButtonRole::Middle => self.middle = value,
            ButtonRole::Action => self.action = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Coarse dialog phase.
pub enum DialogPhase {
    /// Dialog is closed (its config may still be live during the close delay).
    Closed,
    /// Dialog is open and no handler is running.
    OpenIdle,
    /// Dialog is open and a handler for the given button is running.
    OpenBusy(ButtonRole),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors returned by [`reduce_dialog`].
pub enum DialogError {
    /// `open` was called without a base config or an override.
    #[error("dialog opened without a base config or an override")]
    MissingConfig,
    /// A button was clicked while the dialog was closed.
    #[error("dialog is not open")]
    NotOpen,
    /// A button was clicked that the active config does not define.
    #[error("dialog has no {0} button")]
    MissingButton(ButtonRole),
}

#[derive(Debug, Clone)]
/// Per-dialog orchestration state.
pub struct DialogState<F> {
    base: Option<DialogConfig<F>>,
    active: Option<DialogConfig<F>>,
    open: bool,
    busy: ButtonFlags,
    in_flight: Option<ButtonRole>,
    session: u64,
    close_ticket: u64,
    close_delay: Duration,
}

impl<F> DialogState<F> {
    /// Creates a closed dialog. The active config starts as the base config.
    pub fn new(base: Option<DialogConfig<F>>, close_delay: Duration) -> Self
    where
        F: Clone,
    {
        Self {
            active: base.clone(),
            base,
            open: false,
            busy: ButtonFlags::default(),
            in_flight: None,
            session: 0,
            close_ticket: 0,
            close_delay,
        }
    }

    /// Whether the dialog is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Active config, if any.
    pub fn config(&self) -> Option<&DialogConfig<F>> {
        self.active.as_ref()
    }

    /// Base config bound at setup time.
    pub fn base(&self) -> Option<&DialogConfig<F>> {
        self.base.as_ref()
    }

    /// Internal busy flags.
    pub fn busy_flags(&self) -> ButtonFlags {
        self.busy
    }

    /// Button whose handler is currently running.
    pub fn in_flight(&self) -> Option<ButtonRole> {
        self.in_flight
    }

    /// Open-session counter; incremented on every open.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Close-to-reset delay.
    pub fn close_delay(&self) -> Duration {
        self.close_delay
    }

    /// Coarse phase.
    pub fn phase(&self) -> DialogPhase {
        match (self.open, self.in_flight) {
            (false, _) => DialogPhase::Closed,
            (true, None) => DialogPhase::OpenIdle,
            (true, Some(role)) => DialogPhase::OpenBusy(role),
        }
    }

    /// Rendered loading state for `role`: the caller's flag when externally controlled,
    /// otherwise the internal busy flag.
    pub fn is_loading(&self, role: ButtonRole) -> bool {
        match self.button(role).map(|button| &button.loading) {
            Some(LoadingSource::External(reader)) => reader(),
            _ => self.busy.get(role),
        }
    }

    /// Whether `role` should render disabled: it is loading, or another button's handler runs.
    /// Cancel stays enabled so it can abandon a running handler.
    pub fn is_disabled(&self, role: ButtonRole) -> bool {
        self.is_loading(role)
            || (role != ButtonRole::Cancel
                && self.in_flight.is_some_and(|running| running != role))
    }

    fn button(&self, role: ButtonRole) -> Option<&DialogButton> {
        self.active.as_ref().and_then(|config| config.button(role))
    }

    fn loading_is_external(&self, role: ButtonRole) -> bool {
        self.button(role)
            .is_some_and(|button| button.loading.is_external())
    }
}

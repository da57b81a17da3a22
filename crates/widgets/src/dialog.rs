//! Dialog orchestration hook.
//!
//! [`use_dialog`] keeps a [`DialogState`] in a signal, routes every interaction through
//! [`reduce_dialog`], and drains the emitted [`DialogEffect`] queue: close-delay timers go to
//! the browser timer host, handlers run on the local executor and report back with
//! [`DialogAction::Settle`], and failures are logged.

use std::{
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use leptos::*;
use system_ui::{Button, ButtonVariant, Modal, ModalSize};
use widget_state::{
    reduce_dialog, ButtonEmphasis, ButtonRole, DialogAction, DialogConfig, DialogEffect,
    DialogPatch, DialogPhase, DialogSize, DialogState, TimerHost,
};
use widget_state_web::{BrowserTimeout, BrowserTimerHost};

use crate::config::use_widget_config;

static NEXT_DIALOG_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone)]
/// Form body rendered inside a dialog.
///
/// Two forms are equal only when they share the same render function, so the body is rebuilt
/// when a different form is opened and left alone while busy flags change.
pub struct DialogForm(Rc<dyn Fn() -> View>);

impl DialogForm {
    /// Wraps a view-producing function.
    pub fn new<V: IntoView>(render: impl Fn() -> V + 'static) -> Self {
        Self(Rc::new(move || render().into_view()))
    }

    fn render(&self) -> View {
        (self.0)()
    }
}

impl PartialEq for DialogForm {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DialogForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DialogForm")
    }
}

#[derive(Clone, Copy)]
/// Handle returned by [`use_dialog`].
pub struct DialogHandle {
    state: RwSignal<DialogState<DialogForm>>,
    effects: RwSignal<Vec<DialogEffect>>,
    timers: StoredValue<BrowserTimerHost>,
    reset_timer: StoredValue<Option<BrowserTimeout>>,
}

impl DialogHandle {
    /// Opens the dialog, shallow-merging `patch` onto the base config.
    pub fn open_dialog(self, patch: Option<DialogPatch<DialogForm>>) {
        self.dispatch_action(DialogAction::Open(patch));
    }

    /// Closes the dialog. The config is reset to the base once the close delay elapses.
    pub fn close_dialog(self) {
        self.dispatch_action(DialogAction::RequestClose);
    }

    /// Sets the internal busy flag of `role`. Ignored for externally controlled buttons.
    pub fn set_loading(self, role: ButtonRole, busy: bool) {
        self.dispatch_action(DialogAction::SetLoading { role, busy });
    }

    /// Runs the click path of a footer button.
    pub fn click(self, role: ButtonRole) {
        self.dispatch_action(DialogAction::Click(role));
    }

    /// Whether the dialog is open. Tracked.
    pub fn is_open(self) -> bool {
        self.state.with(DialogState::is_open)
    }

    /// Current phase. Tracked.
    pub fn phase(self) -> DialogPhase {
        self.state.with(DialogState::phase)
    }

    /// Rendered loading state of `role`. Tracked.
    pub fn is_loading(self, role: ButtonRole) -> bool {
        self.state.with(|state| state.is_loading(role))
    }

    /// Renders the dialog.
    pub fn view(self) -> impl IntoView {
        view! { <DialogHost dialog=self /> }
    }

    /// Applies `action` through the reducer and queues the resulting effects.
    pub fn dispatch_action(self, action: DialogAction<DialogForm>) {
        // Handler futures may settle after the owning view is gone.
        let Some(mut state) = self.state.try_get_untracked() else {
            return;
        };

        match reduce_dialog(&mut state, action) {
            Ok(new_effects) => {
                self.state.set(state);
                if !new_effects.is_empty() {
                    self.effects.update(|queue| queue.extend(new_effects));
                }
            }
            Err(err) => logging::warn!("dialog reducer error: {err}"),
        }
    }

    fn run_effect(self, effect: DialogEffect) {
        match effect {
            DialogEffect::ScheduleConfigReset { ticket, delay } => {
                let handle = self.timers.with_value(|timers| {
                    timers.schedule(
                        delay,
                        Box::new(move || self.dispatch_action(DialogAction::FinishClose { ticket })),
                    )
                });
                // Replacing the slot drops and clears any earlier reset.
                self.reset_timer.set_value(Some(handle));
            }
            DialogEffect::RunHandler {
                role,
                session,
                handler,
            } => spawn_local(async move {
                let outcome = handler.run().await;
                self.dispatch_action(DialogAction::Settle {
                    role,
                    session,
                    outcome,
                });
            }),
            DialogEffect::ReportHandlerError { role, error } => {
                logging::warn!("dialog {role} handler failed: {error}");
            }
            DialogEffect::ClickRejected { role, in_flight } => {
                logging::debug_warn!("dialog {role} click ignored while {in_flight} handler runs");
            }
        }
    }
}

fn install_effect_executor(dialog: DialogHandle) {
    create_effect(move |_| {
        let queued = dialog.effects.get();
        if queued.is_empty() {
            return;
        }

        dialog.effects.set(Vec::new());

        for effect in queued {
            dialog.run_effect(effect);
        }
    });
}

/// Creates a dialog bound to the current reactive owner.
///
/// `base` is the config every open starts from; pass `None` to supply the whole config through
/// [`DialogHandle::open_dialog`]. The close delay comes from the provided
/// [`widget_state::WidgetConfig`].
pub fn use_dialog(base: Option<DialogConfig<DialogForm>>) -> DialogHandle {
    let config = use_widget_config();
    let state = create_rw_signal(DialogState::new(base, config.dialog_close_delay()));
    let effects = create_rw_signal(Vec::<DialogEffect>::new());
    let timers = store_value(
        BrowserTimerHost::new()
            .with_error_reporter(|err| logging::warn!("dialog timer error: {err}")),
    );
    let reset_timer = store_value(None::<BrowserTimeout>);

    let dialog = DialogHandle {
        state,
        effects,
        timers,
        reset_timer,
    };

    install_effect_executor(dialog);
    on_cleanup(move || {
        reset_timer.try_update_value(|slot| slot.take());
    });

    dialog
}

#[component]
/// Renders a [`DialogHandle`] as a modal with its form body and footer buttons.
///
/// Escape and backdrop clicks close the dialog the same way the cancel path does.
pub fn DialogHost(
    dialog: DialogHandle,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional)] layout_class: Option<&'static str>,
) -> impl IntoView {
    let state = dialog.state;
    let id = id.unwrap_or_else(|| {
        format!(
            "widget-dialog-{}",
            NEXT_DIALOG_ID.fetch_add(1, Ordering::Relaxed)
        )
    });

    let open = Signal::derive(move || state.with(DialogState::is_open));
    let title = Signal::derive(move || {
        state.with(|state| {
            state
                .config()
                .map(|config| config.title.clone())
                .unwrap_or_default()
        })
    });
    let subtitle = Signal::derive(move || {
        state.with(|state| {
            state
                .config()
                .and_then(|config| config.subtitle.clone())
                .unwrap_or_default()
        })
    });
    let size = Signal::derive(move || {
        state.with(|state| modal_size(state.config().map(|config| config.size).unwrap_or_default()))
    });
    let form = create_memo(move |_| {
        state.with(|state| state.config().and_then(|config| config.form.clone()))
    });

    let footer: ChildrenFn = Rc::new(move || {
        Fragment::new(
            ButtonRole::ALL
                .into_iter()
                .map(|role| view! { <DialogFooterButton dialog=dialog role=role /> }.into_view())
                .collect(),
        )
    });

    view! {
        <Modal
            open=open
            size=size
            title=title
            subtitle=subtitle
            id=id
            layout_class=layout_class.unwrap_or("")
            on_dismiss=Callback::new(move |()| dialog.close_dialog())
            footer=footer
        >
            {move || form.get().map(|form| form.render())}
        </Modal>
    }
}

#[component]
fn DialogFooterButton(dialog: DialogHandle, role: ButtonRole) -> impl IntoView {
    let state = dialog.state;
    let button = create_memo(move |_| {
        state.with(|state| {
            state
                .config()
                .and_then(|config| config.button(role))
                .map(|button| (button.label.clone(), button.emphasis))
        })
    });
    let busy = Signal::derive(move || state.with(|state| state.is_loading(role)));
    let disabled = Signal::derive(move || state.with(|state| state.is_disabled(role)));

    move || {
        button.get().map(|(label, emphasis)| {
            view! {
                <Button
                    variant=button_variant(emphasis)
                    ui_slot=role.token()
                    busy=busy
                    disabled=disabled
                    on_click=Callback::new(move |_| dialog.click(role))
                >
                    {label}
                </Button>
            }
        })
    }
}

fn button_variant(emphasis: ButtonEmphasis) -> ButtonVariant {
    match emphasis {
        ButtonEmphasis::Standard => ButtonVariant::Standard,
        ButtonEmphasis::Primary => ButtonVariant::Primary,
        ButtonEmphasis::Secondary => ButtonVariant::Secondary,
        ButtonEmphasis::Quiet => ButtonVariant::Quiet,
        ButtonEmphasis::Danger => ButtonVariant::Danger,
    }
}

fn modal_size(size: DialogSize) -> ModalSize {
    match size {
        DialogSize::Sm => ModalSize::Sm,
        DialogSize::Md => ModalSize::Md,
        DialogSize::Lg => ModalSize::Lg,
        DialogSize::Xl => ModalSize::Xl,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_state::DialogButton;

    use super::*;

    fn base() -> DialogConfig<DialogForm> {
        DialogConfig::new("Invite member")
            .cancel(DialogButton::new("Cancel"))
            .action(DialogButton::new("Send").emphasis(ButtonEmphasis::Primary))
    }

    fn active_title(dialog: DialogHandle) -> Option<String> {
        dialog
            .state
            .with_untracked(|state| state.config().map(|config| config.title.clone()))
    }

    #[test]
    fn emphasis_maps_onto_button_variants() {
        assert_eq!(button_variant(ButtonEmphasis::Danger), ButtonVariant::Danger);
        assert_eq!(button_variant(ButtonEmphasis::Quiet), ButtonVariant::Quiet);
        assert_eq!(button_variant(ButtonEmphasis::default()), ButtonVariant::Standard);
        assert_eq!(modal_size(DialogSize::Sm), ModalSize::Sm);
        assert_eq!(modal_size(DialogSize::default()), ModalSize::Md);
        assert_eq!(modal_size(DialogSize::Lg), ModalSize::Lg);
        assert_eq!(modal_size(DialogSize::Xl), ModalSize::Xl);
    }

    #[test]
    fn open_applies_override_and_close_keeps_config_until_reset() {
        let runtime = create_runtime();

        let dialog = use_dialog(Some(base()));
        assert!(!dialog.is_open());

        dialog.open_dialog(Some(DialogPatch::new().title("Invite admin")));
        assert!(dialog.is_open());
        assert_eq!(active_title(dialog).as_deref(), Some("Invite admin"));

        dialog.close_dialog();
        assert!(!dialog.is_open());
        assert_eq!(active_title(dialog).as_deref(), Some("Invite admin"));

        runtime.dispose();
    }

    #[test]
    fn opening_without_any_config_stays_closed() {
        let runtime = create_runtime();

        let dialog = use_dialog(None);
        dialog.open_dialog(None);

        assert!(!dialog.is_open());
        assert_eq!(dialog.phase(), DialogPhase::Closed);

        runtime.dispose();
    }

    #[test]
    fn manual_loading_sets_the_internal_flag() {
        let runtime = create_runtime();

        let dialog = use_dialog(Some(base()));
        dialog.open_dialog(None);
        dialog.set_loading(ButtonRole::Action, true);

        assert!(dialog.is_loading(ButtonRole::Action));
        assert!(!dialog.is_loading(ButtonRole::Cancel));

        runtime.dispose();
    }
}

//! Dialog actions, side-effect intents, and transition logic.

use std::time::Duration;

use super::{
    ButtonFlags, ButtonRole, ClickHandler, DialogError, DialogPatch, DialogState, HandlerError,
};

#[derive(Debug, Clone)]
/// Actions accepted by [`reduce_dialog`].
pub enum DialogAction<F> {
    /// Open the dialog, shallow-merging the optional override onto the base config.
    Open(Option<DialogPatch<F>>),
    /// Close the dialog now and schedule the config reset.
    RequestClose,
    /// Deferred config reset after the close delay.
    FinishClose {
        /// Ticket issued by the matching [`DialogEffect::ScheduleConfigReset`].
        ticket: u64,
    },
    /// A footer button was clicked.
    Click(ButtonRole),
    /// A handler started by [`DialogEffect::RunHandler`] finished.
    Settle {
        /// Button whose handler finished.
        role: ButtonRole,
        /// Open session the handler started in.
        session: u64,
        /// Handler result.
        outcome: Result<(), HandlerError>,
    },
    /// Manually set a button's internal busy flag.
    SetLoading {
        /// Target button.
        role: ButtonRole,
        /// New flag value.
        busy: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_dialog`] for the UI binding to execute.
pub enum DialogEffect {
    /// Dispatch [`DialogAction::FinishClose`] with `ticket` after `delay`.
    ScheduleConfigReset {
        /// Reset ticket.
        ticket: u64,
        /// Delay before the reset.
        delay: Duration,
    },
    /// Run `handler`, then dispatch [`DialogAction::Settle`] with its outcome.
    RunHandler {
        /// Button being handled.
        role: ButtonRole,
        /// Session to report back in `Settle`.
        session: u64,
        /// Handler to run.
        handler: ClickHandler,
    },
    /// A handler failed; the binding logs it.
    ReportHandlerError {
        /// Button whose handler failed.
        role: ButtonRole,
        /// Handler error.
        error: HandlerError,
    },
    /// A click was ignored because another handler is still running.
    ClickRejected {
        /// Clicked button.
        role: ButtonRole,
        /// Button whose handler is running.
        in_flight: ButtonRole,
    },
}

/// Applies `action` to `state` and returns the effects to execute.
///
/// # Errors
///
/// Returns [`DialogError::MissingConfig`] when opening with neither a base config nor an
/// override, [`DialogError::NotOpen`] for clicks on a closed dialog, and
/// [`DialogError::MissingButton`] for clicks on a button the active config does not define.
pub fn reduce_dialog<F: Clone>(
    state: &mut DialogState<F>,
    action: DialogAction<F>,
) -> Result<Vec<DialogEffect>, DialogError> {
    let mut effects = Vec::new();

    match action {
        DialogAction::Open(patch) => {
            let config = match (state.base.as_ref(), patch) {
                (Some(base), Some(patch)) => base.merged(patch),
                (Some(base), None) => base.clone(),
                (None, Some(patch)) => patch.into_config(),
                (None, None) => return Err(DialogError::MissingConfig),
            };
            state.active = Some(config);
            state.open = true;
            state.session += 1;
            // A reset still pending from an earlier close must not clear this config.
            state.close_ticket += 1;
            state.busy = ButtonFlags::default();
            state.in_flight = None;
        }
        DialogAction::RequestClose => close(state, &mut effects),
        DialogAction::FinishClose { ticket } => {
            if ticket == state.close_ticket && !state.open {
                state.active = state.base.clone();
                state.busy = ButtonFlags::default();
                state.in_flight = None;
            }
        }
        DialogAction::Click(role) => {
            if !state.open {
                return Err(DialogError::NotOpen);
            }
            let Some(button) = state.button(role) else {
                return Err(DialogError::MissingButton(role));
            };
            if let Some(running) = state.in_flight {
                if role == ButtonRole::Cancel && running != ButtonRole::Cancel {
                    // Cancel abandons the running handler; its settle lands in an ended session.
                    state.session += 1;
                    state.busy = ButtonFlags::default();
                    state.in_flight = None;
                    close(state, &mut effects);
                    return Ok(effects);
                }
                effects.push(DialogEffect::ClickRejected {
                    role,
                    in_flight: running,
                });
                return Ok(effects);
            }

            let external = button.loading.is_external();
            match button.on_click.clone() {
                Some(handler) => {
                    if !external {
                        state.busy.set(role, true);
                    }
                    state.in_flight = Some(role);
                    effects.push(DialogEffect::RunHandler {
                        role,
                        session: state.session,
                        handler,
                    });
                }
                None => match role {
                    ButtonRole::Cancel | ButtonRole::Action => close(state, &mut effects),
                    ButtonRole::Middle => {}
                },
            }
        }
        DialogAction::Settle {
            role,
            session,
            outcome,
        } => {
            if session != state.session {
                // Session already ended; the handler only gets its error logged.
                if let Err(error) = outcome {
                    effects.push(DialogEffect::ReportHandlerError { role, error });
                }
                return Ok(effects);
            }

            if state.in_flight == Some(role) {
                state.in_flight = None;
            }
            if !state.loading_is_external(role) {
                state.busy.set(role, false);
            }

            match outcome {
                Ok(()) => close(state, &mut effects),
                Err(error) => {
                    effects.push(DialogEffect::ReportHandlerError { role, error });
                    if role == ButtonRole::Cancel {
                        close(state, &mut effects);
                    }
                }
            }
        }
        DialogAction::SetLoading { role, busy } => {
            if !state.loading_is_external(role) {
                state.busy.set(role, busy);
            }
        }
    }

    Ok(effects)
}

fn close<F>(state: &mut DialogState<F>, effects: &mut Vec<DialogEffect>) {
    if !state.open {
        return;
    }
    state.open = false;
    state.close_ticket += 1;
    effects.push(DialogEffect::ScheduleConfigReset {
        ticket: state.close_ticket,
        delay: state.close_delay,
    });
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dialog::{
        ButtonEmphasis, DialogButton, DialogConfig, DialogPhase, DialogSize, HandlerInvocation,
    };

    const DELAY: Duration = Duration::from_millis(300);

    type Form = &'static str;

    fn base() -> DialogConfig<Form> {
        DialogConfig::new("Delete project")
            .subtitle("This cannot be undone")
            .size(DialogSize::Sm)
            .form("base-form")
            .cancel(DialogButton::new("Cancel"))
            .action(DialogButton::new("Delete").emphasis(ButtonEmphasis::Danger))
    }

    fn opened(config: DialogConfig<Form>) -> DialogState<Form> {
        let mut state = DialogState::new(Some(config), DELAY);
        reduce_dialog(&mut state, DialogAction::Open(None)).expect("open");
        state
    }

    fn run_handler_effect(effects: &[DialogEffect]) -> (ButtonRole, u64, ClickHandler) {
        match effects {
            [DialogEffect::RunHandler {
                role,
                session,
                handler,
            }] => (*role, *session, handler.clone()),
            other => panic!("expected a single RunHandler effect, got {other:?}"),
        }
    }

    /// Runs a click through the reducer and the handler, the way the UI binding does.
    fn click_and_settle(state: &mut DialogState<Form>, role: ButtonRole) -> Vec<DialogEffect> {
        let effects = reduce_dialog(state, DialogAction::Click(role)).expect("click");
        let (role, session, handler) = run_handler_effect(&effects);
        let outcome = block_on(handler.run());
        reduce_dialog(
            state,
            DialogAction::Settle {
                role,
                session,
                outcome,
            },
        )
        .expect("settle")
    }

    #[test]
    fn open_override_shallow_merges_onto_base() {
        let mut state = DialogState::new(Some(base()), DELAY);
        reduce_dialog(
            &mut state,
            DialogAction::Open(Some(DialogPatch::new().title("Archive project"))),
        )
        .expect("open");

        let config = state.config().expect("config");
        assert_eq!(config.title, "Archive project");
        assert_eq!(config.subtitle.as_deref(), Some("This cannot be undone"));
        assert_eq!(config.size, DialogSize::Sm);
        assert_eq!(config.form, Some("base-form"));
        assert_eq!(
            config.action_button.as_ref().map(|b| b.label.as_str()),
            Some("Delete")
        );
        assert!(state.is_open());
    }

    #[test]
    fn override_without_base_becomes_config() {
        let mut state = DialogState::<Form>::new(None, DELAY);
        reduce_dialog(
            &mut state,
            DialogAction::Open(Some(
                DialogPatch::new()
                    .title("Invite")
                    .action(DialogButton::new("Send")),
            )),
        )
        .expect("open");

        let config = state.config().expect("config");
        assert_eq!(config.title, "Invite");
        assert_eq!(config.size, DialogSize::Md);
        assert!(config.cancel_button.is_none());
    }

    #[test]
    fn open_without_any_config_is_an_error() {
        let mut state = DialogState::<Form>::new(None, DELAY);
        assert_eq!(
            reduce_dialog(&mut state, DialogAction::Open(None)).unwrap_err(),
            DialogError::MissingConfig
        );
        assert!(!state.is_open());
    }

    #[test]
    fn close_is_immediate_but_config_reset_is_deferred() {
        let mut state = DialogState::new(Some(base()), DELAY);
        reduce_dialog(
            &mut state,
            DialogAction::Open(Some(DialogPatch::new().form("override-form"))),
        )
        .expect("open");

        let effects = reduce_dialog(&mut state, DialogAction::RequestClose).expect("close");
        assert!(!state.is_open());
        assert_eq!(state.phase(), DialogPhase::Closed);
        assert_eq!(state.config().and_then(|c| c.form), Some("override-form"));

        let ticket = match effects.as_slice() {
            [DialogEffect::ScheduleConfigReset { ticket, delay }] => {
                assert_eq!(*delay, DELAY);
                *ticket
            }
            other => panic!("unexpected effects {other:?}"),
        };
        reduce_dialog(&mut state, DialogAction::FinishClose { ticket }).expect("finish");
        assert_eq!(state.config().and_then(|c| c.form), Some("base-form"));
    }

    #[test]
    fn config_reset_clears_to_none_without_base() {
        let mut state = DialogState::<Form>::new(None, DELAY);
        reduce_dialog(
            &mut state,
            DialogAction::Open(Some(DialogPatch::new().title("Temp"))),
        )
        .expect("open");
        let effects = reduce_dialog(&mut state, DialogAction::RequestClose).expect("close");
        let [DialogEffect::ScheduleConfigReset { ticket, .. }] = effects.as_slice() else {
            panic!("expected reset effect");
        };
        reduce_dialog(&mut state, DialogAction::FinishClose { ticket: *ticket }).expect("finish");
        assert!(state.config().is_none());
    }

    #[test]
    fn reopening_during_close_delay_invalidates_pending_reset() {
        let mut state = opened(base());
        let effects = reduce_dialog(&mut state, DialogAction::RequestClose).expect("close");
        let [DialogEffect::ScheduleConfigReset { ticket, .. }] = effects.as_slice() else {
            panic!("expected reset effect");
        };
        let stale = *ticket;

        reduce_dialog(
            &mut state,
            DialogAction::Open(Some(DialogPatch::new().title("Again"))),
        )
        .expect("reopen");
        reduce_dialog(&mut state, DialogAction::FinishClose { ticket: stale }).expect("finish");

        assert!(state.is_open());
        assert_eq!(state.config().map(|c| c.title.as_str()), Some("Again"));
    }

    #[test]
    fn action_without_handler_closes_and_middle_without_handler_is_noop() {
        let mut state = opened(base().middle(DialogButton::new("Later")));

        let effects = reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Middle))
            .expect("middle");
        assert!(effects.is_empty());
        assert!(state.is_open());

        let effects = reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Action))
            .expect("action");
        assert!(!state.is_open());
        assert!(matches!(
            effects.as_slice(),
            [DialogEffect::ScheduleConfigReset { .. }]
        ));
    }

    #[test]
    fn async_handler_marks_button_busy_until_settle_then_closes() {
        let mut state = opened(base().action(
            DialogButton::new("Save").on_click_async(|| async { Ok::<(), HandlerError>(()) }),
        ));

        let effects =
            reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Action)).expect("click");
        let (role, session, handler) = run_handler_effect(&effects);
        assert!(handler.is_async());
        assert_eq!(state.phase(), DialogPhase::OpenBusy(ButtonRole::Action));
        assert!(state.is_loading(ButtonRole::Action));

        let outcome = block_on(handler.run());
        let effects = reduce_dialog(
            &mut state,
            DialogAction::Settle {
                role,
                session,
                outcome,
            },
        )
        .expect("settle");

        assert!(!state.is_open());
        assert!(!state.busy_flags().action);
        assert!(matches!(
            effects.as_slice(),
            [DialogEffect::ScheduleConfigReset { .. }]
        ));
    }

    #[test]
    fn failing_handler_keeps_dialog_open_and_clears_busy() {
        let mut state = opened(base().action(
            DialogButton::new("Save")
                .on_click_async(|| async { Err::<(), _>(HandlerError::new("network down")) }),
        ));

        let effects = click_and_settle(&mut state, ButtonRole::Action);

        assert!(state.is_open());
        assert!(!state.busy_flags().action);
        assert_eq!(state.phase(), DialogPhase::OpenIdle);
        assert_eq!(
            effects,
            vec![DialogEffect::ReportHandlerError {
                role: ButtonRole::Action,
                error: HandlerError::new("network down"),
            }]
        );
    }

    #[test]
    fn cancel_closes_even_when_its_handler_fails() {
        let calls = Rc::new(Cell::new(0));
        let counted = Rc::clone(&calls);
        let mut state = opened(base().cancel(DialogButton::new("Cancel").on_click(move || {
            counted.set(counted.get() + 1);
            Err("cleanup failed".into())
        })));

        let effects = click_and_settle(&mut state, ButtonRole::Cancel);

        assert_eq!(calls.get(), 1);
        assert!(!state.is_open());
        assert!(matches!(
            effects.as_slice(),
            [
                DialogEffect::ReportHandlerError { .. },
                DialogEffect::ScheduleConfigReset { .. }
            ]
        ));
    }

    #[test]
    fn sync_handler_runs_ready() {
        let handler = ClickHandler::sync(|| Ok(()));
        assert!(matches!(handler.invoke(), HandlerInvocation::Ready(Ok(()))));
    }

    #[test]
    fn externally_controlled_loading_never_sets_internal_flag() {
        let external = Rc::new(Cell::new(true));
        let reader = Rc::clone(&external);
        let mut state = opened(
            base().action(
                DialogButton::new("Save")
                    .loading(move || reader.get())
                    .on_click_async(|| async { Ok::<(), HandlerError>(()) }),
            ),
        );

        reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Action)).expect("click");
        assert!(!state.busy_flags().action);
        assert!(state.is_loading(ButtonRole::Action));

        reduce_dialog(
            &mut state,
            DialogAction::SetLoading {
                role: ButtonRole::Action,
                busy: true,
            },
        )
        .expect("set loading");
        assert!(!state.busy_flags().action);

        external.set(false);
        assert!(!state.is_loading(ButtonRole::Action));
    }

    #[test]
    fn second_click_while_handler_runs_is_rejected() {
        let mut state = opened(
            base()
                .middle(
                    DialogButton::new("Draft")
                        .on_click_async(|| async { Ok::<(), HandlerError>(()) }),
                )
                .action(
                    DialogButton::new("Publish")
                        .on_click_async(|| async { Ok::<(), HandlerError>(()) }),
                ),
        );

        reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Middle)).expect("middle");
        let effects =
            reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Action)).expect("action");

        assert_eq!(
            effects,
            vec![DialogEffect::ClickRejected {
                role: ButtonRole::Action,
                in_flight: ButtonRole::Middle,
            }]
        );
        assert!(!state.busy_flags().action);
        assert!(state.is_disabled(ButtonRole::Action));
        assert!(!state.is_disabled(ButtonRole::Cancel));
        assert!(!state.is_disabled(ButtonRole::Middle));
    }

    #[test]
    fn cancel_closes_while_another_handler_runs() {
        let mut state = opened(base().action(
            DialogButton::new("Save").on_click_async(|| async {
                Err::<(), HandlerError>(HandlerError::new("server down"))
            }),
        ));
        let effects =
            reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Action)).expect("action");
        let (role, session, handler) = run_handler_effect(&effects);

        let effects =
            reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Cancel)).expect("cancel");
        assert_eq!(
            effects,
            vec![DialogEffect::ScheduleConfigReset {
                ticket: state.close_ticket,
                delay: DELAY,
            }]
        );
        assert_eq!(state.phase(), DialogPhase::Closed);
        assert!(!state.busy_flags().action);

        let outcome = block_on(handler.run());
        let effects = reduce_dialog(
            &mut state,
            DialogAction::Settle {
                role,
                session,
                outcome,
            },
        )
        .expect("late settle");
        assert!(matches!(
            effects.as_slice(),
            [DialogEffect::ReportHandlerError { role: ButtonRole::Action, .. }]
        ));
        assert_eq!(state.phase(), DialogPhase::Closed);
    }

    #[test]
    fn settle_from_previous_session_does_not_close_new_session() {
        let mut state = opened(base().action(
            DialogButton::new("Save").on_click_async(|| async { Ok::<(), HandlerError>(()) }),
        ));
        let effects =
            reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Action)).expect("click");
        let (role, old_session, _) = run_handler_effect(&effects);

        reduce_dialog(&mut state, DialogAction::RequestClose).expect("close");
        reduce_dialog(&mut state, DialogAction::Open(None)).expect("reopen");

        let effects = reduce_dialog(
            &mut state,
            DialogAction::Settle {
                role,
                session: old_session,
                outcome: Ok(()),
            },
        )
        .expect("settle");

        assert!(effects.is_empty());
        assert!(state.is_open());
    }

    #[test]
    fn manual_loading_setter_drives_internal_flag() {
        let mut state = opened(base());
        reduce_dialog(
            &mut state,
            DialogAction::SetLoading {
                role: ButtonRole::Action,
                busy: true,
            },
        )
        .expect("set loading");
        assert!(state.is_loading(ButtonRole::Action));
        assert!(state.is_disabled(ButtonRole::Action));
    }

    #[test]
    fn clicks_on_closed_dialog_or_missing_button_are_errors() {
        let mut state = DialogState::new(Some(base()), DELAY);
        assert_eq!(
            reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Action)).unwrap_err(),
            DialogError::NotOpen
        );

        reduce_dialog(&mut state, DialogAction::Open(None)).expect("open");
        assert_eq!(
            reduce_dialog(&mut state, DialogAction::Click(ButtonRole::Middle)).unwrap_err(),
            DialogError::MissingButton(ButtonRole::Middle)
        );
    }
}

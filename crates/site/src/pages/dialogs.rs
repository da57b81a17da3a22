use leptos::*;
use system_ui::{
    Button, ButtonVariant, Card, CheckboxField, Cluster, FieldGroup, Heading, Page, Stack, Text,
    TextArea, TextField, TextTone,
};
use widget_state::{
    ButtonEmphasis, ButtonRole, DialogButton, DialogConfig, DialogPatch, DialogSize, HandlerError,
    ToastKind,
};
use widgets::{use_dialog, use_toasts, DialogForm};

use super::simulated_latency;

#[component]
pub fn DialogsPage() -> impl IntoView {
    view! {
        <Page
            title="Dialogs"
            description="One hook per dialog: open with overrides, run button handlers, and close after a short reset delay."
        >
            <Stack>
                <ConfirmDialogDemo />
                <FormDialogDemo />
                <ExternalLoadingDemo />
            </Stack>
        </Page>
    }
}

#[component]
fn ConfirmDialogDemo() -> impl IntoView {
    let toasts = use_toasts();
    let fail_next = create_rw_signal(false);

    let delete = DialogButton::new("Delete")
        .emphasis(ButtonEmphasis::Danger)
        .on_click_async(move || async move {
            simulated_latency(800).await;
            if fail_next.get_untracked() {
                toasts.push(
                    ToastKind::Error,
                    "Delete failed",
                    Some("The server rejected the request. Try again.".to_string()),
                );
                return Err(HandlerError::new("server rejected the delete request"));
            }
            toasts.push(ToastKind::Success, "Project deleted", None);
            Ok(())
        });

    let dialog = use_dialog(Some(
        DialogConfig::new("Delete project")
            .subtitle("This removes the project and its history.")
            .size(DialogSize::Sm)
            .cancel(DialogButton::new("Keep project"))
            .action(delete),
    ));

    let archive = move |_: ev::MouseEvent| {
        dialog.open_dialog(Some(
            DialogPatch::new()
                .title("Archive project")
                .subtitle("Archived projects can be restored later.")
                .action(
                    DialogButton::new("Archive")
                        .emphasis(ButtonEmphasis::Primary)
                        .on_click(move || {
                            toasts.push(ToastKind::Info, "Project archived", None);
                            Ok(())
                        }),
                ),
        ));
    };

    view! {
        <Card>
            <Heading level=3>"Confirmation"</Heading>
            <Text tone=TextTone::Secondary>
                "The delete handler waits on a simulated request. When it fails the dialog stays open and the button becomes clickable again."
            </Text>
            <CheckboxField
                label="Make the next delete fail"
                checked=Signal::derive(move || fail_next.get())
                on_change=Callback::new(move |ev: web_sys::Event| fail_next.set(event_target_checked(&ev)))
            />
            <Cluster>
                <Button
                    variant=ButtonVariant::Danger
                    on_click=Callback::new(move |_| dialog.open_dialog(None))
                >
                    "Delete project"
                </Button>
                <Button on_click=Callback::new(archive)>"Archive project"</Button>
            </Cluster>
            {dialog.view()}
        </Card>
    }
}

#[component]
fn FormDialogDemo() -> impl IntoView {
    let toasts = use_toasts();
    let display_name = create_rw_signal(String::new());
    let bio = create_rw_signal(String::new());

    let form = DialogForm::new(move || {
        view! {
            <Stack>
                <FieldGroup title="Display name" required=true>
                    <TextField
                        value=Signal::derive(move || display_name.get())
                        on_input=Callback::new(move |ev: web_sys::Event| display_name.set(event_target_value(&ev)))
                    />
                </FieldGroup>
                <FieldGroup title="Bio" helper_text=Some("Shown on your public profile.".to_string())>
                    <TextArea
                        value=Signal::derive(move || bio.get())
                        on_input=Callback::new(move |ev: web_sys::Event| bio.set(event_target_value(&ev)))
                    />
                </FieldGroup>
            </Stack>
        }
    });

    let dialog = use_dialog(Some(
        DialogConfig::new("Edit profile")
            .form(form)
            .cancel(DialogButton::new("Cancel"))
            .middle(DialogButton::new("Save draft").on_click(move || {
                toasts.push(ToastKind::Info, "Draft saved", None);
                Ok(())
            }))
            .action(
                DialogButton::new("Save")
                    .emphasis(ButtonEmphasis::Primary)
                    .on_click_async(move || async move {
                        let name = display_name.get_untracked();
                        if name.trim().is_empty() {
                            toasts.push(ToastKind::Warning, "Display name is required", None);
                            return Err(HandlerError::new("display name is empty"));
                        }
                        simulated_latency(500).await;
                        toasts.push(ToastKind::Success, format!("Saved profile for {name}"), None);
                        Ok(())
                    }),
            ),
    ));

    view! {
        <Card>
            <Heading level=3>"Form dialog"</Heading>
            <Text tone=TextTone::Secondary>
                "Three footer buttons. Only one handler runs at a time; the others are disabled until it settles."
            </Text>
            <Cluster>
                <Button
                    variant=ButtonVariant::Primary
                    on_click=Callback::new(move |_| dialog.open_dialog(None))
                >
                    "Edit profile"
                </Button>
            </Cluster>
            {dialog.view()}
        </Card>
    }
}

#[component]
fn ExternalLoadingDemo() -> impl IntoView {
    let toasts = use_toasts();
    let publishing = create_rw_signal(false);

    let dialog = use_dialog(Some(
        DialogConfig::new("Publish release")
            .subtitle("The publish button shows the page's own progress flag.")
            .cancel(DialogButton::new("Not now"))
            .action(
                DialogButton::new("Publish")
                    .emphasis(ButtonEmphasis::Primary)
                    .loading(move || publishing.get())
                    .on_click_async(move || async move {
                        publishing.set(true);
                        simulated_latency(1200).await;
                        publishing.set(false);
                        toasts.push(ToastKind::Success, "Release published", None);
                        Ok(())
                    }),
            ),
    ));

    let manual_spinner = move |_: ev::MouseEvent| {
        dialog.open_dialog(Some(DialogPatch::new().title("Waiting on review")));
        dialog.set_loading(ButtonRole::Cancel, true);
    };

    view! {
        <Card>
            <Heading level=3>"Caller-owned loading"</Heading>
            <Text tone=TextTone::Secondary>
                "A button can read its busy state from the caller. The second trigger shows the manual loading setter."
            </Text>
            <Cluster>
                <Button on_click=Callback::new(move |_| dialog.open_dialog(None))>"Publish release"</Button>
                <Button variant=ButtonVariant::Quiet on_click=Callback::new(manual_spinner)>
                    "Open with a busy cancel button"
                </Button>
            </Cluster>
            {dialog.view()}
        </Card>
    }
}

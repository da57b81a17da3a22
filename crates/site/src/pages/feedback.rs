use leptos::*;
use system_ui::{
    Button, ButtonVariant, Card, Cluster, Heading, Page, Panel, Stack, Text, TextTone, Tooltip,
    TooltipPlacement,
};
use widget_state::ToastKind;
use widgets::use_toasts;

#[component]
pub fn FeedbackPage() -> impl IntoView {
    let toasts = use_toasts();
    let sent = create_rw_signal(0_u32);

    let push = move |kind: ToastKind, title: &'static str| {
        Callback::new(move |_: ev::MouseEvent| {
            sent.update(|sent| *sent += 1);
            toasts.push(kind, title, Some(format!("Notification #{}", sent.get_untracked())));
        })
    };

    view! {
        <Page title="Feedback" description="Toasts queue up beyond the visible limit and expire on their own.">
            <Stack>
                <Card>
                    <Heading level=3>"Toasts"</Heading>
                    <Text tone=TextTone::Secondary>
                        "At most three toasts show at once; the rest wait and start their timer when a slot frees."
                    </Text>
                    <Cluster>
                        <Button on_click=push(ToastKind::Info, "Heads up")>"Info"</Button>
                        <Button variant=ButtonVariant::Primary on_click=push(ToastKind::Success, "All done")>
                            "Success"
                        </Button>
                        <Button variant=ButtonVariant::Secondary on_click=push(ToastKind::Warning, "Check this")>
                            "Warning"
                        </Button>
                        <Button variant=ButtonVariant::Danger on_click=push(ToastKind::Error, "Something broke")>
                            "Error"
                        </Button>
                    </Cluster>
                </Card>
                <Panel title="Tooltips" description="Hover or focus a button. Escape hides the tooltip.">
                    <Cluster>
                        <Tooltip text="Opens above">
                            <Button>"Top"</Button>
                        </Tooltip>
                        <Tooltip text="Opens below" placement=TooltipPlacement::Bottom>
                            <Button>"Bottom"</Button>
                        </Tooltip>
                        <Tooltip text="Press Escape to hide" placement=TooltipPlacement::End>
                            <Button variant=ButtonVariant::Quiet>"End"</Button>
                        </Tooltip>
                    </Cluster>
                </Panel>
            </Stack>
        </Page>
    }
}

use leptos::*;
use leptos_router::A;
use system_ui::{Card, Grid, Heading, Page, Text, TextRole, TextTone};

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <Page
            title="Widget Kit"
            description="Reusable dialog, filter, and feedback widgets composed from shared primitives."
        >
            <Grid columns=3>
                <Card>
                    <Heading level=3>"Dialogs"</Heading>
                    <Text tone=TextTone::Secondary>
                        "Merge-on-open configs, per-button loading, and dialogs that stay open when a handler fails."
                    </Text>
                    <A href="/dialogs">"Open the dialog demos"</A>
                </Card>
                <Card>
                    <Heading level=3>"Filters"</Heading>
                    <Text tone=TextTone::Secondary>
                        "Filter forms whose state lives in the URL, with debounced text fields and one-click reset."
                    </Text>
                    <A href="/filters">"Open the filter demos"</A>
                </Card>
                <Card>
                    <Heading level=3>"Feedback"</Heading>
                    <Text tone=TextTone::Secondary>
                        "Queued toasts with timed expiry and accessible tooltips."
                    </Text>
                    <A href="/feedback">"Open the feedback demos"</A>
                </Card>
            </Grid>
            <Text role=TextRole::Caption tone=TextTone::Secondary>
                "Every page reads its settings from the shared widget config."
            </Text>
        </Page>
    }
}

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use system_ui::{LayoutPadding, Surface, SurfaceVariant, Tab, TabList};
use widget_state::WidgetConfig;
use widgets::{provide_widget_config, ToastProvider};

use crate::pages::{DialogsPage, FeedbackPage, FiltersPage, HomePage};

const SECTIONS: [(&str, &str); 4] = [
    ("/", "Overview"),
    ("/dialogs", "Dialogs"),
    ("/filters", "Filters"),
    ("/feedback", "Feedback"),
];

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();
    provide_widget_config(WidgetConfig::default());

    view! {
        <Title text="Widget Kit" />
        <Meta name="description" content="Dialogs, URL-synced filters, toasts, and tooltips built on shared UI primitives." />

        <Router>
            <ToastProvider>
                <SiteNav />
                <Routes>
                    <Route path="" view=HomePage />
                    <Route path="/dialogs" view=DialogsPage />
                    <Route path="/filters" view=FiltersPage />
                    <Route path="/feedback" view=FeedbackPage />
                </Routes>
            </ToastProvider>
        </Router>
    }
}

#[component]
fn SiteNav() -> impl IntoView {
    let location = use_location();
    let navigate = use_navigate();

    let tabs = SECTIONS
        .into_iter()
        .map(|(path, label)| {
            let navigate = navigate.clone();
            view! {
                <Tab
                    selected=Signal::derive(move || location.pathname.with(|current| current == path))
                    on_click=Callback::new(move |_| navigate(path, NavigateOptions::default()))
                >
                    {label}
                </Tab>
            }
        })
        .collect_view();

    view! {
        <Surface
            variant=SurfaceVariant::Muted
            padding=LayoutPadding::Sm
            layout_class="site-nav"
            role="navigation"
            aria_label="Site"
        >
            <TabList aria_label="Sections">{tabs}</TabList>
        </Surface>
    }
}

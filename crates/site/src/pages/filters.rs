use leptos::*;
use system_ui::{Card, Heading, Page, Stack, Text, TextTone};
use widget_state::{
    FilterConfig, FilterKind, FilterLayout, FilterOption, FilterValue, FiltersConfig, ToastKind,
};
use widgets::{use_toasts, UniversalFilter};

fn order_filters() -> FiltersConfig {
    FiltersConfig::new([
        FilterConfig::new("Customer", "q", FilterKind::Search).placeholder("Name or email"),
        FilterConfig::new("Status", "status", FilterKind::Select).options([
            FilterOption::new("All", "all"),
            FilterOption::new("Open", "open"),
            FilterOption::new("Shipped", "shipped"),
            FilterOption::new("Cancelled", "cancelled"),
        ]),
        FilterConfig::new("Min total", "min_total", FilterKind::Number)
            .range(Some(0.0), None, Some(5.0))
            .helper_text("Order total in dollars"),
        FilterConfig::new("Placed after", "after", FilterKind::Date),
        FilterConfig::new("Priority only", "priority", FilterKind::Checkbox),
    ])
    .show_apply_button(true)
}

fn catalog_filters() -> FiltersConfig {
    FiltersConfig::new([
        FilterConfig::new("Tags", "tags", FilterKind::Multiselect).options([
            FilterOption::new("New", "new"),
            FilterOption::new("Sale", "sale"),
            FilterOption::new("Limited", "limited"),
        ]),
        FilterConfig::new("Colors", "colors", FilterKind::CheckboxGroup).options([
            FilterOption::new("Red", "red"),
            FilterOption::new("Green", "green"),
            FilterOption::new("Blue", "blue"),
        ]),
        FilterConfig::new("Sort", "sort", FilterKind::RadioGroup)
            .options([
                FilterOption::new("Newest", "newest"),
                FilterOption::new("Price", "price"),
            ])
            .default_value(FilterValue::Text("newest".to_string())),
        FilterConfig::new("Notes", "notes", FilterKind::Textarea),
    ])
    .layout(FilterLayout::Dropdown)
}

#[component]
pub fn FiltersPage() -> impl IntoView {
    let toasts = use_toasts();

    let on_apply = Callback::new(move |values: widget_state::FilterValues| {
        let active = values.values().filter(|value| !value.is_cleared()).count();
        toasts.push(
            ToastKind::Info,
            format!("Applied {active} filter values"),
            None,
        );
    });
    let on_reset = Callback::new(move |()| {
        toasts.push(ToastKind::Info, "Filters cleared", None);
    });

    view! {
        <Page
            title="Filters"
            description="Filter state lives in the address bar. Reload, share the link, or use back and forward; the forms follow."
        >
            <Stack>
                <Card>
                    <Heading level=3>"Inline filters"</Heading>
                    <Text tone=TextTone::Secondary>
                        "Text and number fields wait half a second after the last keystroke before updating the URL."
                    </Text>
                    <UniversalFilter config=order_filters() on_apply=on_apply on_reset=on_reset />
                </Card>
                <Card>
                    <Heading level=3>"Dropdown filters"</Heading>
                    <Text tone=TextTone::Secondary>
                        "The same state logic behind a toggle. Clicking outside the panel closes it."
                    </Text>
                    <UniversalFilter config=catalog_filters() on_reset=on_reset />
                </Card>
            </Stack>
        </Page>
    }
}

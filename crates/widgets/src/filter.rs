//! Universal filter form kept in sync with the URL query string.

use std::rc::Rc;

use leptos::{ev, *};
use system_ui::{
    Badge, Button, ButtonVariant, CheckboxField, Cluster, EmptyState, FieldGroup, LayoutGap,
    LayoutJustify, LayoutPadding, MenuSurface, RadioField, SelectField, SelectOption, Stack,
    TextArea, TextField, TextTone, ToolBar,
};
use wasm_bindgen::JsCast;
use widget_state::{
    FilterConfig, FilterKind, FilterLayout, FilterSession, FilterValue, FilterValues,
    FiltersConfig, QueryStore, ValueShape,
};
use widget_state_web::{BrowserQueryStore, BrowserTimerHost};

use crate::config::use_widget_config;

type Session = FilterSession<BrowserTimerHost>;

#[component]
/// Filter form whose state lives in the URL query string.
///
/// Every declared field reads its parameter on mount and again whenever the query changes
/// (back/forward navigation included). Edits are written with `history.replaceState`; text-like
/// fields wait for the configured debounce first. Reset clears every declared parameter in one
/// write, and apply hands the current values to `on_apply` without touching the URL.
///
/// `store` defaults to the page URL; pass another [`QueryStore`] to drive the form from
/// somewhere else.
pub fn UniversalFilter(
    config: FiltersConfig,
    #[prop(optional)] store: Option<Rc<dyn QueryStore>>,
    #[prop(optional)] on_reset: Option<Callback<()>>,
    #[prop(optional)] on_apply: Option<Callback<FilterValues>>,
    #[prop(optional)] layout_class: Option<&'static str>,
) -> impl IntoView {
    let debounce = use_widget_config().filter_debounce();
    let store: Rc<dyn QueryStore> = match store {
        Some(store) => store,
        None => Rc::new(
            BrowserQueryStore::new()
                .with_error_reporter(|err| logging::warn!("filter query store error: {err}")),
        ),
    };
    let class = match layout_class {
        Some(layout_class) if !layout_class.is_empty() => {
            format!("ui-universal-filter {layout_class}")
        }
        _ => "ui-universal-filter".to_string(),
    };

    if let Ok(issues) = config.validate() {
        for issue in issues {
            logging::debug_warn!("filter schema issue: {issue:?}");
        }
    }

    let timers = BrowserTimerHost::new()
        .with_error_reporter(|err| logging::warn!("filter timer error: {err}"));
    let session = match Session::start(config.clone(), Rc::clone(&store), timers, debounce) {
        Ok(session) => session,
        Err(err) => {
            logging::warn!("universal filter disabled: {err}");
            return view! {
                <EmptyState layout_class="ui-universal-filter">
                    {format!("Filters unavailable: {err}")}
                </EmptyState>
            }
            .into_view();
        }
    };

    let values = create_rw_signal(session.values());
    let active_count = create_rw_signal(session.active_count());
    {
        let schema = config.clone();
        let store = Rc::clone(&store);
        session.on_values_changed(move |next| {
            values.try_set(next.clone());
            active_count.try_set(schema.active_count(&store.snapshot()));
        });
    }

    let session = store_value(Some(session));
    on_cleanup(move || {
        session.try_update_value(|slot| slot.take());
    });

    let parse_issues = create_memo(move |_| {
        values.track();
        session.with_value(|session| {
            session
                .as_ref()
                .map(Session::parse_issues)
                .unwrap_or_default()
        })
    });
    create_effect(move |_| {
        parse_issues.with(|issues| {
            for issue in issues {
                logging::debug_warn!(
                    "ignoring filter param `{}`={:?}: {}",
                    issue.param,
                    issue.raw,
                    issue.error
                );
            }
        });
    });

    let on_field_change = Callback::new(move |(param, value): (String, FilterValue)| {
        session.with_value(|session| {
            let Some(session) = session else {
                return;
            };
            if let Err(err) = session.set_value(&param, value) {
                logging::warn!("filter update rejected: {err}");
            }
        });
    });

    let panel_open = create_rw_signal(false);
    let layout = config.layout;
    if layout == FilterLayout::Dropdown {
        let outside_click = window_event_listener(ev::mousedown, move |_| {
            if panel_open.get_untracked() {
                panel_open.set(false);
            }
        });
        on_cleanup(move || outside_click.remove());
    }

    let reset = Callback::new(move |_: ev::MouseEvent| {
        session.with_value(|session| {
            if let Some(session) = session {
                session.reset();
            }
        });
        panel_open.set(false);
        if let Some(on_reset) = on_reset {
            on_reset.call(());
        }
    });
    let apply = Callback::new(move |_: ev::MouseEvent| {
        panel_open.set(false);
        if let Some(on_apply) = on_apply {
            on_apply.call(values.get_untracked());
        }
    });

    let fields = config
        .filters
        .iter()
        .cloned()
        .map(|field| {
            let param = field.param.clone();
            let kind = field.kind;
            let value = Signal::derive(move || {
                values.with(|values| {
                    values
                        .get(&param)
                        .cloned()
                        .unwrap_or_else(|| kind.empty_value())
                })
            });
            view! { <FilterField field=field value=value on_change=on_field_change /> }
        })
        .collect_view();

    let FiltersConfig {
        show_reset,
        show_apply_button,
        reset_label,
        apply_label,
        toggle_label,
        ..
    } = config;

    let actions = view! {
        <ToolBar ui_slot="actions" justify=LayoutJustify::End aria_label="Filter actions">
            {show_reset
                .then(|| {
                    view! {
                        <Button
                            variant=ButtonVariant::Secondary
                            ui_slot="reset"
                            disabled=Signal::derive(move || active_count.get() == 0)
                            on_click=reset
                        >
                            {reset_label}
                        </Button>
                    }
                })}
            {show_apply_button
                .then(|| {
                    view! {
                        <Button variant=ButtonVariant::Primary ui_slot="apply" on_click=apply>
                            {apply_label}
                        </Button>
                    }
                })}
        </ToolBar>
    };

    let count_badge = move || {
        let count = active_count.get();
        (count > 0)
            .then(|| {
                view! {
                    <Badge
                        tone=TextTone::Accent
                        ui_slot="active-count"
                        aria_label=format!("{count} active filters")
                    >
                        {count}
                    </Badge>
                }
            })
    };

    let body = match layout {
        FilterLayout::Tabs => {
            view! {
                <Stack gap=LayoutGap::Sm>
                    <Cluster gap=LayoutGap::Md ui_slot="fields">{fields}</Cluster>
                    <Cluster justify=LayoutJustify::Between>{count_badge} {actions}</Cluster>
                </Stack>
            }
                .into_view()
        }
        FilterLayout::Dropdown => {
            let panel_id = format!("filter-panel-{}", toggle_label.to_lowercase().replace(' ', "-"));
            let toggle_text = toggle_label.clone();
            view! {
                <div data-ui-slot="dropdown" on:mousedown=|ev| ev.stop_propagation()>
                    <Button
                        variant=ButtonVariant::Secondary
                        ui_slot="toggle"
                        aria_haspopup="dialog"
                        aria_controls=panel_id.clone()
                        aria_expanded=Signal::derive(move || panel_open.get())
                        on_click=Callback::new(move |_| panel_open.update(|open| *open = !*open))
                    >
                        {toggle_text}
                        {count_badge}
                    </Button>
                    <div id=panel_id data-ui-slot="panel" hidden=move || !panel_open.get()>
                        <MenuSurface role="dialog" aria_label=toggle_label>
                            <Stack gap=LayoutGap::Sm padding=LayoutPadding::Sm>
                                {fields}
                                {actions}
                            </Stack>
                        </MenuSurface>
                    </div>
                </div>
            }
                .into_view()
        }
    };

    view! {
        <section
            class=class
            data-ui-kind="universal-filter"
            data-ui-layout=layout.token()
            data-ui-active-count=move || active_count.get()
        >
            {body}
        </section>
    }
    .into_view()
}

#[component]
fn FilterField(
    field: FilterConfig,
    value: Signal<FilterValue>,
    on_change: Callback<(String, FilterValue)>,
) -> impl IntoView {
    let FilterConfig {
        name,
        param,
        kind,
        options,
        min,
        max,
        step,
        placeholder,
        helper_text,
        required,
        disabled,
        ..
    } = field;

    let emit = {
        let param = param.clone();
        Callback::new(move |value: FilterValue| on_change.call((param.clone(), value)))
    };
    let choices = options
        .iter()
        .map(|option| SelectOption::new(option.label.clone(), option.value.clone()))
        .collect::<Vec<_>>();

    let control = match kind {
        FilterKind::Textarea => view! {
            <TextArea
                name=param.clone()
                aria_label=name.clone()
                placeholder=placeholder.unwrap_or_default()
                required=required
                disabled=disabled
                value=Signal::derive(move || value.get().as_input_text())
                on_input=Callback::new(move |ev: web_sys::Event| emit.call(FilterValue::Text(event_target_value(&ev))))
            />
        }
        .into_view(),
        FilterKind::Select => view! {
            <SelectField
                name=param.clone()
                aria_label=name.clone()
                options=choices
                placeholder=placeholder.unwrap_or_else(|| "Any".to_string())
                selected=Signal::derive(move || vec![value.get().as_input_text()])
                disabled=disabled
                on_change=Callback::new(move |ev: web_sys::Event| emit.call(FilterValue::Text(event_target_value(&ev))))
            />
        }
        .into_view(),
        FilterKind::Multiselect => view! {
            <SelectField
                name=param.clone()
                aria_label=name.clone()
                options=choices
                multiple=true
                selected=Signal::derive(move || value.get().as_list())
                disabled=disabled
                on_change=Callback::new(move |ev: web_sys::Event| emit.call(FilterValue::List(selected_values(&ev))))
            />
        }
        .into_view(),
        FilterKind::Checkbox => view! {
            <CheckboxField
                name=param.clone()
                aria_label=name.clone()
                checked=Signal::derive(move || value.get().as_flag())
                disabled=disabled
                on_change=Callback::new(move |ev: web_sys::Event| emit.call(FilterValue::Flag(event_target_checked(&ev))))
            />
        }
        .into_view(),
        FilterKind::CheckboxGroup => {
            let order = Rc::new(
                options
                    .iter()
                    .map(|option| option.value.clone())
                    .collect::<Vec<_>>(),
            );
            let boxes = options
                .into_iter()
                .map(|option| {
                    let choice = option.value.clone();
                    let checked_choice = option.value.clone();
                    let order = Rc::clone(&order);
                    view! {
                        <CheckboxField
                            name=param.clone()
                            value=option.value
                            label=option.label
                            checked=Signal::derive(move || {
                                value.with(|value| value.as_list().contains(&checked_choice))
                            })
                            disabled=disabled
                            on_change=Callback::new(move |ev: web_sys::Event| {
                                let current = value.get_untracked().as_list();
                                let next = toggle_choice(
                                    &order,
                                    &current,
                                    &choice,
                                    event_target_checked(&ev),
                                );
                                emit.call(FilterValue::List(next));
                            })
                        />
                    }
                })
                .collect_view();
            view! { <div role="group" aria-label=name.clone() data-ui-slot="choices">{boxes}</div> }
                .into_view()
        }
        FilterKind::Radio | FilterKind::RadioGroup => view! {
            <RadioField
                name=param.clone()
                aria_label=name.clone()
                options=choices
                selected=Signal::derive(move || value.get().as_input_text())
                disabled=disabled
                on_select=Callback::new(move |choice: String| emit.call(FilterValue::Text(choice)))
            />
        }
        .into_view(),
        _ => {
            let numeric = kind.shape() == ValueShape::Number;
            let input_param = param.clone();
            view! {
                <TextField
                    name=param.clone()
                    aria_label=name.clone()
                    input_type=kind.input_type().unwrap_or("text")
                    placeholder=placeholder.unwrap_or_default()
                    min=min
                    max=max
                    step=step
                    required=required
                    disabled=disabled
                    value=Signal::derive(move || value.get().as_input_text())
                    on_input=Callback::new(move |ev: web_sys::Event| {
                        let raw = event_target_value(&ev);
                        if !numeric {
                            emit.call(FilterValue::Text(raw));
                            return;
                        }
                        match number_input_value(&raw) {
                            Some(number) => emit.call(number),
                            None => logging::debug_warn!("ignoring partial number for `{input_param}`: {raw:?}"),
                        }
                    })
                />
            }
            .into_view()
        }
    };

    view! {
        <div data-ui-slot="filter" data-ui-filter-kind=kind.token() data-ui-param=param>
            <FieldGroup title=name helper_text=helper_text required=required>
                {control}
            </FieldGroup>
        </div>
    }
}

/// Values of the options currently chosen in a `<select multiple>`.
fn selected_values(ev: &web_sys::Event) -> Vec<String> {
    let Some(select) = ev
        .target()
        .and_then(|target| target.dyn_into::<web_sys::HtmlSelectElement>().ok())
    else {
        return Vec::new();
    };

    let chosen = select.selected_options();
    (0..chosen.length())
        .filter_map(|index| chosen.item(index))
        .filter_map(|element| element.dyn_into::<web_sys::HtmlOptionElement>().ok())
        .map(|option| option.value())
        .collect()
}

/// Maps number-input text to a value; `None` while the text is not a number yet.
fn number_input_value(raw: &str) -> Option<FilterValue> {
    if raw.trim().is_empty() {
        return Some(FilterValue::Text(String::new()));
    }
    FilterValue::parse(ValueShape::Number, raw).ok()
}

/// Toggles `choice` and returns the chosen values in option order.
fn toggle_choice(order: &[String], current: &[String], choice: &str, checked: bool) -> Vec<String> {
    order
        .iter()
        .filter(|option| {
            if option.as_str() == choice {
                checked
            } else {
                current.contains(option)
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn checkbox_group_toggles_keep_option_order() {
        let order = strings(&["red", "green", "blue"]);

        assert_eq!(
            toggle_choice(&order, &strings(&["blue"]), "red", true),
            strings(&["red", "blue"])
        );
        assert_eq!(
            toggle_choice(&order, &strings(&["red", "blue"]), "red", false),
            strings(&["blue"])
        );
        assert_eq!(toggle_choice(&order, &[], "green", false), Vec::<String>::new());
    }

    #[test]
    fn number_input_clears_when_empty_and_waits_on_partial_text() {
        assert_eq!(
            number_input_value("  "),
            Some(FilterValue::Text(String::new()))
        );
        assert_eq!(number_input_value("42.5"), Some(FilterValue::Number(42.5)));
        assert_eq!(number_input_value("-"), None);
    }
}

use super::*;

#[component]
/// Shared button primitive with standardized states and a busy indicator.
///
/// While `busy` is true the button is disabled, exposes `aria-busy`, and renders a spinner
/// ahead of its label.
pub fn Button(
    #[prop(default = ButtonVariant::Standard)] variant: ButtonVariant,
    #[prop(default = ButtonSize::Md)] size: ButtonSize,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] role: Option<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional, into)] aria_controls: MaybeSignal<String>,
    #[prop(optional, into)] aria_expanded: MaybeSignal<bool>,
    #[prop(optional, into)] aria_haspopup: MaybeSignal<String>,
    #[prop(optional, into)] aria_describedby: MaybeSignal<String>,
    #[prop(optional, into)] title: MaybeSignal<String>,
    #[prop(optional)] tabindex: Option<i32>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] selected: MaybeSignal<bool>,
    #[prop(optional, into)] busy: MaybeSignal<bool>,
    #[prop(optional)] submit: bool,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    #[prop(optional)] on_keydown: Option<Callback<KeyboardEvent>>,
    #[prop(optional)] on_focus: Option<Callback<FocusEvent>>,
    #[prop(optional)] on_blur: Option<Callback<FocusEvent>>,
    children: Children,
) -> impl IntoView {
    let class = merge_layout_class("ui-button", layout_class);
    let is_disabled = move || disabled.get() || busy.get();

    view! {
        <button
            type=if submit { "submit" } else { "button" }
            class=class
            id=id
            role=role
            aria-label=move || aria_label.get()
            aria-controls=move || aria_controls.get()
            aria-expanded=move || aria_expanded.get()
            aria-haspopup=move || aria_haspopup.get()
            aria-describedby=move || aria_describedby.get()
            aria-busy=move || bool_token(busy.get())
            title=move || title.get()
            tabindex=tabindex
            disabled=is_disabled
            data-ui-primitive="true"
            data-ui-kind="button"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-size=size.token()
            data-ui-state=move || control_state_token(busy.get(), selected.get())
            data-ui-selected=move || bool_token(selected.get())
            data-ui-busy=move || bool_token(busy.get())
            data-ui-disabled=move || bool_token(is_disabled())
            on:click=move |ev| {
                if is_disabled() {
                    return;
                }
                if let Some(on_click) = on_click.as_ref() {
                    on_click.call(ev);
                }
            }
            on:keydown=move |ev| {
                if let Some(on_keydown) = on_keydown.as_ref() {
                    on_keydown.call(ev);
                }
            }
            on:focus=move |ev| {
                if let Some(on_focus) = on_focus.as_ref() {
                    on_focus.call(ev);
                }
            }
            on:blur=move |ev| {
                if let Some(on_blur) = on_blur.as_ref() {
                    on_blur.call(ev);
                }
            }
        >
            <Show when=move || busy.get()>
                <Spinner layout_class="ui-button-spinner" />
            </Show>
            <span data-ui-slot="label">{children()}</span>
        </button>
    }
}

#[component]
/// Labeled field wrapper with optional helper text and a required marker.
pub fn FieldGroup(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] title: Option<String>,
    #[prop(optional, into)] description: Option<String>,
    #[prop(default = None)] helper_text: Option<String>,
    #[prop(optional)] required: bool,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <label
            class=merge_layout_class("ui-field-group", layout_class)
            data-ui-primitive="true"
            data-ui-kind="field-group"
            data-ui-slot=ui_slot
            data-ui-required=bool_token(required)
        >
            <span data-ui-slot="copy">
                {title.map(|title| {
                    view! {
                        <span data-ui-slot="title">
                            {title}
                            {required.then(|| view! { <span data-ui-slot="required" aria-hidden="true">"*"</span> })}
                        </span>
                    }
                })}
                {description.map(|description| view! { <span data-ui-slot="description">{description}</span> })}
            </span>
            <span data-ui-slot="control">{children()}</span>
            {helper_text.map(|helper_text| view! { <span data-ui-slot="helper">{helper_text}</span> })}
        </label>
    }
}

#[component]
/// Shared text input primitive covering every `input` type the field kinds need.
pub fn TextField(
    #[prop(default = FieldVariant::Standard)] variant: FieldVariant,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] name: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] node_ref: NodeRef<html::Input>,
    #[prop(optional)] autocomplete: Option<&'static str>,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(default = None)] min: Option<f64>,
    #[prop(default = None)] max: Option<f64>,
    #[prop(default = None)] step: Option<f64>,
    #[prop(optional)] required: bool,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_input: Option<Callback<web_sys::Event>>,
    #[prop(optional)] on_keydown: Option<Callback<KeyboardEvent>>,
) -> impl IntoView {
    let input_type = input_type.unwrap_or("text");

    view! {
        <input
            class=merge_layout_class("ui-field", layout_class)
            id=id
            name=name
            placeholder=placeholder
            aria-label=aria_label
            node_ref=node_ref
            autocomplete=autocomplete
            type=input_type
            min=min
            max=max
            step=step
            required=required
            prop:value=move || value.get()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="text-field"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-input=input_type
            data-ui-disabled=move || bool_token(disabled.get())
            on:input=move |ev| {
                if let Some(on_input) = on_input.as_ref() {
                    on_input.call(ev);
                }
            }
            on:keydown=move |ev| {
                if let Some(on_keydown) = on_keydown.as_ref() {
                    on_keydown.call(ev);
                }
            }
        />
    }
}

#[component]
/// Shared multiline text area primitive.
pub fn TextArea(
    #[prop(default = FieldVariant::Inset)] variant: FieldVariant,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] name: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] rows: Option<u16>,
    #[prop(optional)] required: bool,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_input: Option<Callback<web_sys::Event>>,
) -> impl IntoView {
    view! {
        <textarea
            class=merge_layout_class("ui-textarea", layout_class)
            id=id
            name=name
            placeholder=placeholder
            aria-label=aria_label
            rows=rows.unwrap_or(3)
            required=required
            prop:value=move || value.get()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="text-area"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-disabled=move || bool_token(disabled.get())
            on:input=move |ev| {
                if let Some(on_input) = on_input.as_ref() {
                    on_input.call(ev);
                }
            }
        ></textarea>
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Label/value pair rendered by [`SelectField`] and [`RadioField`].
pub struct SelectOption {
    /// Display label.
    pub label: String,
    /// Submitted value.
    pub value: String,
}

impl SelectOption {
    /// Creates an option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[component]
/// Shared select primitive. In `multiple` mode `selected` may hold several values.
pub fn SelectField(
    #[prop(default = FieldVariant::Standard)] variant: FieldVariant,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] name: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional)] multiple: bool,
    #[prop(optional)] ui_slot: Option<&'static str>,
    options: Vec<SelectOption>,
    #[prop(optional, into)] selected: MaybeSignal<Vec<String>>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_change: Option<Callback<web_sys::Event>>,
) -> impl IntoView {
    let selected = Signal::derive(move || selected.get());
    let options = options
        .into_iter()
        .map(|option| {
            let value = option.value.clone();
            view! {
                <option
                    value=option.value
                    prop:selected=move || selected.with(|selected| selected.contains(&value))
                >
                    {option.label}
                </option>
            }
        })
        .collect_view();

    view! {
        <select
            class=merge_layout_class("ui-field", layout_class)
            id=id
            name=name
            aria-label=aria_label
            multiple=multiple
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="select"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-multiple=bool_token(multiple)
            data-ui-disabled=move || bool_token(disabled.get())
            on:change=move |ev| {
                if let Some(on_change) = on_change.as_ref() {
                    on_change.call(ev);
                }
            }
        >
            {(!multiple)
                .then(|| placeholder.map(|placeholder| view! { <option value="">{placeholder}</option> }))
                .flatten()}
            {options}
        </select>
    }
}

#[component]
/// Shared checkbox input with an inline label.
pub fn CheckboxField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] name: Option<String>,
    #[prop(optional, into)] value: Option<String>,
    #[prop(optional, into)] label: Option<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional, into)] checked: MaybeSignal<bool>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_change: Option<Callback<web_sys::Event>>,
) -> impl IntoView {
    view! {
        <label
            class=merge_layout_class("ui-checkbox", layout_class)
            data-ui-primitive="true"
            data-ui-kind="checkbox"
            data-ui-selected=move || bool_token(checked.get())
            data-ui-disabled=move || bool_token(disabled.get())
        >
            <input
                type="checkbox"
                name=name
                value=value
                aria-label=move || aria_label.get()
                prop:checked=move || checked.get()
                disabled=move || disabled.get()
                on:change=move |ev| {
                    if let Some(on_change) = on_change.as_ref() {
                        on_change.call(ev);
                    }
                }
            />
            {label.map(|label| view! { <span data-ui-slot="label">{label}</span> })}
        </label>
    }
}

#[component]
/// Radio group rendered from an option list. `on_select` receives the chosen value.
pub fn RadioField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(into)] name: String,
    #[prop(optional, into)] aria_label: Option<String>,
    options: Vec<SelectOption>,
    #[prop(optional, into)] selected: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_select: Option<Callback<String>>,
) -> impl IntoView {
    let selected = Signal::derive(move || selected.get());
    let options = options
        .into_iter()
        .map(|option| {
            let value = option.value.clone();
            let emitted = option.value.clone();
            let name = name.clone();
            view! {
                <label data-ui-slot="radio-option">
                    <input
                        type="radio"
                        name=name
                        value=option.value
                        prop:checked=move || selected.with(|selected| *selected == value)
                        disabled=move || disabled.get()
                        on:change=move |_| {
                            if let Some(on_select) = on_select.as_ref() {
                                on_select.call(emitted.clone());
                            }
                        }
                    />
                    <span data-ui-slot="label">{option.label}</span>
                </label>
            }
        })
        .collect_view();

    view! {
        <div
            class=merge_layout_class("ui-radio-group", layout_class)
            role="radiogroup"
            aria-label=aria_label
            data-ui-primitive="true"
            data-ui-kind="radio-group"
            data-ui-disabled=move || bool_token(disabled.get())
        >
            {options}
        </div>
    }
}

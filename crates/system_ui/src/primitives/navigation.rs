use super::*;

#[component]
/// Horizontal action bar.
pub fn ToolBar(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(default = LayoutGap::Sm)] gap: LayoutGap,
    #[prop(default = LayoutJustify::Start)] justify: LayoutJustify,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-toolbar", layout_class)
            role="toolbar"
            aria-label=aria_label
            data-ui-primitive="true"
            data-ui-kind="toolbar"
            data-ui-slot=ui_slot
            data-ui-gap=gap.token()
            data-ui-justify=justify.token()
        >
            {children()}
        </div>
    }
}

#[component]
/// Tab strip container.
pub fn TabList(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-tab-list", layout_class)
            data-ui-primitive="true"
            data-ui-kind="tab-list"
            role="tablist"
            aria-label=aria_label
        >
            {children()}
        </div>
    }
}

#[component]
/// Tab trigger. Only the selected tab is in the focus order.
pub fn Tab(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] controls: MaybeSignal<String>,
    #[prop(optional, into)] selected: MaybeSignal<bool>,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            type="button"
            class=merge_layout_class("ui-tab", layout_class)
            id=id
            role="tab"
            aria-controls=move || controls.get()
            aria-selected=move || bool_token(selected.get())
            tabindex=move || if selected.get() { 0 } else { -1 }
            data-ui-primitive="true"
            data-ui-kind="tab"
            data-ui-selected=move || bool_token(selected.get())
            on:click=move |ev| {
                if let Some(on_click) = on_click.as_ref() {
                    on_click.call(ev);
                }
            }
        >
            {children()}
        </button>
    }
}

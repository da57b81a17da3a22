use std::sync::atomic::{AtomicU64, Ordering};

use super::*;

static NEXT_TOOLTIP_ID: AtomicU64 = AtomicU64::new(1);

fn next_tooltip_dom_id() -> String {
    format!(
        "ui-tooltip-{}",
        NEXT_TOOLTIP_ID.fetch_add(1, Ordering::Relaxed)
    )
}

#[component]
/// Indeterminate activity indicator.
pub fn Spinner(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] label: Option<String>,
) -> impl IntoView {
    let labelled = label.is_some();

    view! {
        <span
            class=merge_layout_class("ui-spinner", layout_class)
            role=labelled.then_some("status")
            aria-label=label
            aria-hidden=(!labelled).then_some("true")
            data-ui-primitive="true"
            data-ui-kind="spinner"
        ></span>
    }
}

#[component]
/// Hover/focus tooltip wrapped around an anchor.
///
/// The anchor is described by the tooltip through `aria-describedby`, and Escape hides it.
pub fn Tooltip(
    #[prop(into)] text: MaybeSignal<String>,
    #[prop(optional)] placement: TooltipPlacement,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let visible = create_rw_signal(false);
    let tooltip_id = id.unwrap_or_else(next_tooltip_dom_id);

    view! {
        <span
            class=merge_layout_class("ui-tooltip-anchor", layout_class)
            aria-describedby=tooltip_id.clone()
            data-ui-primitive="true"
            data-ui-kind="tooltip-anchor"
            on:mouseenter=move |_| visible.set(true)
            on:mouseleave=move |_| visible.set(false)
            on:focusin=move |_| visible.set(true)
            on:focusout=move |_| visible.set(false)
            on:keydown=move |ev: KeyboardEvent| {
                if ev.key() == "Escape" {
                    visible.set(false);
                }
            }
        >
            {children()}
            <span
                id=tooltip_id
                role="tooltip"
                hidden=move || !visible.get()
                data-ui-primitive="true"
                data-ui-kind="tooltip"
                data-ui-placement=placement.token()
                data-ui-state=move || if visible.get() { "open" } else { "closed" }
            >
                {move || text.get()}
            </span>
        </span>
    }
}

#[component]
/// Polite live region that stacks toast surfaces.
pub fn ToastRegion(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <section
            class=merge_layout_class("ui-toast-region", layout_class)
            role="region"
            aria-live="polite"
            aria-label=aria_label.unwrap_or_else(|| "Notifications".to_string())
            data-ui-primitive="true"
            data-ui-kind="toast-region"
        >
            {children()}
        </section>
    }
}

#[component]
/// Single toast with a tone, title, optional body, and a dismiss button.
pub fn ToastSurface(
    #[prop(default = TextTone::Primary)] tone: TextTone,
    #[prop(into)] title: String,
    #[prop(default = None)] body: Option<String>,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    let urgent = matches!(tone, TextTone::Danger | TextTone::Warning);

    view! {
        <div
            class=merge_layout_class("ui-toast", layout_class)
            role=if urgent { "alert" } else { "status" }
            data-ui-primitive="true"
            data-ui-kind="toast"
            data-ui-tone=tone.token()
            data-ui-elevation=Elevation::Overlay.token()
        >
            <div data-ui-slot="copy">
                <span data-ui-slot="title">{title}</span>
                {body.map(|body| view! { <span data-ui-slot="body">{body}</span> })}
            </div>
            {on_dismiss.map(|on_dismiss| {
                view! {
                    <Button
                        variant=ButtonVariant::Quiet
                        size=ButtonSize::Sm
                        ui_slot="dismiss"
                        aria_label="Dismiss notification"
                        on_click=Callback::new(move |_| on_dismiss.call(()))
                    >
                        "Dismiss"
                    </Button>
                }
            })}
        </div>
    }
}

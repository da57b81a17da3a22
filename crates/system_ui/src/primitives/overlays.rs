use super::*;

#[component]
/// Shared overlay surface for dropdown panels and popups.
pub fn MenuSurface(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] role: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-menu-surface", layout_class)
            id=id
            role=role
            aria-label=aria_label
            data-ui-primitive="true"
            data-ui-kind="menu-surface"
            data-ui-slot=ui_slot
            data-ui-elevation=Elevation::Overlay.token()
            on:mousedown=|ev| ev.stop_propagation()
        >
            {children()}
        </div>
    }
}

#[component]
/// Modal dialog frame with a backdrop, header, body, and footer.
///
/// The frame stays mounted while closed so exit transitions can run; `data-ui-state` switches
/// between `open` and `closed`. Escape and backdrop clicks call `on_dismiss` while open.
pub fn Modal(
    #[prop(into)] open: MaybeSignal<bool>,
    #[prop(optional, into)] size: MaybeSignal<ModalSize>,
    #[prop(optional, into)] title: MaybeSignal<String>,
    #[prop(optional, into)] subtitle: MaybeSignal<String>,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
    #[prop(optional)] footer: Option<ChildrenFn>,
    children: Children,
) -> impl IntoView {
    let title_id = id
        .as_ref()
        .map(|id| format!("{id}-title"))
        .unwrap_or_else(|| "ui-modal-title".to_string());
    let title = Signal::derive(move || title.get());
    let subtitle = Signal::derive(move || subtitle.get());

    let escape_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() || ev.key() != "Escape" || !open.get_untracked() {
            return;
        }
        if let Some(on_dismiss) = on_dismiss.as_ref() {
            ev.prevent_default();
            on_dismiss.call(());
        }
    });
    on_cleanup(move || escape_listener.remove());

    view! {
        <div
            class=merge_layout_class("ui-modal", layout_class)
            data-ui-primitive="true"
            data-ui-kind="modal"
            data-ui-state=move || if open.get() { "open" } else { "closed" }
            data-ui-size=move || size.get().token()
            aria-hidden=move || bool_token(!open.get())
        >
            <div
                data-ui-slot="backdrop"
                on:mousedown=move |_| {
                    if !open.get_untracked() {
                        return;
                    }
                    if let Some(on_dismiss) = on_dismiss.as_ref() {
                        on_dismiss.call(());
                    }
                }
            ></div>
            <div
                id=id
                role="dialog"
                aria-modal="true"
                aria-labelledby=title_id.clone()
                data-ui-slot="dialog"
                data-ui-elevation=Elevation::Overlay.token()
            >
                <header data-ui-slot="header">
                    <h2 id=title_id data-ui-slot="title">{move || title.get()}</h2>
                    <Show when=move || subtitle.with(|subtitle| !subtitle.is_empty())>
                        <p data-ui-slot="subtitle">{move || subtitle.get()}</p>
                    </Show>
                </header>
                <div data-ui-slot="body">{children()}</div>
                {footer.map(|footer| view! { <footer data-ui-slot="footer">{footer()}</footer> })}
            </div>
        </div>
    }
}

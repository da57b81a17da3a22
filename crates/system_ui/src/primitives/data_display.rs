use super::*;

#[component]
/// Generic surface primitive.
pub fn Surface(
    #[prop(default = SurfaceVariant::Standard)] variant: SurfaceVariant,
    #[prop(default = Elevation::Flat)] elevation: Elevation,
    #[prop(default = LayoutPadding::Md)] padding: LayoutPadding,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] role: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-surface", layout_class)
            data-ui-primitive="true"
            data-ui-kind="surface"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-elevation=elevation.token()
            data-ui-padding=padding.token()
            role=role
            aria-label=aria_label
        >
            {children()}
        </div>
    }
}

#[component]
/// Sectioning panel with an optional heading row.
pub fn Panel(
    #[prop(default = SurfaceVariant::Standard)] variant: SurfaceVariant,
    #[prop(default = Elevation::Raised)] elevation: Elevation,
    #[prop(default = LayoutPadding::Md)] padding: LayoutPadding,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] title: Option<String>,
    #[prop(optional, into)] description: Option<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let has_header = title.is_some() || description.is_some();

    view! {
        <section
            class=merge_layout_class("ui-panel", layout_class)
            data-ui-primitive="true"
            data-ui-kind="panel"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-elevation=elevation.token()
            data-ui-padding=padding.token()
        >
            {has_header.then(|| {
                view! {
                    <header data-ui-slot="header">
                        {title.map(|title| view! { <h2 data-ui-slot="title">{title}</h2> })}
                        {description.map(|description| view! { <p data-ui-slot="description">{description}</p> })}
                    </header>
                }
            })}
            <div data-ui-slot="body">{children()}</div>
        </section>
    }
}

#[component]
/// Card surface for demo tiles and summaries.
pub fn Card(
    #[prop(default = SurfaceVariant::Standard)] variant: SurfaceVariant,
    #[prop(default = Elevation::Raised)] elevation: Elevation,
    #[prop(default = LayoutPadding::Md)] padding: LayoutPadding,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <article
            class=merge_layout_class("ui-card", layout_class)
            data-ui-primitive="true"
            data-ui-kind="card"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-elevation=elevation.token()
            data-ui-padding=padding.token()
        >
            {children()}
        </article>
    }
}

#[component]
/// Shared text primitive.
pub fn Text(
    #[prop(default = TextRole::Body)] role: TextRole,
    #[prop(default = TextTone::Primary)] tone: TextTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <span
            class=merge_layout_class("ui-text", layout_class)
            data-ui-primitive="true"
            data-ui-kind="text"
            data-ui-slot=ui_slot
            data-ui-variant=role.token()
            data-ui-tone=tone.token()
        >
            {children()}
        </span>
    }
}

#[component]
/// Shared heading primitive. `level` is clamped to `1..=4`.
pub fn Heading(
    #[prop(default = 2)] level: u8,
    #[prop(default = TextTone::Primary)] tone: TextTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let level = level.clamp(1, 4);

    view! {
        <div
            class=merge_layout_class("ui-heading", layout_class)
            role="heading"
            aria-level=level
            data-ui-primitive="true"
            data-ui-kind="heading"
            data-ui-slot=ui_slot
            data-ui-level=level
            data-ui-tone=tone.token()
        >
            {children()}
        </div>
    }
}

#[component]
/// Compact status badge primitive.
pub fn Badge(
    #[prop(default = TextTone::Secondary)] tone: TextTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <span
            class=merge_layout_class("ui-badge", layout_class)
            aria-label=move || aria_label.get()
            data-ui-primitive="true"
            data-ui-kind="badge"
            data-ui-slot=ui_slot
            data-ui-tone=tone.token()
        >
            {children()}
        </span>
    }
}

#[component]
/// Empty state content block.
pub fn EmptyState(
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-empty-state", layout_class)
            role="status"
            data-ui-primitive="true"
            data-ui-kind="empty-state"
        >
            {children()}
        </div>
    }
}

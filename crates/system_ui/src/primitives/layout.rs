use super::*;

#[component]
/// Vertical layout stack.
pub fn Stack(
    #[prop(default = LayoutGap::Md)] gap: LayoutGap,
    #[prop(default = LayoutAlign::Stretch)] align: LayoutAlign,
    #[prop(default = LayoutPadding::None)] padding: LayoutPadding,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-stack", layout_class)
            data-ui-primitive="true"
            data-ui-kind="stack"
            data-ui-slot=ui_slot
            data-ui-gap=gap.token()
            data-ui-align=align.token()
            data-ui-padding=padding.token()
        >
            {children()}
        </div>
    }
}

#[component]
/// Horizontal cluster; wraps unless `nowrap` is set.
pub fn Cluster(
    #[prop(default = LayoutGap::Md)] gap: LayoutGap,
    #[prop(default = LayoutAlign::Center)] align: LayoutAlign,
    #[prop(default = LayoutJustify::Start)] justify: LayoutJustify,
    #[prop(optional)] nowrap: bool,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-cluster", layout_class)
            data-ui-primitive="true"
            data-ui-kind="cluster"
            data-ui-slot=ui_slot
            data-ui-gap=gap.token()
            data-ui-align=align.token()
            data-ui-justify=justify.token()
            data-ui-wrap=bool_token(!nowrap)
        >
            {children()}
        </div>
    }
}

#[component]
/// Responsive grid. `columns` caps the column count on wide viewports.
pub fn Grid(
    #[prop(default = LayoutGap::Md)] gap: LayoutGap,
    #[prop(optional)] columns: Option<u8>,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-grid", layout_class)
            data-ui-primitive="true"
            data-ui-kind="grid"
            data-ui-slot=ui_slot
            data-ui-gap=gap.token()
            data-ui-columns=columns
        >
            {children()}
        </div>
    }
}

#[component]
/// Page frame with a title block above the content.
pub fn Page(
    #[prop(into)] title: String,
    #[prop(optional, into)] description: Option<String>,
    #[prop(default = LayoutPadding::Lg)] padding: LayoutPadding,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <main
            class=merge_layout_class("ui-page", layout_class)
            data-ui-primitive="true"
            data-ui-kind="page"
            data-ui-padding=padding.token()
        >
            <header data-ui-slot="header">
                <h1 data-ui-slot="title">{title}</h1>
                {description.map(|description| view! { <p data-ui-slot="description">{description}</p> })}
            </header>
            <div data-ui-slot="content">{children()}</div>
        </main>
    }
}

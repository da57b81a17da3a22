//! Shared control, overlay, feedback, navigation, and layout primitives.

use leptos::ev::{FocusEvent, KeyboardEvent, MouseEvent};
use leptos::*;

mod controls;
mod data_display;
mod feedback;
mod layout;
mod navigation;
mod overlays;

pub use controls::{
    Button, CheckboxField, FieldGroup, RadioField, SelectField, SelectOption, TextArea, TextField,
};
pub use data_display::{Badge, Card, EmptyState, Heading, Panel, Surface, Text};
pub use feedback::{Spinner, ToastRegion, ToastSurface, Tooltip};
pub use layout::{Cluster, Grid, Page, Stack};
pub use navigation::{Tab, TabList, ToolBar};
pub use overlays::{MenuSurface, Modal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Semantic surface variants for structural primitives.
pub enum SurfaceVariant {
    /// Primary surface.
    #[default]
    Standard,
    /// Secondary or muted surface.
    Muted,
    /// Inset surface.
    Inset,
}

impl SurfaceVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Muted => "muted",
            Self::Inset => "inset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Semantic elevation levels for shared primitives.
pub enum Elevation {
    /// Flat surface.
    #[default]
    Flat,
    /// Raised surface.
    Raised,
    /// Overlay surface.
    Overlay,
}

impl Elevation {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Raised => "raised",
            Self::Overlay => "overlay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared button variants.
pub enum ButtonVariant {
    /// Standard action button.
    #[default]
    Standard,
    /// Primary emphasized action button.
    Primary,
    /// Secondary outlined action button.
    Secondary,
    /// Quiet/toggle style button.
    Quiet,
    /// Danger/destructive button.
    Danger,
}

impl ButtonVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Quiet => "quiet",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared button sizing tokens.
pub enum ButtonSize {
    /// Dense button.
    Sm,
    /// Default button.
    #[default]
    Md,
    /// Large button.
    Lg,
}

impl ButtonSize {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared input-field variants.
pub enum FieldVariant {
    /// Standard input.
    #[default]
    Standard,
    /// Inset/editor input.
    Inset,
}

impl FieldVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Inset => "inset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Bounded modal widths.
pub enum ModalSize {
    /// Narrow confirmation dialogs.
    Sm,
    /// Default form dialogs.
    #[default]
    Md,
    /// Wide forms.
    Lg,
    /// Near full-width content.
    Xl,
}

impl ModalSize {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared text roles.
pub enum TextRole {
    /// Body text.
    #[default]
    Body,
    /// Label text.
    Label,
    /// Caption text.
    Caption,
    /// Title text.
    Title,
    /// Monospace/code text.
    Code,
}

impl TextRole {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Label => "label",
            Self::Caption => "caption",
            Self::Title => "title",
            Self::Code => "code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared text and feedback tone.
pub enum TextTone {
    /// Primary text.
    #[default]
    Primary,
    /// Secondary text.
    Secondary,
    /// Accent text.
    Accent,
    /// Success/status tone.
    Success,
    /// Warning tone.
    Warning,
    /// Danger tone.
    Danger,
}

impl TextTone {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Side of the anchor a tooltip opens on.
pub enum TooltipPlacement {
    /// Above the anchor.
    #[default]
    Top,
    /// Below the anchor.
    Bottom,
    /// Before the anchor in the inline direction.
    Start,
    /// After the anchor in the inline direction.
    End,
}

impl TooltipPlacement {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared layout gap tokens.
pub enum LayoutGap {
    /// No gap.
    None,
    /// Small gap.
    Sm,
    /// Default gap.
    #[default]
    Md,
    /// Large gap.
    Lg,
}

impl LayoutGap {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared layout padding tokens.
pub enum LayoutPadding {
    /// No padding.
    None,
    /// Compact padding.
    Sm,
    /// Default padding.
    #[default]
    Md,
    /// Spacious padding.
    Lg,
}

impl LayoutPadding {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared layout alignment tokens.
pub enum LayoutAlign {
    /// Stretch/fill alignment.
    #[default]
    Stretch,
    /// Start alignment.
    Start,
    /// Center alignment.
    Center,
    /// End alignment.
    End,
}

impl LayoutAlign {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared layout justification tokens.
pub enum LayoutJustify {
    /// Start justification.
    #[default]
    Start,
    /// Center justification.
    Center,
    /// Space between items.
    Between,
    /// End justification.
    End,
}

impl LayoutJustify {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::Between => "between",
            Self::End => "end",
        }
    }
}

pub(crate) fn merge_layout_class(base: &'static str, layout_class: Option<&'static str>) -> String {
    match layout_class {
        Some(layout_class) if !layout_class.is_empty() => format!("{base} {layout_class}"),
        _ => base.to_string(),
    }
}

pub(crate) fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// `data-ui-state` token for a control: busy wins over selection.
pub(crate) fn control_state_token(busy: bool, selected: bool) -> &'static str {
    if busy {
        "busy"
    } else if selected {
        "selected"
    } else {
        "idle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_class_is_appended_only_when_present() {
        assert_eq!(merge_layout_class("ui-button", None), "ui-button");
        assert_eq!(merge_layout_class("ui-button", Some("")), "ui-button");
        assert_eq!(
            merge_layout_class("ui-button", Some("dialog-footer-action")),
            "ui-button dialog-footer-action"
        );
    }

    #[test]
    fn busy_state_wins_over_selection() {
        assert_eq!(control_state_token(true, true), "busy");
        assert_eq!(control_state_token(false, true), "selected");
        assert_eq!(control_state_token(false, false), "idle");
    }

    #[test]
    fn size_tokens_are_stable() {
        assert_eq!(ModalSize::default().token(), "md");
        assert_eq!(ModalSize::Xl.token(), "xl");
        assert_eq!(TooltipPlacement::End.token(), "end");
    }
}

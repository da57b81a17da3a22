//! Shared UI primitive library for the widget kit and its example site.
//!
//! The crate owns reusable Leptos primitives and the stable `data-ui-*` DOM contract consumed
//! by stylesheets. Widgets should compose these primitives instead of emitting ad hoc control
//! markup; styling lives outside the crate and keys off `data-ui-kind`, `data-ui-variant`,
//! `data-ui-state`, and the other `data-ui-*` tokens.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod primitives;

pub use primitives::{
    Badge, Button, ButtonSize, ButtonVariant, Card, CheckboxField, Cluster, Elevation, EmptyState,
    FieldGroup, FieldVariant, Grid, Heading, LayoutAlign, LayoutGap, LayoutJustify, LayoutPadding,
    MenuSurface, Modal, ModalSize, Page, Panel, RadioField, SelectField, SelectOption, Spinner,
    Stack, Surface, SurfaceVariant, Tab, TabList, Text, TextArea, TextField, TextRole, TextTone,
    ToastRegion, ToastSurface, ToolBar, Tooltip, TooltipPlacement,
};

/// Convenience imports for crates consuming the shared primitive set.
pub mod prelude {
    pub use crate::{
        Badge, Button, ButtonSize, ButtonVariant, Card, CheckboxField, Cluster, Elevation,
        EmptyState, FieldGroup, FieldVariant, Grid, Heading, LayoutAlign, LayoutGap, LayoutJustify,
        LayoutPadding, MenuSurface, Modal, ModalSize, Page, Panel, RadioField, SelectField,
        SelectOption, Spinner, Stack, Surface, SurfaceVariant, Tab, TabList, Text, TextArea,
        TextField, TextRole, TextTone, ToastRegion, ToastSurface, ToolBar, Tooltip,
        TooltipPlacement,
    };
}

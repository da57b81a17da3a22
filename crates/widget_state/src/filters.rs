//! Declarative filter schema and URL-query coercion.
//!
//! Each [`FilterConfig`] names a URL query parameter and a field kind. The kind decides how the
//! parameter string becomes a typed [`FilterValue`] and back, and whether edits are debounced.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::{QueryPatch, QuerySnapshot};

mod session;
mod value;

pub use session::FilterSession;
pub use value::{FilterValue, ParseError};

/// Form state keyed by query parameter.
pub type FilterValues = BTreeMap<String, FilterValue>;

/// Select value meaning "no filter"; it clears the parameter instead of being stored.
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Field kind of a filter.
pub enum FilterKind {
    /// Single-line text.
    Text,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// URL.
    Url,
    /// Search box.
    Search,
    /// Numeric input.
    Number,
    /// Calendar date.
    Date,
    /// Local date and time.
    DatetimeLocal,
    /// Multi-line text.
    Textarea,
    /// Single choice dropdown.
    Select,
    /// Multiple choice dropdown.
    Multiselect,
    /// Single boolean checkbox.
    Checkbox,
    /// Multiple checkboxes.
    CheckboxGroup,
    /// Single radio choice.
    Radio,
    /// Radio button group.
    RadioGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Value shape a kind produces.
pub enum ValueShape {
    /// Free text or a single choice.
    Text,
    /// Parsed number.
    Number,
    /// Boolean flag.
    Flag,
    /// List of choices.
    List,
}

impl FilterKind {
    /// Stable token for DOM attributes.
    pub fn token(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Search => "search",
            Self::Number => "number",
            Self::Date => "date",
            Self::DatetimeLocal => "datetime-local",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Checkbox => "checkbox",
            Self::CheckboxGroup => "checkbox-group",
            Self::Radio => "radio",
            Self::RadioGroup => "radio-group",
        }
    }

    /// Whether edits are debounced before reaching the URL.
    pub fn is_debounced(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Email | Self::Phone | Self::Number | Self::Search | Self::Url
        )
    }

    /// Value shape produced by this kind.
    pub fn shape(self) -> ValueShape {
        match self {
            Self::Number => ValueShape::Number,
            Self::Checkbox => ValueShape::Flag,
            Self::Multiselect | Self::CheckboxGroup => ValueShape::List,
            _ => ValueShape::Text,
        }
    }

    /// Whether the kind renders from an option list.
    pub fn uses_options(self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::Multiselect
                | Self::CheckboxGroup
                | Self::Radio
                | Self::RadioGroup
        )
    }

    /// HTML `input` type for input-backed kinds.
    pub fn input_type(self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Email => Some("email"),
            Self::Phone => Some("tel"),
            Self::Url => Some("url"),
            Self::Search => Some("search"),
            Self::Number => Some("number"),
            Self::Date => Some("date"),
            Self::DatetimeLocal => Some("datetime-local"),
            _ => None,
        }
    }

    /// Empty value for this kind: `""`, `false`, or `[]`.
    pub fn empty_value(self) -> FilterValue {
        match self.shape() {
            ValueShape::Text | ValueShape::Number => FilterValue::Text(String::new()),
            ValueShape::Flag => FilterValue::Flag(false),
            ValueShape::List => FilterValue::List(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Label/value choice for option-backed kinds.
pub struct FilterOption {
    /// Display label.
    pub label: String,
    /// Value written to the URL.
    pub value: String,
}

impl FilterOption {
    /// Creates an option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One declared filter field.
pub struct FilterConfig {
    /// Display label.
    pub name: String,
    /// URL query key; unique within a [`FiltersConfig`].
    pub param: String,
    /// Field kind.
    #[serde(rename = "type")]
    pub kind: FilterKind,
    /// Choices for option-backed kinds.
    #[serde(default)]
    pub options: Vec<FilterOption>,
    /// Numeric lower bound.
    #[serde(default)]
    pub min: Option<f64>,
    /// Numeric upper bound.
    #[serde(default)]
    pub max: Option<f64>,
    /// Numeric step.
    #[serde(default)]
    pub step: Option<f64>,
    /// Input placeholder.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Helper text under the field.
    #[serde(default)]
    pub helper_text: Option<String>,
    /// Marks the field as required.
    #[serde(default)]
    pub required: bool,
    /// Disables the field.
    #[serde(default)]
    pub disabled: bool,
    /// Value used when the parameter is absent or malformed.
    #[serde(default)]
    pub default_value: Option<FilterValue>,
}

impl FilterConfig {
    /// Creates a field with no options or constraints.
    pub fn new(name: impl Into<String>, param: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            name: name.into(),
            param: param.into(),
            kind,
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
            placeholder: None,
            helper_text: None,
            required: false,
            disabled: false,
            default_value: None,
        }
    }

    /// Sets the option list.
    pub fn options(mut self, options: impl IntoIterator<Item = FilterOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    /// Sets numeric bounds.
    pub fn range(mut self, min: Option<f64>, max: Option<f64>, step: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self.step = step;
        self
    }

    /// Sets the placeholder.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the helper text.
    pub fn helper_text(mut self, helper_text: impl Into<String>) -> Self {
        self.helper_text = Some(helper_text.into());
        self
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Disables the field.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Sets the default value.
    pub fn default_value(mut self, value: FilterValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Value used when the URL has nothing usable for this field.
    pub fn fallback_value(&self) -> FilterValue {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.kind.empty_value())
    }

    /// Parses a raw parameter per this field's kind, clamping numbers to `min`/`max`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed numbers or booleans.
    pub fn parse(&self, raw: &str) -> Result<FilterValue, ParseError> {
        match FilterValue::parse(self.kind.shape(), raw)? {
            FilterValue::Number(number) => {
                let lower = self.min.unwrap_or(f64::NEG_INFINITY);
                let upper = self.max.unwrap_or(f64::INFINITY);
                Ok(FilterValue::Number(number.max(lower).min(upper)))
            }
            other => Ok(other),
        }
    }

    /// Initial value for this field given the raw parameter, falling back on absence or error.
    pub fn initial_value(&self, raw: Option<&str>) -> Result<FilterValue, (FilterValue, ParseError)> {
        match raw {
            None => Ok(self.fallback_value()),
            Some(raw) => self
                .parse(raw)
                .map_err(|error| (self.fallback_value(), error)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Filter presentation.
pub enum FilterLayout {
    /// Every field inline and always visible.
    #[default]
    Tabs,
    /// Fields behind a toggle button in a closable panel.
    Dropdown,
}

impl FilterLayout {
    /// Stable token for DOM attributes.
    pub fn token(self) -> &'static str {
        match self {
            Self::Tabs => "tabs",
            Self::Dropdown => "dropdown",
        }
    }
}

#[derive(Debug, Error)]
/// Schema errors that prevent a filter session from starting.
pub enum FilterSchemaError {
    /// Two fields share a query parameter.
    #[error("filter parameter `{0}` is declared more than once")]
    DuplicateParam(String),
    /// A field declares an empty query parameter.
    #[error("filter `{0}` has an empty parameter name")]
    EmptyParam(String),
    /// A value was set for a parameter the schema does not declare.
    #[error("filter parameter `{0}` is not declared")]
    UnknownParam(String),
    /// JSON schema could not be decoded.
    #[error("filter schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Non-fatal schema problems reported by [`FiltersConfig::validate`].
pub enum FilterSchemaIssue {
    /// An option-backed field has no options and renders an empty list.
    MissingOptions {
        /// Affected parameter.
        param: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Parameter that failed to parse while reading the URL.
pub struct ParseIssue {
    /// Affected parameter.
    pub param: String,
    /// Raw value from the URL.
    pub raw: String,
    /// Parse failure.
    pub error: ParseError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Ordered filter schema plus display options.
pub struct FiltersConfig {
    /// Declared fields in display order.
    pub filters: Vec<FilterConfig>,
    /// Presentation mode.
    pub layout: FilterLayout,
    /// Shows the reset action.
    pub show_reset: bool,
    /// Shows an explicit apply button.
    pub show_apply_button: bool,
    /// Reset button label.
    pub reset_label: String,
    /// Apply button label.
    pub apply_label: String,
    /// Dropdown toggle label.
    pub toggle_label: String,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            layout: FilterLayout::Tabs,
            show_reset: true,
            show_apply_button: false,
            reset_label: "Reset".to_string(),
            apply_label: "Apply".to_string(),
            toggle_label: "Filters".to_string(),
        }
    }
}

impl FiltersConfig {
    /// Creates a schema with default display options.
    pub fn new(filters: impl IntoIterator<Item = FilterConfig>) -> Self {
        Self {
            filters: filters.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Decodes a schema from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or an invalid schema.
    pub fn from_json(raw: &str) -> Result<Self, FilterSchemaError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the presentation mode.
    pub fn layout(mut self, layout: FilterLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Shows or hides the reset action.
    pub fn show_reset(mut self, show: bool) -> Self {
        self.show_reset = show;
        self
    }

    /// Shows or hides the apply button.
    pub fn show_apply_button(mut self, show: bool) -> Self {
        self.show_apply_button = show;
        self
    }

    /// Checks parameter uniqueness and reports non-fatal issues.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or duplicated parameters.
    pub fn validate(&self) -> Result<Vec<FilterSchemaIssue>, FilterSchemaError> {
        let mut seen = HashSet::new();
        let mut issues = Vec::new();
        for filter in &self.filters {
            if filter.param.trim().is_empty() {
                return Err(FilterSchemaError::EmptyParam(filter.name.clone()));
            }
            if !seen.insert(filter.param.as_str()) {
                return Err(FilterSchemaError::DuplicateParam(filter.param.clone()));
            }
            if filter.kind.uses_options() && filter.options.is_empty() {
                issues.push(FilterSchemaIssue::MissingOptions {
                    param: filter.param.clone(),
                });
            }
        }
        Ok(issues)
    }

    /// Field declared for `param`.
    pub fn filter(&self, param: &str) -> Option<&FilterConfig> {
        self.filters.iter().find(|filter| filter.param == param)
    }

    /// Form state derived from the URL, plus any parameters that failed to parse.
    pub fn values_from_query(&self, query: &QuerySnapshot) -> (FilterValues, Vec<ParseIssue>) {
        let mut values = FilterValues::new();
        let mut issues = Vec::new();
        for filter in &self.filters {
            let raw = query.get(&filter.param);
            let value = match filter.initial_value(raw) {
                Ok(value) => value,
                Err((fallback, error)) => {
                    issues.push(ParseIssue {
                        param: filter.param.clone(),
                        raw: raw.unwrap_or_default().to_string(),
                        error,
                    });
                    fallback
                }
            };
            values.insert(filter.param.clone(), value);
        }
        (values, issues)
    }

    /// Form state with every field at its kind's empty value.
    pub fn empty_values(&self) -> FilterValues {
        self.filters
            .iter()
            .map(|filter| (filter.param.clone(), filter.kind.empty_value()))
            .collect()
    }

    /// Batched write removing every declared parameter.
    pub fn reset_patch(&self) -> QueryPatch {
        self.filters
            .iter()
            .fold(QueryPatch::new(), |patch, filter| {
                patch.with(filter.param.clone(), None)
            })
    }

    /// Number of declared fields whose parameter is present and non-empty.
    pub fn active_count(&self, query: &QuerySnapshot) -> usize {
        self.filters
            .iter()
            .filter(|filter| query.is_active(&filter.param))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn schema() -> FiltersConfig {
        FiltersConfig::new([
            FilterConfig::new("Search", "q", FilterKind::Search),
            FilterConfig::new("Status", "status", FilterKind::Select).options([
                FilterOption::new("All", "all"),
                FilterOption::new("Open", "open"),
            ]),
            FilterConfig::new("Tags", "tags", FilterKind::Multiselect)
                .options([FilterOption::new("A", "a"), FilterOption::new("B", "b")]),
            FilterConfig::new("Archived", "archived", FilterKind::Checkbox),
            FilterConfig::new("Min price", "min_price", FilterKind::Number)
                .range(Some(0.0), Some(1000.0), Some(1.0))
                .default_value(FilterValue::Number(10.0)),
        ])
    }

    #[test]
    fn duplicate_params_are_rejected() {
        let config = FiltersConfig::new([
            FilterConfig::new("A", "x", FilterKind::Text),
            FilterConfig::new("B", "x", FilterKind::Date),
        ]);
        assert!(matches!(
            config.validate(),
            Err(FilterSchemaError::DuplicateParam(param)) if param == "x"
        ));
    }

    #[test]
    fn option_kinds_without_options_are_reported() {
        let config = FiltersConfig::new([FilterConfig::new("Kind", "kind", FilterKind::Radio)]);
        assert_eq!(
            config.validate().expect("valid"),
            vec![FilterSchemaIssue::MissingOptions {
                param: "kind".to_string()
            }]
        );
    }

    #[test]
    fn values_are_coerced_per_kind() {
        let query = QuerySnapshot::from_pairs([
            ("q", "shoes"),
            ("tags", "a,b"),
            ("archived", "true"),
            ("min_price", "25"),
        ]);
        let (values, issues) = schema().values_from_query(&query);

        assert!(issues.is_empty());
        assert_eq!(values["q"], FilterValue::Text("shoes".to_string()));
        assert_eq!(values["status"], FilterValue::Text(String::new()));
        assert_eq!(
            values["tags"],
            FilterValue::List(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(values["archived"], FilterValue::Flag(true));
        assert_eq!(values["min_price"], FilterValue::Number(25.0));
    }

    #[test]
    fn malformed_number_falls_back_to_default() {
        let query = QuerySnapshot::from_pairs([("min_price", "cheap")]);
        let (values, issues) = schema().values_from_query(&query);

        assert_eq!(values["min_price"], FilterValue::Number(10.0));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].param, "min_price");
        assert_eq!(issues[0].raw, "cheap");
    }

    #[test]
    fn numbers_are_clamped_to_bounds() {
        let query = QuerySnapshot::from_pairs([("min_price", "5000")]);
        let (values, _) = schema().values_from_query(&query);
        assert_eq!(values["min_price"], FilterValue::Number(1000.0));
    }

    #[test]
    fn active_count_counts_present_non_empty_params() {
        let query = QuerySnapshot::from_pairs([
            ("q", "x"),
            ("status", ""),
            ("tags", "a"),
            ("unrelated", "1"),
        ]);
        assert_eq!(schema().active_count(&query), 2);
    }

    #[test]
    fn reset_patch_removes_every_declared_param() {
        let query = QuerySnapshot::from_pairs([("q", "x"), ("tags", "a"), ("page", "3")]);
        let cleared = query.with_patch(&schema().reset_patch());
        assert_eq!(cleared, QuerySnapshot::from_pairs([("page", "3")]));
    }

    #[test]
    fn schema_loads_from_json() {
        let config = FiltersConfig::from_json(
            r#"{
                "layout": "dropdown",
                "show_apply_button": true,
                "filters": [
                    {"name": "When", "param": "when", "type": "datetime-local"},
                    {"name": "Groups", "param": "groups", "type": "checkbox-group",
                     "options": [{"label": "Ops", "value": "ops"}],
                     "default_value": ["ops"]}
                ]
            }"#,
        )
        .expect("schema");

        assert_eq!(config.layout, FilterLayout::Dropdown);
        assert!(config.show_reset);
        assert_eq!(config.filters[0].kind, FilterKind::DatetimeLocal);
        assert_eq!(
            config.filters[1].fallback_value(),
            FilterValue::List(vec!["ops".to_string()])
        );
    }
}

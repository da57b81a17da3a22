use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ValueShape, ALL_SENTINEL};

#[derive(Debug, Clone, PartialEq, Error)]
/// Raw parameter that does not match its field's value shape.
pub enum ParseError {
    /// Not a finite number.
    #[error("`{0}` is not a number")]
    InvalidNumber(String),
    /// Not `true` or `false`.
    #[error("`{0}` is not `true` or `false`")]
    InvalidFlag(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Typed filter field value.
pub enum FilterValue {
    /// Checkbox state.
    Flag(bool),
    /// Numeric value.
    Number(f64),
    /// Text or single choice.
    Text(String),
    /// Multiple choices.
    List(Vec<String>),
}

impl FilterValue {
    /// Parses a raw parameter into `shape`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when a number or flag is malformed.
    pub fn parse(shape: ValueShape, raw: &str) -> Result<Self, ParseError> {
        match shape {
            ValueShape::Text => Ok(Self::Text(raw.to_string())),
            ValueShape::List => Ok(Self::List(
                raw.split(',')
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            ValueShape::Flag => match raw {
                "true" => Ok(Self::Flag(true)),
                "false" => Ok(Self::Flag(false)),
                other => Err(ParseError::InvalidFlag(other.to_string())),
            },
            ValueShape::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Self::Number)
                .ok_or_else(|| ParseError::InvalidNumber(raw.to_string())),
        }
    }

    /// URL representation; `None` removes the parameter.
    ///
    /// Empty lists, empty text, and the `"all"` sentinel clear the parameter; flags become
    /// `"true"`/`"false"`; lists are comma-joined.
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            Self::List(items) if items.is_empty() => None,
            Self::List(items) => Some(items.join(",")),
            Self::Text(text) if text.is_empty() || text == ALL_SENTINEL => None,
            Self::Text(text) => Some(text.clone()),
            Self::Flag(flag) => Some(flag.to_string()),
            Self::Number(number) if number.is_finite() => Some(number.to_string()),
            Self::Number(_) => None,
        }
    }

    /// Text for binding to an input's `value`.
    pub fn as_input_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
            Self::Flag(flag) => flag.to_string(),
            Self::List(items) => items.join(","),
        }
    }

    /// Checkbox state; `false` for other shapes.
    pub fn as_flag(&self) -> bool {
        matches!(self, Self::Flag(true))
    }

    /// Chosen items; a single text value counts as one item.
    pub fn as_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Text(text) if !text.is_empty() => vec![text.clone()],
            _ => Vec::new(),
        }
    }

    /// Whether the value clears its parameter.
    pub fn is_cleared(&self) -> bool {
        self.to_query_value().is_none()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn list_joins_and_empty_list_clears() {
        let tags = FilterValue::List(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(tags.to_query_value().as_deref(), Some("a,b"));
        assert_eq!(FilterValue::List(Vec::new()).to_query_value(), None);
    }

    #[test]
    fn empty_text_and_all_sentinel_clear() {
        assert_eq!(FilterValue::Text(String::new()).to_query_value(), None);
        assert_eq!(FilterValue::Text("all".to_string()).to_query_value(), None);
        assert_eq!(
            FilterValue::Text("open".to_string()).to_query_value().as_deref(),
            Some("open")
        );
    }

    #[test]
    fn flags_and_numbers_use_literal_strings() {
        assert_eq!(FilterValue::Flag(false).to_query_value().as_deref(), Some("false"));
        assert_eq!(FilterValue::Number(5.0).to_query_value().as_deref(), Some("5"));
        assert_eq!(FilterValue::Number(2.5).to_query_value().as_deref(), Some("2.5"));
        assert_eq!(FilterValue::Number(f64::NAN).to_query_value(), None);
    }

    #[test]
    fn list_parse_skips_empty_segments() {
        assert_eq!(
            FilterValue::parse(ValueShape::List, "a,,b,"),
            Ok(FilterValue::List(vec!["a".to_string(), "b".to_string()]))
        );
    }

    #[test]
    fn malformed_numbers_and_flags_are_errors() {
        assert_eq!(
            FilterValue::parse(ValueShape::Number, "NaN"),
            Err(ParseError::InvalidNumber("NaN".to_string()))
        );
        assert_eq!(
            FilterValue::parse(ValueShape::Number, ""),
            Err(ParseError::InvalidNumber(String::new()))
        );
        assert_eq!(
            FilterValue::parse(ValueShape::Flag, "yes"),
            Err(ParseError::InvalidFlag("yes".to_string()))
        );
    }
}

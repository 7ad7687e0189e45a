//! Query payload types handed to the widget by the host on every update.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw cell value. Hosts send whatever the query produced, so nothing here is
/// guaranteed to be numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric view used when plotting: numbers pass through, text is accepted
    /// only when the whole string is a number.
    pub fn plot_value(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Null | CellValue::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Numeric view used by aggregation. Follows leading-prefix float parsing:
    /// `"12abc"` is 12, `"abc"` is nothing.
    pub fn parse_leading_float(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_nan() => None,
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => leading_float(s),
            CellValue::Null | CellValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            // f64 Display already drops a trailing `.0`.
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

fn leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // An exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// One value within a row: the raw value plus an optional host-rendered string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            rendered: None,
        }
    }

    pub fn rendered<T: Into<String>>(value: CellValue, rendered: T) -> Self {
        Self {
            value,
            rendered: Some(rendered.into()),
        }
    }

    /// Display text for an axis label: the rendered string when it is non-empty,
    /// otherwise the raw value.
    pub fn label(&self) -> String {
        match self.rendered.as_deref() {
            Some(rendered) if !rendered.is_empty() => rendered.to_string(),
            _ => self.value.to_string(),
        }
    }
}

/// A result row keyed by field name.
pub type Row = HashMap<String, Cell>;

/// Describes one dimension or measure column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_format: Option<String>,
}

impl Field {
    pub fn new<T: Into<String>>(name: T, label: T) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            value_format: None,
        }
    }

    pub fn with_value_format<T: Into<String>>(mut self, format: T) -> Self {
        self.value_format = Some(format.into());
        self
    }

    /// Label shown to users; falls back to the field name when the host left it blank.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryFields {
    #[serde(default)]
    pub dimension_like: Vec<Field>,
    #[serde(default)]
    pub measure_like: Vec<Field>,
}

/// Field metadata for the current result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryResponse {
    #[serde(default)]
    pub fields: Option<QueryFields>,
}

impl QueryResponse {
    pub fn new(dimensions: Vec<Field>, measures: Vec<Field>) -> Self {
        Self {
            fields: Some(QueryFields {
                dimension_like: dimensions,
                measure_like: measures,
            }),
        }
    }
}

//! Widget configuration and the option descriptors exposed to the host settings UI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::t;
use crate::widget::metrics::AggregationKind;

pub const DEFAULT_CHART_COLOR: &str = "#1F77B4";
pub const DEFAULT_VALUE_FORMAT: &str = "#,##0.00";

/// Settings supplied fresh with every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    pub selected_aggregation: AggregationKind,
    pub chart_color: String,
    pub aggregation_value_format: String,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            selected_aggregation: AggregationKind::default(),
            chart_color: DEFAULT_CHART_COLOR.to_string(),
            aggregation_value_format: DEFAULT_VALUE_FORMAT.to_string(),
        }
    }
}

impl VisConfig {
    /// Read a host config object. Entries that are missing, blank or not
    /// understood keep their default instead of failing the whole update.
    pub fn from_json(raw: &Value) -> Self {
        let mut config = Self::default();
        let Some(map) = raw.as_object() else {
            if !raw.is_null() {
                tracing::warn!("config is not an object; using defaults");
            }
            return config;
        };

        if let Some(name) = non_empty_str(map.get("selected_aggregation")) {
            match name.parse::<AggregationKind>() {
                Ok(kind) => config.selected_aggregation = kind,
                Err(err) => tracing::warn!("{err}; falling back to {}", config.selected_aggregation),
            }
        }
        if let Some(color) = non_empty_str(map.get("chart_color")) {
            config.chart_color = color.to_string();
        }
        // An explicitly blank format defers to the measure's own value format.
        if let Some(format) = map.get("aggregation_value_format").and_then(Value::as_str) {
            config.aggregation_value_format = format.trim().to_string();
        }

        config
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionDisplay {
    Select,
    Color,
    Text,
}

/// One `{label: value}` entry of a select option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub label: String,
    pub value: String,
}

/// Descriptor for one configurable setting, in the shape host settings panels expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub key: &'static str,
    #[serde(rename = "type")]
    pub value_type: &'static str,
    pub label: String,
    pub display: OptionDisplay,
    pub default: String,
    pub section: String,
    pub order: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<OptionChoice>,
}

/// All settings, ordered by `order`.
pub fn options() -> Vec<OptionSpec> {
    let defaults = VisConfig::default();
    vec![
        OptionSpec {
            key: "selected_aggregation",
            value_type: "string",
            label: t!("option-aggregation-label"),
            display: OptionDisplay::Select,
            default: defaults.selected_aggregation.to_string(),
            section: t!("section-aggregation"),
            order: 2,
            values: AggregationKind::ALL
                .iter()
                .map(|kind| OptionChoice {
                    label: kind.display_label(),
                    value: kind.to_string(),
                })
                .collect(),
        },
        OptionSpec {
            key: "chart_color",
            value_type: "string",
            label: t!("option-color-label"),
            display: OptionDisplay::Color,
            default: defaults.chart_color,
            section: t!("section-chart"),
            order: 3,
            values: Vec::new(),
        },
        OptionSpec {
            key: "aggregation_value_format",
            value_type: "string",
            label: t!("option-format-label"),
            display: OptionDisplay::Text,
            default: defaults.aggregation_value_format,
            section: t!("section-aggregation"),
            order: 4,
            values: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_settings_surface() {
        let config = VisConfig::default();
        assert_eq!(config.selected_aggregation, AggregationKind::Avg);
        assert_eq!(config.chart_color, "#1F77B4");
        assert_eq!(config.aggregation_value_format, "#,##0.00");
    }

    #[test]
    fn from_json_keeps_defaults_for_blank_or_unknown_entries() {
        let config = VisConfig::from_json(&json!({
            "selected_aggregation": "mode",
            "chart_color": "",
            "aggregation_value_format": "0.0%"
        }));
        assert_eq!(config.selected_aggregation, AggregationKind::Avg);
        assert_eq!(config.chart_color, DEFAULT_CHART_COLOR);
        assert_eq!(config.aggregation_value_format, "0.0%");

        let config = VisConfig::from_json(&json!({ "selected_aggregation": "median", "chart_color": "#ff0000" }));
        assert_eq!(config.selected_aggregation, AggregationKind::Median);
        assert_eq!(config.chart_color, "#ff0000");
        assert_eq!(config.aggregation_value_format, DEFAULT_VALUE_FORMAT);

        let config = VisConfig::from_json(&json!({ "aggregation_value_format": "  " }));
        assert_eq!(config.aggregation_value_format, "");

        assert_eq!(VisConfig::from_json(&Value::Null), VisConfig::default());
        assert_eq!(VisConfig::from_json(&json!([1, 2])), VisConfig::default());
    }

    #[test]
    fn serde_roundtrip_uses_lowercase_names() {
        let value = serde_json::to_value(VisConfig::default()).unwrap();
        assert_eq!(value["selected_aggregation"], "avg");
        let parsed: VisConfig = serde_json::from_value(json!({ "selected_aggregation": "max" })).unwrap();
        assert_eq!(parsed.selected_aggregation, AggregationKind::Max);
        assert_eq!(parsed.chart_color, DEFAULT_CHART_COLOR);
    }

    #[test]
    fn options_are_ordered_and_complete() {
        crate::i18n::use_fallback();
        let specs = options();
        let keys: Vec<_> = specs.iter().map(|s| s.key).collect();
        assert_eq!(keys, ["selected_aggregation", "chart_color", "aggregation_value_format"]);
        assert!(specs.windows(2).all(|w| w[0].order < w[1].order));

        let select = &specs[0];
        assert_eq!(select.display, OptionDisplay::Select);
        assert_eq!(select.default, "avg");
        assert_eq!(select.section, "Aggregation Settings");
        let values: Vec<_> = select.values.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["avg", "sum", "median", "min", "max"]);
        assert_eq!(select.values[0].label, "Average");

        assert_eq!(specs[1].section, "Chart Settings");
        assert_eq!(specs[2].default, "#,##0.00");

        let json = serde_json::to_value(&specs[1]).unwrap();
        assert_eq!(json["type"], "string");
        assert_eq!(json["display"], "color");
        assert!(json.get("values").is_none());
    }
}

//! Turns query rows into the chart series and the aggregation input.
//!
//! The first dimension is the time axis, the first measure is charted and the
//! second measure is aggregated into the summary number.

use crate::chart::{AxisTitles, ChartSeries, SeriesStyle};
use crate::core::config::VisConfig;
use crate::core::error::VisError;
use crate::core::query::{Cell, CellValue, Field, QueryResponse, Row};

pub const MIN_DIMENSIONS: usize = 1;
pub const MIN_MEASURES: usize = 2;

/// The three columns an update reads, borrowed from the query schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesFields<'q> {
    pub time: &'q Field,
    pub measure: &'q Field,
    pub aggregation: &'q Field,
}

/// Check that the schema carries a time dimension and two measures.
pub fn validate(query: &QueryResponse) -> Result<SeriesFields<'_>, VisError> {
    let (dimensions, measures) = query
        .fields
        .as_ref()
        .map(|f| (f.dimension_like.as_slice(), f.measure_like.as_slice()))
        .unwrap_or_default();

    match (dimensions, measures) {
        ([time, ..], [measure, aggregation, ..]) => Ok(SeriesFields {
            time,
            measure,
            aggregation,
        }),
        _ => Err(VisError::MissingFields {
            dimensions: dimensions.len(),
            measures: measures.len(),
            min_dimensions: MIN_DIMENSIONS,
            min_measures: MIN_MEASURES,
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedData {
    pub time_label: String,
    pub measure_label: String,
    pub aggregation_label: String,
    /// Format for the summary value: the configured one, else the measure's own.
    pub aggregation_value_format: Option<String>,
    pub labels: Vec<String>,
    pub chart_values: Vec<CellValue>,
    /// One entry per row; cells that are not numeric count as `0.0`.
    pub aggregation_values: Vec<f64>,
}

impl ProjectedData {
    pub fn chart_series(&self, color: &str) -> ChartSeries {
        ChartSeries {
            label: self.measure_label.clone(),
            labels: self.labels.clone(),
            points: self.chart_values.clone(),
            style: SeriesStyle::line(color),
        }
    }

    pub fn axis_titles(&self) -> AxisTitles {
        AxisTitles::new(self.time_label.as_str(), self.measure_label.as_str())
    }
}

pub fn extract(rows: &[Row], fields: &SeriesFields<'_>, config: &VisConfig) -> ProjectedData {
    let mut labels = Vec::with_capacity(rows.len());
    let mut chart_values = Vec::with_capacity(rows.len());
    let mut aggregation_values = Vec::with_capacity(rows.len());

    for row in rows {
        labels.push(row.get(&fields.time.name).map(Cell::label).unwrap_or_default());
        chart_values.push(
            row.get(&fields.measure.name)
                .map(|c| c.value.clone())
                .unwrap_or_default(),
        );
        aggregation_values.push(
            row.get(&fields.aggregation.name)
                .and_then(|c| c.value.parse_leading_float())
                .unwrap_or(0.0),
        );
    }

    let configured = config.aggregation_value_format.trim();
    let aggregation_value_format = if configured.is_empty() {
        fields.aggregation.value_format.clone()
    } else {
        Some(configured.to_string())
    };

    ProjectedData {
        time_label: fields.time.display_label().to_string(),
        measure_label: fields.measure.display_label().to_string(),
        aggregation_label: fields.aggregation.display_label().to_string(),
        aggregation_value_format,
        labels,
        chart_values,
        aggregation_values,
    }
}

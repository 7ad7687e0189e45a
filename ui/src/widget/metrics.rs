//! Aggregation kinds and the reducers behind the summary number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::t;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    Sum,
    #[default]
    Avg,
    Median,
    Min,
    Max,
}

impl AggregationKind {
    /// Order used by the host settings dropdown.
    pub const ALL: [AggregationKind; 5] = [
        AggregationKind::Avg,
        AggregationKind::Sum,
        AggregationKind::Median,
        AggregationKind::Min,
        AggregationKind::Max,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AggregationKind::Sum => "sum",
            AggregationKind::Avg => "avg",
            AggregationKind::Median => "median",
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
        }
    }

    /// Localized name for settings panels.
    pub fn display_label(self) -> String {
        match self {
            AggregationKind::Sum => t!("aggregation-sum"),
            AggregationKind::Avg => t!("aggregation-avg"),
            AggregationKind::Median => t!("aggregation-median"),
            AggregationKind::Min => t!("aggregation-min"),
            AggregationKind::Max => t!("aggregation-max"),
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown aggregation `{0}`")]
pub struct UnknownAggregation(pub String);

impl FromStr for AggregationKind {
    type Err = UnknownAggregation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sum" => Ok(AggregationKind::Sum),
            "avg" => Ok(AggregationKind::Avg),
            "median" => Ok(AggregationKind::Median),
            "min" => Ok(AggregationKind::Min),
            "max" => Ok(AggregationKind::Max),
            other => Err(UnknownAggregation(other.to_string())),
        }
    }
}

/// Reduce `values` with the selected aggregation.
///
/// Every kind returns `0.0` for an empty slice. For `Min`/`Max` that makes "no
/// rows" indistinguishable from a genuine zero; callers that care should check
/// the row count themselves.
pub fn aggregate(kind: AggregationKind, values: &[f64]) -> f64 {
    match kind {
        AggregationKind::Sum => sum(values),
        AggregationKind::Avg => mean(values),
        AggregationKind::Median => median(values),
        AggregationKind::Min => values.iter().copied().reduce(f64::min).unwrap_or(0.0),
        AggregationKind::Max => values.iter().copied().reduce(f64::max).unwrap_or(0.0),
    }
}

fn sum(data: &[f64]) -> f64 {
    data.iter().sum()
}

fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        0.0
    } else {
        sum(data) / data.len() as f64
    }
}

fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

//! Failure taxonomy for one widget update and the notification shape hosts display.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::t;

/// Reasons an update stops before anything is drawn.
///
/// Coercing a non-numeric cell to `0.0` is policy, not failure, so it has no variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisError {
    #[error("query needs at least {min_dimensions} dimension(s) and {min_measures} measure(s), got {dimensions} and {measures}")]
    MissingFields {
        dimensions: usize,
        measures: usize,
        min_dimensions: usize,
        min_measures: usize,
    },
    #[error("chart drawing capability is not available")]
    DependencyUnavailable,
    #[error("chart could not be constructed: {0}")]
    ChartConstruction(String),
}

impl VisError {
    /// Human-readable notification for the host's error display.
    pub fn notification(&self) -> ErrorNotification {
        match self {
            VisError::MissingFields { .. } => {
                ErrorNotification::new(t!("error-data-title"), t!("error-data-message"))
            }
            VisError::DependencyUnavailable => {
                ErrorNotification::new(t!("error-library-title"), t!("error-library-message"))
            }
            VisError::ChartConstruction(reason) => {
                ErrorNotification::new(t!("error-chart-title"), reason.clone())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotification {
    pub title: String,
    pub message: String,
}

impl ErrorNotification {
    pub fn new<T: Into<String>, M: Into<String>>(title: T, message: M) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_use_localized_copy() {
        crate::i18n::use_fallback();

        let missing = VisError::MissingFields {
            dimensions: 0,
            measures: 2,
            min_dimensions: 1,
            min_measures: 2,
        }
        .notification();
        assert_eq!(missing.title, "Data Error");
        assert!(missing.message.contains("two measures"));

        let library = VisError::DependencyUnavailable.notification();
        assert_eq!(library.title, "Library Missing");

        let chart = VisError::ChartConstruction("no 2d context".into()).notification();
        assert_eq!(chart.title, "Chart Error");
        assert_eq!(chart.message, "no 2d context");
    }

    #[test]
    fn display_includes_counts() {
        let err = VisError::MissingFields {
            dimensions: 1,
            measures: 0,
            min_dimensions: 1,
            min_measures: 2,
        };
        assert_eq!(
            err.to_string(),
            "query needs at least 1 dimension(s) and 2 measure(s), got 1 and 0"
        );
    }
}

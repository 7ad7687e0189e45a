//! The time-series aggregate widget: reducers, row projection, the update
//! pipeline and its Dioxus component.

pub mod engine;
pub mod metrics;
pub mod projector;

mod view;
pub use view::TimeseriesAggregate;

pub use engine::{SummaryView, UpdateContext, UpdateOutcome, Visualization};
pub use metrics::{aggregate, AggregationKind};

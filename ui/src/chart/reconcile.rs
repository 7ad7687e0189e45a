//! Keeps one chart object alive per widget instance.
//!
//! The first successful render constructs the chart; every later render swaps
//! in the new data and axis titles and asks the existing object to redraw.

use super::{ChartBackend, ChartConfig, ChartData, ChartKind, ChartObject, ChartOptions, ChartSeries};
use crate::core::error::VisError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisTitles {
    pub x: String,
    pub y: String,
}

impl AxisTitles {
    pub fn new<X: Into<String>, Y: Into<String>>(x: X, y: Y) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// The constructed chart plus how often it has been redrawn in place.
#[derive(Debug)]
pub struct ChartHandle<C> {
    chart: C,
    updates: u64,
}

impl<C: ChartObject> ChartHandle<C> {
    fn new(chart: C) -> Self {
        Self { chart, updates: 0 }
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn config(&self) -> &ChartConfig {
        self.chart.config()
    }

    /// In-place updates since construction.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

#[derive(Debug)]
pub enum ChartState<C> {
    Uninitialized,
    Active(ChartHandle<C>),
}

impl<C> Default for ChartState<C> {
    fn default() -> Self {
        ChartState::Uninitialized
    }
}

impl<C: ChartObject> ChartState<C> {
    pub fn is_active(&self) -> bool {
        matches!(self, ChartState::Active(_))
    }

    pub fn handle(&self) -> Option<&ChartHandle<C>> {
        match self {
            ChartState::Active(handle) => Some(handle),
            ChartState::Uninitialized => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    Constructed,
    Updated,
}

/// Draw `series` through `backend`, constructing the chart on first use and
/// mutating it afterwards. A failed construction leaves `state` untouched so
/// the next call tries again.
pub fn render<B: ChartBackend>(
    backend: &B,
    surface: &B::Surface,
    state: &mut ChartState<B::Chart>,
    series: ChartSeries,
    titles: &AxisTitles,
) -> Result<RenderPass, VisError> {
    let data = ChartData::from(series);

    match state {
        ChartState::Active(handle) => {
            let config = handle.chart.config_mut();
            config.data = data;
            config.options.scales.y.title.text = titles.y.clone();
            config.options.scales.x.title.text = titles.x.clone();
            handle.chart.update();
            handle.updates += 1;
            tracing::debug!(updates = handle.updates, "chart updated in place");
            Ok(RenderPass::Updated)
        }
        ChartState::Uninitialized => {
            let config = ChartConfig {
                kind: ChartKind::Line,
                data,
                options: ChartOptions::time_series(titles),
            };
            let chart = backend.construct(surface, config)?;
            *state = ChartState::Active(ChartHandle::new(chart));
            tracing::info!("chart constructed");
            Ok(RenderPass::Constructed)
        }
    }
}

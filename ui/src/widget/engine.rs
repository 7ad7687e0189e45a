//! One widget instance and its per-update pipeline.
//!
//! `Visualization` owns everything that survives between updates: the chart
//! state, the errors currently shown and the last summary. Hosts call
//! [`Visualization::update`] whenever data or settings change.

use crate::chart::{self, ChartBackend, ChartState, RenderPass};
use crate::core::config::VisConfig;
use crate::core::error::{ErrorNotification, VisError};
use crate::core::format::{format_summary, ValueFormatter};
use crate::core::query::{QueryResponse, Row};
use crate::widget::metrics::aggregate;
use crate::widget::projector;

/// Title and formatted value of the summary number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub title: String,
    pub value: String,
}

/// Capabilities the host hands over for a single update.
pub struct UpdateContext<'a, B: ChartBackend> {
    pub surface: &'a B::Surface,
    /// `None` while the drawing capability is still loading.
    pub backend: Option<&'a B>,
    pub formatter: Option<&'a dyn ValueFormatter>,
}

impl<'a, B: ChartBackend> UpdateContext<'a, B> {
    pub fn new(surface: &'a B::Surface, backend: Option<&'a B>) -> Self {
        Self {
            surface,
            backend,
            formatter: None,
        }
    }

    pub fn with_formatter(mut self, formatter: &'a dyn ValueFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub summary: Option<SummaryView>,
    pub error: Option<ErrorNotification>,
    pub pass: Option<RenderPass>,
}

pub struct Visualization<B: ChartBackend> {
    chart: ChartState<B::Chart>,
    errors: Vec<ErrorNotification>,
    summary: Option<SummaryView>,
}

impl<B: ChartBackend> Default for Visualization<B> {
    fn default() -> Self {
        Self {
            chart: ChartState::Uninitialized,
            errors: Vec::new(),
            summary: None,
        }
    }
}

impl<B: ChartBackend> Visualization<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart(&self) -> &ChartState<B::Chart> {
        &self.chart
    }

    pub fn errors(&self) -> &[ErrorNotification] {
        &self.errors
    }

    pub fn summary(&self) -> Option<&SummaryView> {
        self.summary.as_ref()
    }

    /// Run one update. `done` fires exactly once, whether the update draws,
    /// reports an error or unwinds.
    pub fn update(
        &mut self,
        rows: &[Row],
        query: &QueryResponse,
        config: &VisConfig,
        cx: UpdateContext<'_, B>,
        done: impl FnOnce(),
    ) -> UpdateOutcome {
        let _done = DoneGuard::new(done);
        self.errors.clear();

        tracing::debug!(
            rows = rows.len(),
            dimensions = query.fields.as_ref().map_or(0, |f| f.dimension_like.len()),
            measures = query.fields.as_ref().map_or(0, |f| f.measure_like.len()),
            aggregation = %config.selected_aggregation,
            "widget update"
        );

        match self.run(rows, query, config, &cx) {
            Ok(pass) => UpdateOutcome {
                summary: self.summary.clone(),
                error: None,
                pass: Some(pass),
            },
            Err(err) => {
                tracing::warn!("update stopped: {err}");
                let notification = err.notification();
                self.errors.push(notification.clone());
                UpdateOutcome {
                    summary: self.summary.clone(),
                    error: Some(notification),
                    pass: None,
                }
            }
        }
    }

    fn run(
        &mut self,
        rows: &[Row],
        query: &QueryResponse,
        config: &VisConfig,
        cx: &UpdateContext<'_, B>,
    ) -> Result<RenderPass, VisError> {
        let fields = projector::validate(query)?;
        let backend = cx.backend.ok_or(VisError::DependencyUnavailable)?;
        let data = projector::extract(rows, &fields, config);

        let kind = config.selected_aggregation;
        let value = aggregate(kind, &data.aggregation_values);
        self.summary = Some(SummaryView {
            title: format!("{} OF {}", kind.as_str().to_uppercase(), data.aggregation_label),
            value: format_summary(value, data.aggregation_value_format.as_deref(), cx.formatter),
        });

        chart::render(
            backend,
            cx.surface,
            &mut self.chart,
            data.chart_series(&config.chart_color),
            &data.axis_titles(),
        )
    }
}

/// Calls the wrapped continuation when dropped.
struct DoneGuard<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> DoneGuard<F> {
    fn new(done: F) -> Self {
        Self(Some(done))
    }
}

impl<F: FnOnce()> Drop for DoneGuard<F> {
    fn drop(&mut self) {
        if let Some(done) = self.0.take() {
            done();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartConfig, ChartObject, SvgBackend, SvgCanvas};
    use crate::core::format::PatternFormatter;
    use crate::core::query::{Cell, CellValue, Field};
    use crate::widget::metrics::AggregationKind;
    use std::cell::Cell as Counter;

    fn query() -> QueryResponse {
        QueryResponse::new(
            vec![Field::new("t", "Month")],
            vec![Field::new("m1", "Orders"), Field::new("m2", "Revenue")],
        )
    }

    fn rows() -> Vec<Row> {
        [("Jan", 10.0, 4.0), ("Feb", 20.0, 6.0)]
            .into_iter()
            .map(|(t, m1, m2)| {
                Row::from([
                    ("t".to_string(), Cell::new(CellValue::Text(t.into()))),
                    ("m1".to_string(), Cell::new(CellValue::Number(m1))),
                    ("m2".to_string(), Cell::new(CellValue::Number(m2))),
                ])
            })
            .collect()
    }

    fn canvas() -> SvgCanvas {
        SvgCanvas::new(480.0, 240.0)
    }

    #[test]
    fn averages_second_measure_and_charts_first() {
        let surface = canvas();
        let mut vis = Visualization::<SvgBackend>::new();
        let fired = Counter::new(0);

        let outcome = vis.update(
            &rows(),
            &query(),
            &VisConfig::default(),
            UpdateContext::new(&surface, Some(&SvgBackend)),
            || fired.set(fired.get() + 1),
        );

        assert_eq!(fired.get(), 1);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.pass, Some(RenderPass::Constructed));
        let summary = outcome.summary.unwrap();
        assert_eq!(summary.title, "AVG OF Revenue");
        assert_eq!(summary.value, "5.00");

        let handle = vis.chart().handle().unwrap();
        let data = &handle.config().data;
        assert_eq!(data.labels, ["Jan", "Feb"]);
        assert_eq!(
            data.datasets[0].data,
            [CellValue::Number(10.0), CellValue::Number(20.0)]
        );
        assert!(surface.markup().contains("<path"));
    }

    #[test]
    fn missing_fields_short_circuit_before_capability_check() {
        crate::i18n::use_fallback();
        let surface = canvas();
        let mut vis = Visualization::<SvgBackend>::new();
        let fired = Counter::new(0);
        let query = QueryResponse::new(vec![], vec![Field::new("m1", "Orders")]);

        let outcome = vis.update(
            &rows(),
            &query,
            &VisConfig::default(),
            UpdateContext::new(&surface, None),
            || fired.set(fired.get() + 1),
        );

        assert_eq!(fired.get(), 1);
        let error = outcome.error.unwrap();
        assert_eq!(error.title, "Data Error");
        assert_eq!(vis.errors().len(), 1);
        assert!(!vis.chart().is_active());
        assert!(vis.summary().is_none());
        assert!(surface.markup().is_empty());
    }

    #[test]
    fn unavailable_capability_is_reported() {
        crate::i18n::use_fallback();
        let surface = canvas();
        let mut vis = Visualization::<SvgBackend>::new();
        let fired = Counter::new(0);

        let outcome = vis.update(
            &rows(),
            &query(),
            &VisConfig::default(),
            UpdateContext::new(&surface, None),
            || fired.set(fired.get() + 1),
        );

        assert_eq!(fired.get(), 1);
        assert_eq!(outcome.error.unwrap().title, "Library Missing");
        assert!(outcome.pass.is_none());
        assert!(!vis.chart().is_active());
    }

    #[test]
    fn errors_are_cleared_by_the_next_update() {
        let surface = canvas();
        let mut vis = Visualization::<SvgBackend>::new();

        vis.update(&rows(), &query(), &VisConfig::default(), UpdateContext::new(&surface, None), || {});
        assert_eq!(vis.errors().len(), 1);

        let outcome = vis.update(
            &rows(),
            &query(),
            &VisConfig::default(),
            UpdateContext::new(&surface, Some(&SvgBackend)),
            || {},
        );
        assert!(outcome.error.is_none());
        assert!(vis.errors().is_empty());
    }

    #[test]
    fn second_update_keeps_the_chart_object() {
        let surface = canvas();
        let mut vis = Visualization::<SvgBackend>::new();
        let fired = Counter::new(0);
        let mut config = VisConfig::default();

        vis.update(&rows(), &query(), &config, UpdateContext::new(&surface, Some(&SvgBackend)), || {
            fired.set(fired.get() + 1)
        });
        let first: *const _ = vis.chart().handle().unwrap().chart();

        config.selected_aggregation = AggregationKind::Sum;
        config.chart_color = "#ff0000".into();
        let outcome = vis.update(&rows()[..1], &query(), &config, UpdateContext::new(&surface, Some(&SvgBackend)), || {
            fired.set(fired.get() + 1)
        });

        assert_eq!(fired.get(), 2);
        assert_eq!(outcome.pass, Some(RenderPass::Updated));
        let handle = vis.chart().handle().unwrap();
        assert!(std::ptr::eq(first, handle.chart()));
        assert_eq!(handle.updates(), 1);
        assert_eq!(handle.config().data.labels, ["Jan"]);
        assert_eq!(handle.config().data.datasets[0].style.border_color, "#ff0000");
        assert_eq!(outcome.summary.unwrap().title, "SUM OF Revenue");
        assert!(surface.markup().contains("#ff0000"));
    }

    #[test]
    fn empty_rows_still_draw_and_report_zero() {
        let surface = canvas();
        let mut vis = Visualization::<SvgBackend>::new();
        let outcome = vis.update(
            &[],
            &query(),
            &VisConfig::default(),
            UpdateContext::new(&surface, Some(&SvgBackend)),
            || {},
        );
        assert_eq!(outcome.summary.unwrap().value, "0.00");
        assert!(vis.chart().is_active());
    }

    #[test]
    fn host_formatter_receives_configured_pattern() {
        let surface = canvas();
        let mut vis = Visualization::<SvgBackend>::new();
        let config = VisConfig {
            selected_aggregation: AggregationKind::Sum,
            aggregation_value_format: "$#,##0".into(),
            ..VisConfig::default()
        };
        let outcome = vis.update(
            &rows(),
            &query(),
            &config,
            UpdateContext::new(&surface, Some(&SvgBackend)).with_formatter(&PatternFormatter),
            || {},
        );
        assert_eq!(outcome.summary.unwrap().value, "$10");
    }

    #[test]
    fn failed_construction_reports_and_retries() {
        crate::i18n::use_fallback();
        let mut vis = Visualization::<SvgBackend>::new();
        let fired = Counter::new(0);

        let flat = SvgCanvas::new(0.0, 0.0);
        let outcome = vis.update(&rows(), &query(), &VisConfig::default(), UpdateContext::new(&flat, Some(&SvgBackend)), || {
            fired.set(fired.get() + 1)
        });
        assert_eq!(outcome.error.unwrap().title, "Chart Error");
        assert!(!vis.chart().is_active());
        // the summary is computed before the chart is drawn
        assert_eq!(vis.summary().unwrap().value, "5.00");

        let surface = canvas();
        let outcome = vis.update(&rows(), &query(), &VisConfig::default(), UpdateContext::new(&surface, Some(&SvgBackend)), || {
            fired.set(fired.get() + 1)
        });
        assert_eq!(outcome.pass, Some(RenderPass::Constructed));
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn done_fires_when_the_update_panics() {
        struct Exploding;
        struct Never;
        impl ChartObject for Never {
            fn config(&self) -> &ChartConfig {
                unreachable!()
            }
            fn config_mut(&mut self) -> &mut ChartConfig {
                unreachable!()
            }
            fn update(&mut self) {}
        }
        impl ChartBackend for Exploding {
            type Surface = ();
            type Chart = Never;
            fn construct(&self, _: &(), _: ChartConfig) -> Result<Never, VisError> {
                panic!("backend exploded");
            }
        }

        let fired = Counter::new(0);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut vis = Visualization::<Exploding>::new();
            vis.update(&rows(), &query(), &VisConfig::default(), UpdateContext::new(&(), Some(&Exploding)), || {
                fired.set(fired.get() + 1)
            });
        }));
        assert!(result.is_err());
        assert_eq!(fired.get(), 1);
    }
}

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dioxus::prelude::*;

use crate::core::config::VisConfig;
use crate::core::error::ErrorNotification;
use crate::core::format::PatternFormatter;
use crate::core::query::{QueryResponse, Row};
use crate::t;

use super::engine::{SummaryView, UpdateContext, Visualization};

#[cfg(not(target_arch = "wasm32"))]
use crate::chart::{SvgBackend, SvgCanvas};

#[cfg(target_arch = "wasm32")]
use crate::chart::CanvasBackend;

#[cfg(not(target_arch = "wasm32"))]
const CHART_SIZE: (f64, f64) = (640.0, 320.0);

static NEXT_INSTANCE: AtomicUsize = AtomicUsize::new(0);

/// Summary number over a trend line. Every change to `rows`, `query` or
/// `config` runs one update; `on_done` fires once per update.
#[component]
pub fn TimeseriesAggregate(
    rows: ReadOnlySignal<Vec<Row>>,
    query: ReadOnlySignal<QueryResponse>,
    config: ReadOnlySignal<VisConfig>,
    on_done: Option<EventHandler<()>>,
) -> Element {
    let instance = use_hook(|| NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed));
    let mut summary = use_signal(|| Option::<SummaryView>::None);
    let mut error = use_signal(|| Option::<ErrorNotification>::None);

    #[cfg(not(target_arch = "wasm32"))]
    let chart_body = {
        let surface = use_hook(|| SvgCanvas::new(CHART_SIZE.0, CHART_SIZE.1));
        let vis = use_hook(|| Rc::new(RefCell::new(Visualization::<SvgBackend>::new())));
        let mut markup = use_signal(String::new);

        use_effect(move || {
            let (rows, query, config) = (rows.read(), query.read(), config.read());
            let cx = UpdateContext::new(&surface, Some(&SvgBackend)).with_formatter(&PatternFormatter);
            let outcome = vis.borrow_mut().update(&rows, &query, &config, cx, move || {
                if let Some(handler) = on_done {
                    handler.call(());
                }
            });
            summary.set(outcome.summary);
            error.set(outcome.error);
            markup.set(surface.markup());
        });

        rsx! {
            div { class: "ts-agg-chart", dangerous_inner_html: "{markup}" }
        }
    };

    #[cfg(target_arch = "wasm32")]
    let chart_body = {
        let canvas_id = use_hook(|| format!("ts-agg-chart-{instance}"));
        let vis = use_hook(|| Rc::new(RefCell::new(Visualization::<CanvasBackend>::new())));
        let mut mounted = use_signal(|| false);
        let effect_id = canvas_id.clone();

        use_effect(move || {
            let (rows, query, config) = (rows.read(), query.read(), config.read());
            // Re-run once the canvas exists so an early "not loaded" error clears itself.
            let _ = mounted();
            let backend = CanvasBackend::probe(&effect_id);
            let cx = UpdateContext::new(&effect_id, backend.as_ref()).with_formatter(&PatternFormatter);
            let outcome = vis.borrow_mut().update(&rows, &query, &config, cx, move || {
                if let Some(handler) = on_done {
                    handler.call(());
                }
            });
            summary.set(outcome.summary);
            error.set(outcome.error);
        });

        rsx! {
            canvas {
                id: "{canvas_id}",
                class: "ts-agg-chart",
                onmounted: move |_| mounted.set(true),
            }
        }
    };

    let (title, value) = match summary() {
        Some(view) => (view.title, view.value),
        None => (String::new(), t!("summary-pending")),
    };

    rsx! {
        div { class: "ts-agg-viz-container", "data-instance": "{instance}",
            div { class: "ts-agg-value-container",
                div { class: "ts-agg-title", "{title}" }
                div { class: "ts-agg-value", "{value}" }
            }
            if let Some(err) = error() {
                div { class: "ts-agg-error", role: "alert",
                    strong { class: "ts-agg-error__title", "{err.title}" }
                    span { class: "ts-agg-error__message", "{err.message}" }
                }
            }
            div { class: "ts-chart-container", {chart_body} }
        }
    }
}

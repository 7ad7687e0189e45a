//! Line chart configuration model and the drawing-capability seam.
//!
//! The widget never draws directly. It builds a [`ChartConfig`] and hands it to a
//! [`ChartBackend`], which produces a long-lived [`ChartObject`]. After that the
//! object is only ever mutated and asked to redraw (see [`reconcile`]).

pub mod layout;
pub mod reconcile;
pub mod svg;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use reconcile::{render, AxisTitles, ChartHandle, ChartState, RenderPass};
pub use svg::{SvgBackend, SvgCanvas, SvgChart};

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasBackend, CanvasChart};

use serde::Serialize;

use crate::core::error::VisError;
use crate::core::query::CellValue;

pub const AXIS_TITLE_COLOR: &str = "#555";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
}

/// Per-series stroke and marker styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    pub border_color: String,
    pub background_color: String,
    pub border_width: f64,
    pub fill: bool,
    pub tension: f64,
    pub point_radius: f64,
    pub point_background_color: String,
}

impl SeriesStyle {
    /// Unfilled 2px line with a moderate curve and small round markers.
    pub fn line(color: &str) -> Self {
        Self {
            border_color: color.to_string(),
            background_color: "rgba(0,0,0,0)".to_string(),
            border_width: 2.0,
            fill: false,
            tension: 0.3,
            point_radius: 3.0,
            point_background_color: color.to_string(),
        }
    }
}

/// Chart-ready view of one measure over the time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub labels: Vec<String>,
    pub points: Vec<CellValue>,
    pub style: SeriesStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<CellValue>,
    #[serde(flatten)]
    pub style: SeriesStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl From<ChartSeries> for ChartData {
    fn from(series: ChartSeries) -> Self {
        Self {
            labels: series.labels,
            datasets: vec![Dataset {
                label: series.label,
                data: series.points,
                style: series.style,
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendOptions {
    pub display: bool,
    pub position: LegendPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    Index,
    Nearest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipOptions {
    pub mode: InteractionMode,
    pub intersect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Category,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOptions {
    pub max_rotation: f64,
    pub min_rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: ScaleKind,
    pub begin_at_zero: bool,
    pub title: AxisTitle,
    pub ticks: TickOptions,
}

impl Axis {
    fn titled(kind: ScaleKind, text: &str) -> Self {
        Self {
            kind,
            begin_at_zero: false,
            title: AxisTitle {
                display: true,
                text: text.to_string(),
                color: AXIS_TITLE_COLOR.to_string(),
            },
            ticks: TickOptions {
                max_rotation: 45.0,
                min_rotation: 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginOptions {
    pub legend: LegendOptions,
    pub tooltip: TooltipOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: PluginOptions,
    pub scales: Scales,
}

impl ChartOptions {
    /// Category x axis, linear y axis free to start above zero, legend on top
    /// and tooltips that show every series at the hovered index.
    pub fn time_series(titles: &AxisTitles) -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: PluginOptions {
                legend: LegendOptions {
                    display: true,
                    position: LegendPosition::Top,
                },
                tooltip: TooltipOptions {
                    mode: InteractionMode::Index,
                    intersect: false,
                },
            },
            scales: Scales {
                x: Axis::titled(ScaleKind::Category, &titles.x),
                y: Axis::titled(ScaleKind::Linear, &titles.y),
            },
        }
    }
}

/// Everything a backend needs to draw the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

/// A chart living on a drawing surface, mutated in place between updates.
pub trait ChartObject {
    fn config(&self) -> &ChartConfig;
    fn config_mut(&mut self) -> &mut ChartConfig;
    /// Redraw from the current config.
    fn update(&mut self);
}

/// The external charting capability. Injected per update as `Option<&B>` so a
/// capability that has not finished loading is an ordinary, testable state.
pub trait ChartBackend {
    type Surface;
    type Chart: ChartObject;

    fn construct(&self, surface: &Self::Surface, config: ChartConfig) -> Result<Self::Chart, VisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_converts_into_single_dataset() {
        let data: ChartData = ChartSeries {
            label: "Orders".into(),
            labels: vec!["Jan".into(), "Feb".into()],
            points: vec![CellValue::Number(10.0), CellValue::Number(20.0)],
            style: SeriesStyle::line("#1F77B4"),
        }
        .into();
        assert_eq!(data.labels, ["Jan", "Feb"]);
        assert_eq!(data.datasets.len(), 1);
        assert_eq!(data.datasets[0].label, "Orders");
        assert_eq!(data.datasets[0].style.point_background_color, "#1F77B4");
    }

    #[test]
    fn time_series_options_serialize_like_chart_config() {
        let options = ChartOptions::time_series(&AxisTitles::new("Month", "Orders"));
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["maintainAspectRatio"], false);
        assert_eq!(json["plugins"]["legend"]["position"], "top");
        assert_eq!(json["plugins"]["tooltip"]["mode"], "index");
        assert_eq!(json["scales"]["x"]["type"], "category");
        assert_eq!(json["scales"]["y"]["beginAtZero"], false);
        assert_eq!(json["scales"]["y"]["title"]["text"], "Orders");
        assert_eq!(json["scales"]["x"]["ticks"]["maxRotation"], 45.0);
    }

    #[test]
    fn line_style_is_unfilled() {
        let style = SeriesStyle::line("#ff0000");
        assert!(!style.fill);
        assert_eq!(style.border_width, 2.0);
        assert_eq!(style.tension, 0.3);
        assert_eq!(style.point_radius, 3.0);
    }
}

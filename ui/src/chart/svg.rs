//! Markup backend: draws the chart as an SVG document into a shared buffer.
//!
//! Works on every target, so native hosts and tests get a real chart without a
//! browser canvas.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use super::layout::{Layout, PlotPoint};
use super::{ChartBackend, ChartConfig, ChartObject};
use crate::core::error::VisError;

const FONT: &str = "Inter, system-ui, sans-serif";
const GRID_COLOR: &str = "rgba(0,0,0,0.08)";
const TICK_COLOR: &str = "#666";

/// Drawing surface shared between the widget (which reads the markup) and the
/// chart object (which rewrites it on every redraw).
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    markup: Rc<RefCell<String>>,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            markup: Rc::new(RefCell::new(String::new())),
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn markup(&self) -> String {
        self.markup.borrow().clone()
    }

    fn replace(&self, markup: String) {
        *self.markup.borrow_mut() = markup;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SvgBackend;

impl ChartBackend for SvgBackend {
    type Surface = SvgCanvas;
    type Chart = SvgChart;

    fn construct(&self, surface: &SvgCanvas, config: ChartConfig) -> Result<SvgChart, VisError> {
        let (width, height) = surface.size();
        if !(width > 0.0 && height > 0.0) {
            return Err(VisError::ChartConstruction(format!(
                "surface has no drawable area ({width}x{height})"
            )));
        }
        let mut chart = SvgChart {
            surface: surface.clone(),
            config,
        };
        chart.update();
        Ok(chart)
    }
}

#[derive(Debug)]
pub struct SvgChart {
    surface: SvgCanvas,
    config: ChartConfig,
}

impl ChartObject for SvgChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    fn update(&mut self) {
        let (width, height) = self.surface.size();
        let layout = Layout::compute(&self.config, width, height);
        self.surface.replace(render_markup(&layout));
    }
}

fn render_markup(layout: &Layout) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns='http://www.w3.org/2000/svg' class='ts-agg-chart-svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}' font-family='{FONT}' font-size='11'>",
        w = layout.width,
        h = layout.height,
    );

    let plot = layout.plot;
    for tick in &layout.y_ticks {
        let _ = write!(
            out,
            "<line x1='{x1:.1}' y1='{y:.1}' x2='{x2:.1}' y2='{y:.1}' stroke='{GRID_COLOR}'/>\
             <text x='{tx:.1}' y='{y:.1}' fill='{TICK_COLOR}' text-anchor='end' dominant-baseline='middle'>{label}</text>",
            x1 = plot.x,
            x2 = plot.right(),
            y = tick.y,
            tx = plot.x - 8.0,
            label = escape(&tick.label),
        );
    }

    let tick_y = plot.bottom() + 16.0;
    for tick in &layout.x_ticks {
        let label = escape(&tick.label);
        if layout.x_label_rotation > 0.0 {
            let _ = write!(
                out,
                "<text x='{x:.1}' y='{tick_y:.1}' fill='{TICK_COLOR}' text-anchor='end' transform='rotate(-{r} {x:.1} {tick_y:.1})'>{label}</text>",
                x = tick.x,
                r = layout.x_label_rotation,
            );
        } else {
            let _ = write!(
                out,
                "<text x='{x:.1}' y='{tick_y:.1}' fill='{TICK_COLOR}' text-anchor='middle'>{label}</text>",
                x = tick.x,
            );
        }
    }

    if let Some(title) = &layout.x_title {
        let _ = write!(
            out,
            "<text class='ts-agg-axis-title' x='{:.1}' y='{:.1}' fill='{}' text-anchor='middle'>{}</text>",
            title.x,
            title.y,
            escape(&title.color),
            escape(&title.text),
        );
    }
    if let Some(title) = &layout.y_title {
        let _ = write!(
            out,
            "<text class='ts-agg-axis-title' x='{x:.1}' y='{y:.1}' fill='{}' text-anchor='middle' transform='rotate(-90 {x:.1} {y:.1})'>{}</text>",
            escape(&title.color),
            escape(&title.text),
            x = title.x,
            y = title.y,
        );
    }

    for series in &layout.series {
        let style = &series.style;
        let stroke = escape(&style.border_color);
        for segment in &series.segments {
            let _ = write!(
                out,
                "<path d='{}' fill='none' stroke='{stroke}' stroke-width='{}' stroke-linejoin='round'/>",
                path_data(segment),
                style.border_width,
            );
        }
        if style.point_radius > 0.0 {
            let marker = escape(&style.point_background_color);
            for point in series.segments.iter().flatten() {
                let _ = write!(
                    out,
                    "<circle cx='{:.1}' cy='{:.1}' r='{}' fill='{marker}' stroke='{stroke}'/>",
                    point.x, point.y, style.point_radius,
                );
            }
        }
    }

    for entry in &layout.legend {
        let _ = write!(
            out,
            "<rect x='{:.1}' y='{:.1}' width='40' height='12' fill='none' stroke='{color}' stroke-width='2'/>\
             <text x='{:.1}' y='{:.1}' fill='{TICK_COLOR}' dominant-baseline='middle'>{}</text>",
            entry.x,
            entry.y - 6.0,
            entry.x + 48.0,
            entry.y,
            escape(&entry.label),
            color = escape(&entry.color),
        );
    }

    out.push_str("</svg>");
    out
}

/// `M` to the first point, then one cubic segment per following point.
fn path_data(points: &[PlotPoint]) -> String {
    let mut d = String::new();
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return d;
    };
    let _ = write!(d, "M{:.1},{:.1}", first.x, first.y);
    let mut prev = first;
    for point in iter {
        let _ = write!(
            d,
            " C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
            prev.cp_out.0, prev.cp_out.1, point.cp_in.0, point.cp_in.1, point.x, point.y,
        );
        prev = point;
    }
    d
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

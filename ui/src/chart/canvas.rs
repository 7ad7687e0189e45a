//! Browser backend: draws onto a `<canvas>` through the 2D context.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::layout::Layout;
use super::{ChartBackend, ChartConfig, ChartObject};
use crate::core::error::VisError;

const FONT: &str = "11px Inter, system-ui, sans-serif";
const GRID_COLOR: &str = "rgba(0,0,0,0.08)";
const TICK_COLOR: &str = "#666";

/// Charting capability backed by the current document. The surface handed to
/// [`ChartBackend::construct`] is the id of the `<canvas>` to draw on.
#[derive(Debug, Clone)]
pub struct CanvasBackend {
    document: Document,
}

impl CanvasBackend {
    /// `None` until a document exists and the canvas has been mounted, which
    /// the widget reports as the capability still loading.
    pub fn probe(canvas_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        document.get_element_by_id(canvas_id)?;
        Some(Self { document })
    }
}

impl ChartBackend for CanvasBackend {
    type Surface = String;
    type Chart = CanvasChart;

    fn construct(&self, canvas_id: &String, config: ChartConfig) -> Result<CanvasChart, VisError> {
        let canvas = self
            .document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| VisError::ChartConstruction(format!("no element with id `{canvas_id}`")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| VisError::ChartConstruction(format!("`{canvas_id}` is not a canvas")))?;
        let context = canvas
            .get_context("2d")
            .map_err(|err| VisError::ChartConstruction(format!("{err:?}")))?
            .ok_or_else(|| VisError::ChartConstruction("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| VisError::ChartConstruction("unexpected context type".into()))?;

        let mut chart = CanvasChart {
            canvas,
            context,
            config,
        };
        chart.update();
        Ok(chart)
    }
}

#[derive(Debug)]
pub struct CanvasChart {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    config: ChartConfig,
}

impl ChartObject for CanvasChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    fn update(&mut self) {
        if self.config.options.responsive {
            let (w, h) = (self.canvas.client_width(), self.canvas.client_height());
            if w > 0 && h > 0 {
                self.canvas.set_width(w as u32);
                self.canvas.set_height(h as u32);
            }
        }
        let width = f64::from(self.canvas.width());
        let height = f64::from(self.canvas.height());
        let layout = Layout::compute(&self.config, width, height);
        if let Err(err) = draw(&self.context, &layout) {
            tracing::warn!("canvas draw failed: {err:?}");
        }
    }
}

fn draw(ctx: &CanvasRenderingContext2d, layout: &Layout) -> Result<(), wasm_bindgen::JsValue> {
    let plot = layout.plot;
    ctx.clear_rect(0.0, 0.0, layout.width, layout.height);
    ctx.set_font(FONT);

    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_fill_style_str(TICK_COLOR);
    ctx.set_text_align("right");
    ctx.set_text_baseline("middle");
    for tick in &layout.y_ticks {
        ctx.begin_path();
        ctx.move_to(plot.x, tick.y);
        ctx.line_to(plot.right(), tick.y);
        ctx.stroke();
        ctx.fill_text(&tick.label, plot.x - 8.0, tick.y)?;
    }

    let tick_y = plot.bottom() + 16.0;
    ctx.set_text_baseline("alphabetic");
    for tick in &layout.x_ticks {
        if layout.x_label_rotation > 0.0 {
            ctx.save();
            ctx.translate(tick.x, tick_y)?;
            ctx.rotate(-layout.x_label_rotation.to_radians())?;
            ctx.set_text_align("right");
            ctx.fill_text(&tick.label, 0.0, 0.0)?;
            ctx.restore();
        } else {
            ctx.set_text_align("center");
            ctx.fill_text(&tick.label, tick.x, tick_y)?;
        }
    }

    ctx.set_text_align("center");
    if let Some(title) = &layout.x_title {
        ctx.set_fill_style_str(&title.color);
        ctx.fill_text(&title.text, title.x, title.y)?;
    }
    if let Some(title) = &layout.y_title {
        ctx.save();
        ctx.translate(title.x, title.y)?;
        ctx.rotate(-std::f64::consts::FRAC_PI_2)?;
        ctx.set_fill_style_str(&title.color);
        ctx.fill_text(&title.text, 0.0, 0.0)?;
        ctx.restore();
    }

    for series in &layout.series {
        let style = &series.style;
        ctx.set_stroke_style_str(&style.border_color);
        ctx.set_line_width(style.border_width);
        for segment in &series.segments {
            let Some(first) = segment.first() else {
                continue;
            };
            ctx.begin_path();
            ctx.move_to(first.x, first.y);
            for pair in segment.windows(2) {
                let (prev, point) = (&pair[0], &pair[1]);
                ctx.bezier_curve_to(
                    prev.cp_out.0,
                    prev.cp_out.1,
                    point.cp_in.0,
                    point.cp_in.1,
                    point.x,
                    point.y,
                );
            }
            ctx.stroke();
        }

        if style.point_radius > 0.0 {
            ctx.set_fill_style_str(&style.point_background_color);
            for point in series.segments.iter().flatten() {
                ctx.begin_path();
                ctx.arc(point.x, point.y, style.point_radius, 0.0, std::f64::consts::TAU)?;
                ctx.fill();
                ctx.stroke();
            }
        }
    }

    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");
    for entry in &layout.legend {
        ctx.set_stroke_style_str(&entry.color);
        ctx.set_line_width(2.0);
        ctx.stroke_rect(entry.x, entry.y - 6.0, 40.0, 12.0);
        ctx.set_fill_style_str(TICK_COLOR);
        ctx.fill_text(&entry.label, entry.x + 48.0, entry.y)?;
    }

    Ok(())
}

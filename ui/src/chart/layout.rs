//! Pixel geometry for a line chart, shared by every drawing backend.
//!
//! Backends only translate a [`Layout`] into draw calls; scale fitting, tick
//! placement and curve control points are computed here.

use super::{ChartConfig, LegendPosition, SeriesStyle};

const TARGET_Y_TICKS: f64 = 5.0;
const CHAR_WIDTH: f64 = 6.5;
const LEGEND_HEIGHT: f64 = 28.0;
const TITLE_BAND: f64 = 20.0;
const TICK_BAND_X: f64 = 28.0;
const PAD: f64 = 12.0;
const MAX_Y_TICKS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YTick {
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XTick {
    pub x: f64,
    pub label: String,
}

/// A plotted point with the Bezier control points entering and leaving it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub cp_in: (f64, f64),
    pub cp_out: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPath {
    pub label: String,
    pub style: SeriesStyle,
    /// Runs of consecutive plottable values; a gap starts a new run.
    pub segments: Vec<Vec<PlotPoint>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub plot: Rect,
    pub y_range: (f64, f64),
    pub y_ticks: Vec<YTick>,
    pub x_ticks: Vec<XTick>,
    /// Degrees applied to x tick labels when they would overlap.
    pub x_label_rotation: f64,
    pub series: Vec<SeriesPath>,
    pub legend: Vec<LegendEntry>,
    pub x_title: Option<AxisLabel>,
    pub y_title: Option<AxisLabel>,
}

impl Layout {
    pub fn compute(config: &ChartConfig, width: f64, height: f64) -> Self {
        let options = &config.options;
        let legend_on = options.plugins.legend.display && !config.data.datasets.is_empty();
        let legend_top = legend_on && options.plugins.legend.position == LegendPosition::Top;
        let legend_bottom = legend_on && !legend_top;
        let x_title_on = options.scales.x.title.display && !options.scales.x.title.text.is_empty();
        let y_title_on = options.scales.y.title.display && !options.scales.y.title.text.is_empty();

        let values: Vec<f64> = config
            .data
            .datasets
            .iter()
            .flat_map(|ds| ds.data.iter().filter_map(|v| v.plot_value()))
            .collect();
        let begin_at_zero = options.scales.y.begin_at_zero;
        let (lo, hi, step) = fit_range(&values, begin_at_zero);

        let y_tick_values = tick_values(lo, hi, step);
        let y_labels: Vec<String> = y_tick_values
            .iter()
            .map(|v| format_tick_with_step(*v, step))
            .collect();
        let widest = y_labels.iter().map(|l| l.chars().count()).max().unwrap_or(1) as f64;

        let left = PAD + widest * CHAR_WIDTH + 8.0 + if y_title_on { TITLE_BAND } else { 0.0 };
        let top = PAD + if legend_top { LEGEND_HEIGHT } else { 0.0 };
        let bottom = PAD
            + TICK_BAND_X
            + if x_title_on { TITLE_BAND } else { 0.0 }
            + if legend_bottom { LEGEND_HEIGHT } else { 0.0 };
        let plot = Rect {
            x: left,
            y: top,
            width: (width - left - PAD).max(1.0),
            height: (height - top - bottom).max(1.0),
        };

        // Halved so the span stays finite across the whole f64 range.
        let span = hi * 0.5 - lo * 0.5;
        let map_y = |v: f64| plot.bottom() - (v * 0.5 - lo * 0.5) / span * plot.height;

        let y_ticks = y_tick_values
            .iter()
            .zip(y_labels)
            .map(|(v, label)| YTick { y: map_y(*v), label })
            .collect();

        let count = config.data.labels.len().max(
            config
                .data
                .datasets
                .iter()
                .map(|ds| ds.data.len())
                .max()
                .unwrap_or(0),
        );
        let map_x = |idx: usize| {
            if count <= 1 {
                plot.x + plot.width / 2.0
            } else {
                plot.x + idx as f64 * plot.width / (count - 1) as f64
            }
        };

        let (x_ticks, x_label_rotation) = x_axis_ticks(
            &config.data.labels,
            count,
            plot.width,
            options.scales.x.ticks.max_rotation,
            map_x,
        );

        let series = config
            .data
            .datasets
            .iter()
            .map(|ds| {
                let mut segments = Vec::new();
                let mut run: Vec<(f64, f64)> = Vec::new();
                for (idx, value) in ds.data.iter().enumerate() {
                    match value.plot_value() {
                        Some(v) => run.push((map_x(idx), map_y(v))),
                        None if !run.is_empty() => {
                            segments.push(spline(&run, ds.style.tension, &plot));
                            run.clear();
                        }
                        None => {}
                    }
                }
                if !run.is_empty() {
                    segments.push(spline(&run, ds.style.tension, &plot));
                }
                SeriesPath {
                    label: ds.label.clone(),
                    style: ds.style.clone(),
                    segments,
                }
            })
            .collect();

        let legend = if legend_on {
            let legend_y = if legend_top {
                PAD + LEGEND_HEIGHT / 2.0
            } else {
                height - PAD - LEGEND_HEIGHT / 2.0
            };
            let total: f64 = config
                .data
                .datasets
                .iter()
                .map(|ds| legend_entry_width(&ds.label))
                .sum();
            let mut cursor = (width - total) / 2.0;
            config
                .data
                .datasets
                .iter()
                .map(|ds| {
                    let entry = LegendEntry {
                        x: cursor,
                        y: legend_y,
                        label: ds.label.clone(),
                        color: ds.style.border_color.clone(),
                    };
                    cursor += legend_entry_width(&ds.label);
                    entry
                })
                .collect()
        } else {
            Vec::new()
        };

        let x_title = x_title_on.then(|| AxisLabel {
            x: plot.x + plot.width / 2.0,
            y: plot.bottom() + TICK_BAND_X + TITLE_BAND / 2.0 + 4.0,
            text: options.scales.x.title.text.clone(),
            color: options.scales.x.title.color.clone(),
        });
        let y_title = y_title_on.then(|| AxisLabel {
            x: PAD + TITLE_BAND / 2.0,
            y: plot.y + plot.height / 2.0,
            text: options.scales.y.title.text.clone(),
            color: options.scales.y.title.color.clone(),
        });

        Self {
            width,
            height,
            plot,
            y_range: (lo, hi),
            y_ticks,
            x_ticks,
            x_label_rotation,
            series,
            legend,
            x_title,
            y_title,
        }
    }
}

fn legend_entry_width(label: &str) -> f64 {
    // swatch + gap + text + trailing space
    40.0 + 8.0 + label.chars().count() as f64 * CHAR_WIDTH + 16.0
}

/// Fit `[lo, hi]` around the data on a nice tick step. Without data the range
/// is `[0, 1]`; a flat series is padded by one unit on each side, or by a
/// magnitude-relative amount once one unit falls below the value's precision.
/// The bounds never leave the finite range.
fn fit_range(values: &[f64], begin_at_zero: bool) -> (f64, f64, f64) {
    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if !min.is_finite() || !max.is_finite() {
        min = 0.0;
        max = 1.0;
    }
    if begin_at_zero {
        min = min.min(0.0);
        max = max.max(0.0);
    }
    if min == max {
        let pad = (min.abs() * 1e-9).max(1.0);
        min -= pad;
        max += pad;
    }

    let spread = max - min;
    let raw = if spread.is_finite() {
        spread / TARGET_Y_TICKS
    } else {
        max / TARGET_Y_TICKS - min / TARGET_Y_TICKS
    };
    let step = nice_step(raw);
    let lo = ((min / step).floor() * step).max(f64::MIN);
    let mut hi = ((max / step).ceil() * step).min(f64::MAX);
    if hi <= lo {
        hi = (lo + step).min(f64::MAX);
    }
    (lo, hi, step)
}

fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10_f64.powi(raw.log10().floor() as i32);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    let step = nice * magnitude;
    if step > 0.0 && step.is_finite() {
        step
    } else {
        1.0
    }
}

fn tick_values(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let count = (hi * 0.5 - lo * 0.5) / (step * 0.5);
    let count = if count.is_finite() {
        (count.round() as usize).min(MAX_Y_TICKS)
    } else {
        0
    };
    (0..=count).map(|i| (lo + i as f64 * step).min(hi)).collect()
}

fn x_axis_ticks(
    labels: &[String],
    count: usize,
    plot_width: f64,
    max_rotation: f64,
    map_x: impl Fn(usize) -> f64,
) -> (Vec<XTick>, f64) {
    if count == 0 {
        return (Vec::new(), 0.0);
    }
    let widest = labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0) as f64
        * CHAR_WIDTH;
    let spacing = plot_width / count as f64;
    let rotation = if widest > spacing { max_rotation } else { 0.0 };

    // Rotated labels need roughly their height worth of room each.
    let needed = if rotation > 0.0 { 16.0 } else { widest + 8.0 };
    let stride = ((needed / spacing.max(1.0)).ceil() as usize).max(1);

    let ticks = (0..count)
        .step_by(stride)
        .map(|idx| XTick {
            x: map_x(idx),
            label: labels.get(idx).cloned().unwrap_or_default(),
        })
        .collect();
    (ticks, rotation)
}

/// Control points for a run of points. Each point's handles lie along the line
/// joining its neighbours, scaled by `tension` and the relative distances to
/// them; handles are clamped to the plot area.
fn spline(points: &[(f64, f64)], tension: f64, area: &Rect) -> Vec<PlotPoint> {
    let last = points.len().saturating_sub(1);
    points
        .iter()
        .enumerate()
        .map(|(idx, &(x, y))| {
            let prev = if idx == 0 { (x, y) } else { points[idx - 1] };
            let next = if idx == last { (x, y) } else { points[idx + 1] };

            let d01 = distance(prev, (x, y));
            let d12 = distance((x, y), next);
            let total = d01 + d12;
            let (s01, s12) = if total > 0.0 {
                (d01 / total, d12 / total)
            } else {
                (0.0, 0.0)
            };
            let fa = tension * s01;
            let fb = tension * s12;
            let dx = next.0 - prev.0;
            let dy = next.1 - prev.1;

            PlotPoint {
                x,
                y,
                cp_in: clamp_to(area, (x - fa * dx, y - fa * dy)),
                cp_out: clamp_to(area, (x + fb * dx, y + fb * dy)),
            }
        })
        .collect()
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

fn clamp_to(area: &Rect, (x, y): (f64, f64)) -> (f64, f64) {
    (x.clamp(area.x, area.right()), y.clamp(area.y, area.bottom()))
}

/// Tick label with just enough decimals to distinguish steps like 2.5 or 0.25.
pub(crate) fn format_tick_with_step(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }

    let decimals = decimals_for_step(step);
    let factor = 10_f64.powi(decimals as i32);
    let v = (v * factor).round() / factor;
    let v = if v == 0.0 { 0.0 } else { v }; // normalize `-0.0`
    format!("{v:.decimals$}")
}

fn decimals_for_step(step: f64) -> usize {
    let step = step.abs();
    if step == 0.0 || !step.is_finite() {
        return 0;
    }
    (0..=6)
        .find(|&decimals| {
            let scaled = step * 10_f64.powi(decimals as i32);
            (scaled - scaled.round()).abs() <= 1e-9 * scaled.abs().max(1.0)
        })
        .unwrap_or(6)
}

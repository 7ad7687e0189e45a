//! Shared UI crate for tsagg: the time-series aggregate widget, its chart
//! backends and the demo dashboard hosted by the web and desktop crates.

pub mod chart;
pub mod core;
pub mod i18n;
pub mod views;
pub mod widget;

/// Shared theme, inlined by hosts that do not serve assets.
pub const THEME_CSS: &str = include_str!("../assets/theme/main.css");

#[cfg(test)]
mod tests {
    mod i18n_completeness;
}

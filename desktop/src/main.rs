#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{
    tao::{dpi::LogicalSize, window::WindowBuilder},
    Config,
};
use dioxus::prelude::*;

use ui::views::Dashboard;

// Embedded shared theme (ui/assets/theme/main.css); desktop serves no asset directory.
const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

#[cfg(feature = "desktop")]
fn main() {
    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("tsagg – v{}", env!("CARGO_PKG_VERSION")))
                    .with_inner_size(LogicalSize::new(1280.0, 820.0)),
            ),
        )
        .launch(App);
}

#[cfg(not(feature = "desktop"))]
fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // Provide global reactive language code signal (mirrors web approach).
    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        // Keyed wrapper forces a full remount on language change.
        div { key: "{lang_code()}",
            Dashboard {}
        }
    }
}

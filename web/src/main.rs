use dioxus::prelude::*;

use ui::views::Dashboard;

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // Global language code; the dashboard's language select writes to it.
    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    rsx! {
        document::Title { "tsagg" }
        document::Style { "{ui::THEME_CSS}" }

        div { key: "{lang_code()}",
            Dashboard {}
        }
    }
}

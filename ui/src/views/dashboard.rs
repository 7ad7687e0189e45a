use dioxus::prelude::*;
use serde_json::{Map, Value};

use crate::core::config::{options, OptionDisplay, OptionSpec, VisConfig};
use crate::core::query::{Cell, CellValue, Field, QueryResponse, Row};
use crate::i18n;
use crate::t;
use crate::widget::TimeseriesAggregate;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Field metadata of the demo query: one time dimension, a charted count and
/// an aggregated revenue measure.
pub fn sample_query() -> QueryResponse {
    QueryResponse::new(
        vec![Field::new("orders.created_month", "Created Month")],
        vec![
            Field::new("orders.count", "Orders"),
            Field::new("orders.total_revenue", "Revenue").with_value_format("$#,##0.00"),
        ],
    )
}

/// Deterministic demo row for month `index` (0-based, counted from Jan 2024).
pub fn sample_row(index: usize) -> Row {
    let year = 2024 + index / 12;
    let month = index % 12;
    let wave = [0.0, 6.0, 11.0, 7.0, -2.0, -8.0, -5.0, 3.0, 9.0, 12.0, 4.0, -3.0][month];
    let count = 120.0 + index as f64 * 4.0 + wave;
    let revenue = count * 37.5;

    // Every seventh month arrives as text so the coercion path stays visible.
    let revenue_cell = if index % 7 == 6 {
        CellValue::Text(format!("{revenue:.2} USD"))
    } else {
        CellValue::Number(revenue)
    };

    Row::from([
        (
            "orders.created_month".to_string(),
            Cell::rendered(
                CellValue::Text(format!("{year}-{:02}", month + 1)),
                format!("{} {year}", MONTHS[month]),
            ),
        ),
        ("orders.count".to_string(), Cell::new(CellValue::Number(count))),
        ("orders.total_revenue".to_string(), Cell::new(revenue_cell)),
    ])
}

fn sample_rows(count: usize) -> Vec<Row> {
    (0..count).map(sample_row).collect()
}

#[component]
pub fn Dashboard() -> Element {
    let lang_ctx: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let mut current_lang = use_signal(|| "en-US".to_string());
    let langs = use_signal(i18n::available_languages);

    let mut rows = use_signal(|| sample_rows(12));
    let query = use_signal(sample_query);
    let mut raw_config = use_signal(Map::<String, Value>::new);
    let config = use_memo(move || VisConfig::from_json(&Value::Object(raw_config())));
    let mut updates = use_signal(|| 0_u64);

    // Depend on the language so option labels are rebuilt after a switch.
    let lang_marker = lang_ctx.map(|c| c()).unwrap_or_else(|| current_lang());
    let specs = options();

    let on_lang = move |evt: FormEvent| {
        let val = evt.value();
        if i18n::set_language(&val).is_ok() {
            current_lang.set(val.clone());
            if let Some(mut code) = lang_ctx {
                code.set(val);
            }
        }
    };

    rsx! {
        section { class: "page page-dashboard", key: "{lang_marker}",
            header { class: "page-dashboard__header",
                h1 { {t!("dashboard-title")} }
                p { class: "page-dashboard__tagline", {t!("dashboard-tagline")} }
            }

            div { class: "page-dashboard__body",
                div { class: "page-dashboard__widget",
                    TimeseriesAggregate {
                        rows: rows(),
                        query: query(),
                        config: config(),
                        on_done: move |_| updates += 1,
                    }
                    div { class: "page-dashboard__actions",
                        button {
                            class: "button button--primary",
                            onclick: move |_| {
                                let next = rows.read().len();
                                rows.write().push(sample_row(next));
                            },
                            {t!("dashboard-add-row")}
                        }
                        button {
                            class: "button button--ghost",
                            onclick: move |_| rows.set(sample_rows(12)),
                            {t!("dashboard-reset")}
                        }
                        span { class: "page-dashboard__meta", "#{updates}" }
                    }
                }

                aside { class: "settings",
                    h2 { class: "settings__title", {t!("dashboard-settings")} }
                    for spec in specs {
                        SettingField {
                            key: "{spec.key}",
                            current: raw_config
                                .read()
                                .get(spec.key)
                                .and_then(Value::as_str)
                                .map(str::to_string)
                                .unwrap_or_else(|| spec.default.clone()),
                            spec: spec.clone(),
                            on_change: move |(key, value): (&'static str, String)| {
                                raw_config.write().insert(key.to_string(), Value::String(value));
                            },
                        }
                    }
                    if langs().len() > 1 {
                        label { class: "settings__field",
                            span { class: "settings__label", {t!("dashboard-language")} }
                            select {
                                class: "settings__input",
                                value: "{current_lang()}",
                                oninput: on_lang,
                                for code in langs() {
                                    option { key: "{code}", value: "{code}", "{code}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// One host-style setting rendered from its descriptor.
#[component]
fn SettingField(
    spec: OptionSpec,
    current: String,
    on_change: EventHandler<(&'static str, String)>,
) -> Element {
    let key = spec.key;
    let emit = move |evt: FormEvent| on_change.call((key, evt.value()));

    rsx! {
        label { class: "settings__field",
            span { class: "settings__label", "{spec.label}" }
            {match spec.display {
                OptionDisplay::Select => rsx! {
                    select { class: "settings__input", value: "{current}", oninput: emit,
                        for choice in spec.values.iter() {
                            option { key: "{choice.value}", value: "{choice.value}", "{choice.label}" }
                        }
                    }
                },
                OptionDisplay::Color => rsx! {
                    input { class: "settings__input settings__input--color", r#type: "color", value: "{current}", oninput: emit }
                },
                OptionDisplay::Text => rsx! {
                    input { class: "settings__input", r#type: "text", value: "{current}", oninput: emit }
                },
            }}
        }
    }
}

use std::collections::{BTreeMap, BTreeSet};

/// Locale checks for `tsagg-ui.ftl`.
///
/// Every non-fallback locale must define every message the en-US file defines,
/// no file may define a message twice, and no message may be left blank. The
/// parser is deliberately simple: `key = value` lines are messages, comments,
/// terms and attribute or continuation lines are skipped.
///
/// To add a locale, create `ui/i18n/<locale>/tsagg-ui.ftl` and register it in
/// `LOCALES` below.
const EN_US: &str = include_str!("../i18n/en-US/tsagg-ui.ftl");

const LOCALES: &[(&str, &str)] = &[
    ("es-ES", include_str!("../i18n/es-ES/tsagg-ui.ftl")),
    ("fr-FR", include_str!("../i18n/fr-FR/tsagg-ui.ftl")),
];

/// Messages the widget cannot render without.
const REQUIRED: &[&str] = &[
    "error-data-title",
    "error-data-message",
    "error-library-title",
    "error-library-message",
    "error-chart-title",
    "aggregation-avg",
    "aggregation-sum",
    "aggregation-median",
    "aggregation-min",
    "aggregation-max",
    "summary-pending",
];

#[test]
fn fallback_defines_required_messages() {
    let messages = parse(EN_US, "en-US");
    for key in REQUIRED {
        assert!(messages.contains_key(*key), "en-US is missing `{key}`");
    }
}

#[test]
fn all_locales_have_all_fallback_keys() {
    let fallback = parse(EN_US, "en-US");
    let mut failures = Vec::new();

    for (locale, src) in LOCALES {
        let messages = parse(src, locale);
        let missing: BTreeSet<_> = fallback.keys().filter(|k| !messages.contains_key(*k)).collect();
        if !missing.is_empty() {
            failures.push(format!(
                "{locale} is missing {} key(s):\n  {}",
                missing.len(),
                missing.into_iter().cloned().collect::<Vec<_>>().join("\n  ")
            ));
        }
    }

    assert!(
        failures.is_empty(),
        "Translation completeness check failed:\n\n{}\n\nHint: copy the missing keys from en-US, then translate.",
        failures.join("\n\n")
    );
}

#[test]
fn no_message_is_blank() {
    for (locale, src) in std::iter::once(&("en-US", EN_US)).chain(LOCALES) {
        let blank: Vec<_> = parse(src, locale)
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(key, _)| key)
            .collect();
        assert!(blank.is_empty(), "{locale} has blank messages: {blank:?}");
    }
}

/// Message id -> first-line value. Panics on duplicate definitions.
fn parse(src: &str, locale: &str) -> BTreeMap<String, String> {
    let mut messages = BTreeMap::new();
    let mut dups = BTreeSet::new();

    for line in src.lines() {
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with(['#', '-', '.']) {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            continue;
        }
        if messages.insert(key.to_string(), value.trim().to_string()).is_some() {
            dups.insert(key.to_string());
        }
    }

    assert!(dups.is_empty(), "Duplicate key definitions in {locale}: {dups:?}");
    messages
}

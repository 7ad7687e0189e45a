//! Internationalization (i18n) support for `tsagg-ui`.
//!
//! This module wires together:
//! - `i18n-embed` (language selection + asset loading)
//! - `fluent` (message formatting)
//! - `rust-embed` (compile-time embedding of `.ftl` files)
//! - `i18n-embed-fl` (`fl!` macro for compile‑time checked lookups)
//!
//! Folder layout (relative to this crate root):
//! ```text
//! i18n.toml
//! i18n/
//!   en-US/tsagg-ui.ftl   (fallback/reference)
//!   es-ES/tsagg-ui.ftl
//!   fr-FR/tsagg-ui.ftl
//! ```
//!
//! Only strings the widget shows to people live here: error notifications,
//! option labels for the host settings panel and the demo dashboard copy.
//! Field labels and rendered cell values come from the host and are never
//! translated.
//!
//! NOTE: The hyphenated filename `tsagg-ui.ftl` is canonical across all locales.
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// Ergonomic translation macro.
///     t!("error-data-title")
///
/// Expands to `fl!(&*LOADER, ...)` so every lookup routes through the shared loader.
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fluent "domain" (matches the crate / the fallback FTL filename).
const DOMAIN: &str = "tsagg-ui";

const FALLBACK: &str = "en-US";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

/// Global language loader used with the `fl!` macro.
pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = FALLBACK
        .parse()
        .expect("valid fallback language identifier");
    let loader = FluentLanguageLoader::new(DOMAIN, fallback.clone());
    // Load the fallback eagerly so lookups work even before `init()`.
    if let Err(err) = i18n_embed::select(&loader, &Localizations, &[fallback]) {
        tracing::warn!("failed loading fallback locale: {err}");
    }
    loader
});

static INIT: Once = Once::new();

/// Initialize i18n from the platform's requested languages (idempotent).
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        if let Err(err) = i18n_embed::select(&*LOADER, &Localizations, &requested) {
            tracing::warn!("failed selecting languages ({err}); continuing with fallback");
        }
    });
}

/// Switch language at runtime. If `tag` cannot be parsed it is ignored (Ok returned).
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let lang: LanguageIdentifier = match tag.parse() {
        Ok(l) => l,
        Err(_) => return Ok(()),
    };
    i18n_embed::select(&*LOADER, &Localizations, &[lang]).map(|_| ())
}

/// List available (embedded) language identifiers.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(|s| s.to_string()))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}

/// Pin the loader to the fallback locale. Tests comparing English copy call this.
#[cfg(test)]
pub(crate) fn use_fallback() {
    init();
    set_language(FALLBACK).expect("fallback locale is embedded");
}

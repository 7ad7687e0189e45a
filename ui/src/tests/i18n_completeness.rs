//! Every translation key used through the `t!` macro must resolve in the fallback locale.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const FTL_FILENAME: &str = "tsagg-ui.ftl";

fn fallback_keys(crate_root: &Path) -> BTreeSet<String> {
    let path = crate_root.join("i18n").join("en-US").join(FTL_FILENAME);
    let content = fs::read_to_string(&path).expect("fallback FTL file is readable");
    content
        .lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(|line| line.split_once('='))
        .map(|(key, _)| key.trim())
        .filter(|key| !key.is_empty() && key.chars().all(valid_key_char))
        .map(str::to_string)
        .collect()
}

fn valid_key_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '-')
}

/// Literal first arguments of `t!(...)` in every `.rs` file below `root`.
/// Calls like `format!("...")` end in `t!(` too, so the macro name must start
/// at a word boundary.
fn referenced_keys(root: &Path) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(path) = stack.pop() {
        if path.is_dir() {
            if let Ok(entries) = fs::read_dir(&path) {
                stack.extend(entries.flatten().map(|e| e.path()));
            }
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };

        let mut rest = content.as_str();
        let mut prev: Option<char> = None;
        while let Some(pos) = rest.find("t!(\"") {
            let before = rest[..pos].chars().next_back().or(prev);
            let tail = &rest[pos + 4..];
            let at_boundary = !before.is_some_and(|c| c.is_alphanumeric() || c == '_');
            if let Some(end) = tail.find('"') {
                let key = &tail[..end];
                if at_boundary && !key.is_empty() && key.chars().all(valid_key_char) {
                    found.insert(key.to_string());
                }
            }
            prev = Some('(');
            rest = tail;
        }
    }

    found
}

#[test]
fn referenced_keys_exist_in_fallback() {
    let crate_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let known = fallback_keys(&crate_root);
    assert!(!known.is_empty(), "no message keys parsed from fallback FTL");

    let referenced = referenced_keys(&crate_root.join("src"));
    assert!(referenced.contains("error-data-title"));

    let missing: Vec<_> = referenced.difference(&known).cloned().collect();
    assert!(
        missing.is_empty(),
        "translation keys used in code but missing from en-US:\n{}",
        missing.join("\n")
    );

    let unused: Vec<_> = known.difference(&referenced).cloned().collect();
    if !unused.is_empty() {
        eprintln!("[i18n] NOTE: fallback keys not referenced in code: {}", unused.join(", "));
    }
}

use crate::value::ScalarValue;
use regex::Regex;
use std::sync::OnceLock;

static IDENTIFIER_PREFIX: OnceLock<Regex> = OnceLock::new();
static IDENTIFIER_TOKEN: OnceLock<Regex> = OnceLock::new();
static NON_WORD: OnceLock<Regex> = OnceLock::new();

fn identifier_prefix() -> &'static Regex {
    IDENTIFIER_PREFIX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("valid identifier regex"))
}

fn identifier_token() -> &'static Regex {
    IDENTIFIER_TOKEN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

fn non_word() -> &'static Regex {
    NON_WORD.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid non-word regex"))
}

/// Prefix-only check: the pattern is not anchored at the end, so any value
/// that merely starts with a letter or underscore passes (`"phys-101"` does).
pub fn is_identifier_like(value: &str) -> bool {
    identifier_prefix().is_match(value)
}

/// Whole-token check: every character must be in `[A-Za-z0-9_]`.
pub fn is_identifier(value: &str) -> bool {
    identifier_token().is_match(value)
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_` unless the value
/// passes the prefix check, in which case it is returned unchanged.
pub fn sanitize(value: &str) -> String {
    if is_identifier_like(value) {
        value.to_string()
    } else {
        non_word().replace_all(value, "_").into_owned()
    }
}

pub fn sanitize_strict(value: &str) -> String {
    if is_identifier(value) {
        value.to_string()
    } else {
        non_word().replace_all(value, "_").into_owned()
    }
}

/// Text a column key is labelled from. Whole floats drop the fraction, so
/// `1.0` and `1` label alike.
fn label_text(key: &ScalarValue) -> String {
    match key {
        ScalarValue::Float64(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        other => other.to_string(),
    }
}

pub fn column_label(key: &ScalarValue, strict: bool) -> String {
    let raw = label_text(key);
    if strict { sanitize_strict(&raw) } else { sanitize(&raw) }
}

//! Filename sanitising for stored uploads

use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename regex"));

/// Maximum length kept from a client supplied filename
const MAX_FILENAME_LEN: usize = 120;

/// Reduce a client supplied filename to a safe ASCII name.
///
/// Path components are discarded, whitespace collapses to `_` and anything
/// outside `[A-Za-z0-9_.-]` is removed. Leading dots and underscores are
/// stripped so the result can never be a hidden file or a relative path.
/// Returns `None` when nothing usable is left.
pub fn secure_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        return None;
    }

    let mut result: String = trimmed.chars().take(MAX_FILENAME_LEN).collect();
    if result.ends_with('.') {
        result.pop();
    }
    Some(result)
}

/// Object key for a stored upload: `{application_id}/{unique}_{filename}`
pub fn object_name(application_id: i64, unique: &str, filename: &str) -> String {
    format!("{}/{}_{}", application_id, unique, filename)
}

//! Text normalization shared by the skill, experience and track matchers.

/// Lowercases and trims a free-form label. Returns `None` for blank input.
pub fn normalize_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Same as [`normalize_label`] for optional inputs.
pub fn normalize_optional(raw: Option<&str>) -> Option<String> {
    raw.and_then(normalize_label)
}

/// Symmetric substring containment on already-normalized text.
pub fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Trims each entry, drops blanks and collapses duplicates on the trimmed
/// spelling. First occurrence wins, so the input order is preserved.
pub fn dedup_trimmed(items: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() || out.iter().any(|seen| seen == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

/// Joins up to `max` names with ", " and appends "..." when more exist.
pub fn preview_list(items: &[String], max: usize) -> String {
    let shown: Vec<&str> = items.iter().take(max).map(String::as_str).collect();
    let mut joined = shown.join(", ");
    if items.len() > max {
        joined.push_str("...");
    }
    joined
}

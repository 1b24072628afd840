use std::collections::HashSet;

/// Trim every entry, then drop empty entries and those starting with one of
/// the `boilerplate` prefixes (compared case-insensitively)
pub fn clean(entries: Vec<String>, boilerplate: &[&str]) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty() && !is_boilerplate(entry, boilerplate))
        .collect()
}

/// Whether `entry` starts with one of the `boilerplate` prefixes, ignoring case
pub fn is_boilerplate(entry: &str, boilerplate: &[&str]) -> bool {
    let lower = entry.trim().to_lowercase();
    boilerplate
        .iter()
        .any(|prefix| lower.starts_with(&prefix.to_lowercase()))
}

/// Drop repeated entries, keeping the first occurrence
pub fn dedup(entries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

/// Split a comma separated list, trim the segments and join them back with
/// `", "`. Empty segments disappear.
pub fn join_keywords<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut seen = HashSet::new();
    parts
        .into_iter()
        .flat_map(|part| part.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ")
}

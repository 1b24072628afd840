use scraper::Html;

use super::selector;

/// Content of the first non-empty `<meta property=key>` or `<meta name=key>`
pub fn read(document: &Html, key: &str) -> Option<String> {
    read_all(document, key).into_iter().next()
}

/// Contents of every `<meta>` tag for `key`, in document order
pub fn read_all(document: &Html, key: &str) -> Vec<String> {
    let Some(tags) = selector(&format!("meta[property='{key}'], meta[name='{key}']")) else {
        return Vec::new();
    };

    document
        .select(&tags)
        .filter_map(|tag| tag.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .collect()
}

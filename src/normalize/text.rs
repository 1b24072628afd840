use scraper::Html;

/// Collapse every run of whitespace into a single space and trim the ends
pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace inside each line while keeping paragraph breaks.
///
/// Runs of blank lines become a single blank line; leading and trailing
/// blank lines are dropped.
pub fn collapse_lines(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines().map(collapse) {
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Reduce embedded markup to its text content.
///
/// Block-level breaks (`<br>`, `</p>`, `</li>`) become line breaks so that
/// multi-paragraph steps keep their structure.
pub fn strip_markup(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    let spaced = text
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p>", "</p>\n")
        .replace("</li>", "</li>\n");
    let fragment = Html::parse_fragment(&spaced);
    fragment.root_element().text().collect::<String>()
}

/// First integer token of the text, e.g. `"Serves 4 people"` -> 4
pub fn first_integer(text: &str) -> Option<u16> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .find_map(|part| part.parse::<u16>().ok())
}

/// Remove a trailing suffix, ignoring ASCII case and surrounding whitespace
pub fn strip_suffix_ci<'a>(text: &'a str, suffix: &str) -> &'a str {
    let trimmed = text.trim_end();
    let suffix = suffix.trim();
    if suffix.is_empty() || trimmed.len() < suffix.len() {
        return text;
    }

    let split = trimmed.len() - suffix.len();
    match (trimmed.get(..split), trimmed.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => head.trim_end(),
        _ => text,
    }
}

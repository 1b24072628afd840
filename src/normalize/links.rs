use scraper::{Html, Selector};
use url::Url;

/// The URL relative links of the document resolve against: `<base href>` when
/// present (itself resolved against the page URL), otherwise the page URL.
pub fn document_base(document: &Html, page_url: &str) -> Option<Url> {
    let page = Url::parse(page_url).ok();

    let base_href = Selector::parse("base[href]")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .and_then(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());

    match (base_href, page) {
        (Some(href), page) => Url::parse(href)
            .ok()
            .or_else(|| page.as_ref().and_then(|p| p.join(href).ok()))
            .or(page),
        (None, page) => page,
    }
}

/// Resolve `raw` into an absolute http(s) URL. Relative links without a base
/// are not valid and yield `None`.
pub fn resolve(base: Option<&Url>, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("data:") {
        return None;
    }

    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(raw).ok()?,
        Err(_) => return None,
    };

    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

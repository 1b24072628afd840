use log::debug;
use scraper::{ElementRef, Html};

use super::{element_text, selector};

/// Properties whose value is a link rather than text
const LINK_PROPS: &[&str] = &["image", "thumbnailUrl", "url", "embedUrl", "contentUrl", "video"];

/// The element declaring a schema.org Recipe item, if the page has one
pub fn find_recipe_container(document: &Html) -> Option<ElementRef<'_>> {
    let scopes = selector("[itemscope][itemtype]")?;
    document.select(&scopes).find(|element| {
        element.value().attr("itemtype").is_some_and(|itemtype| {
            itemtype
                .split_whitespace()
                .any(|t| {
                    t.ends_with("schema.org/Recipe") || t.ends_with("data-vocabulary.org/Recipe")
                })
        })
    })
}

/// Value of the first element carrying `itemprop`, scoped to the Recipe item
/// when the page declares one
pub fn read(document: &Html, prop: &str) -> Option<String> {
    matching(document, prop)
        .into_iter()
        .map(|element| item_value(element, prop))
        .find(|value| !value.is_empty())
}

/// Values of every element carrying `itemprop`, in document order.
///
/// A single list element (`<ol itemprop="recipeInstructions">`) is split
/// into its items.
pub fn read_all(document: &Html, prop: &str) -> Vec<String> {
    let elements = matching(document, prop);
    if let [only] = elements.as_slice() {
        let items = list_items(*only);
        if !items.is_empty() {
            return items;
        }
    }

    elements
        .into_iter()
        .map(|element| item_value(element, prop))
        .filter(|value| !value.is_empty())
        .collect()
}

/// Whether any element carries `itemprop`
pub fn has(document: &Html, prop: &str) -> bool {
    !matching(document, prop).is_empty()
}

/// The nested item declared under `prop`, e.g. `itemprop="nutrition"`
pub fn nested_item<'a>(document: &'a Html, prop: &str) -> Option<ElementRef<'a>> {
    matching(document, prop)
        .into_iter()
        .find(|element| element.value().attr("itemscope").is_some())
}

/// Value of the first property of `item` itself, nested items skipped
pub fn read_in(item: ElementRef, prop: &str) -> Option<String> {
    let props = selector(&format!("[itemprop~='{prop}']"))?;
    item.select(&props)
        .filter(|element| owned_by(*element, item))
        .map(|element| item_value(element, prop))
        .find(|value| !value.is_empty())
}

fn matching<'a>(document: &'a Html, prop: &str) -> Vec<ElementRef<'a>> {
    let Some(props) = selector(&format!("[itemprop~='{prop}']")) else {
        return Vec::new();
    };

    match find_recipe_container(document) {
        Some(container) => {
            let elements: Vec<_> = container
                .select(&props)
                .filter(|element| owned_by(*element, container))
                .collect();
            debug!("microdata: {} '{}' in Recipe item", elements.len(), prop);
            elements
        }
        None => document.select(&props).collect(),
    }
}

/// Whether the nearest enclosing item of `element` is `container`, so that
/// properties of nested items (author, nutrition, reviews) are skipped
fn owned_by(element: ElementRef, container: ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().attr("itemscope").is_some())
        .is_some_and(|scope| scope.id() == container.id())
}

fn item_value(element: ElementRef, prop: &str) -> String {
    let el = element.value();
    let link = LINK_PROPS.contains(&prop);

    let attr = match el.name() {
        "meta" => el.attr("content"),
        "img" | "audio" | "video" | "source" | "iframe" | "embed" if link => el.attr("src"),
        "a" | "link" | "area" if link => el.attr("href"),
        "time" => el.attr("datetime"),
        "data" | "meter" => el.attr("value"),
        _ => None,
    };

    attr.or_else(|| el.attr("content"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| element_text(element))
}

fn list_items(element: ElementRef) -> Vec<String> {
    let Some(items) = selector("li") else {
        return Vec::new();
    };
    element
        .select(&items)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

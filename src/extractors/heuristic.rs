//! Recovers ingredient and instruction lists from pages without structured
//! data by locating their headings and walking the content that follows.

use log::debug;
use scraper::node::Node;
use scraper::{ElementRef, Html};

use super::{element_text, selector, Extractor, Lists, ParsingContext, ScanLimits};
use crate::error::ScrapeError;
use crate::model::Instruction;
use crate::normalize::text;

const INGREDIENT_LABELS: &[&str] = &["ingredients"];
const INSTRUCTION_LABELS: &[&str] = &["method", "directions", "instructions", "preparation"];

/// Elements that may carry a section label
const LABEL_CANDIDATES: &str = "h1, h2, h3, h4, h5, h6, strong, b, dt, label, p, div, span";

/// Elements that end a section
const BOUNDARIES: &[&str] = &[
    "section", "article", "aside", "footer", "header", "nav", "form", "hr", "main", "table",
];

/// Elements that never hold recipe text
const SKIPPED: &[&str] = &["script", "style", "noscript", "br", "img", "figure", "svg", "button"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Ingredients,
    Instructions,
}

#[derive(Debug, PartialEq)]
enum Entry {
    Item(String),
    Heading(String),
}

pub struct HeadingExtractor;

impl Extractor for HeadingExtractor {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn parse(&self, context: &ParsingContext, limits: &ScanLimits) -> Result<Lists, ScrapeError> {
        let document = &context.document;

        let ingredients = scan(document, Label::Ingredients, limits)?
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Item(item) => Some(item),
                Entry::Heading(_) => None,
            })
            .collect();
        let instructions = into_instructions(scan(document, Label::Instructions, limits)?);

        Ok(Lists {
            ingredients,
            instructions,
        })
    }
}

/// Text of the first `<h1>`, used when no source names the recipe
pub fn first_heading(document: &Html) -> Option<String> {
    let h1 = selector("h1")?;
    document
        .select(&h1)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn label_of(element: ElementRef) -> Option<Label> {
    // cheap reject before collecting the text of large containers
    if element.text().map(str::len).sum::<usize>() > 40 {
        return None;
    }
    let text = element_text(element).to_lowercase();
    let text = text.trim_end_matches(':').trim();

    if INGREDIENT_LABELS.contains(&text) {
        Some(Label::Ingredients)
    } else if INSTRUCTION_LABELS.contains(&text) {
        Some(Label::Instructions)
    } else {
        None
    }
}

fn heading_level(element: ElementRef) -> Option<u8> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Every anchor labelled `wanted`, tried in document order until one yields
/// entries
fn scan(document: &Html, wanted: Label, limits: &ScanLimits) -> Result<Vec<Entry>, ScrapeError> {
    let Some(candidates) = selector(LABEL_CANDIDATES) else {
        return Ok(Vec::new());
    };

    for candidate in document.select(&candidates) {
        limits.check()?;
        if label_of(candidate) != Some(wanted) {
            continue;
        }

        let anchor = widen(candidate);
        let mut entries = collect_after(anchor, limits)?;
        if entries.is_empty() {
            // the label may sit alone in a wrapper next to the content
            if let Some(parent) = anchor.parent().and_then(ElementRef::wrap) {
                if !matches!(parent.value().name(), "body" | "html") {
                    entries = collect_after(parent, limits)?;
                }
            }
        }

        if !entries.is_empty() {
            debug!("heuristic: {} entries after {:?} label", entries.len(), wanted);
            return Ok(entries);
        }
    }

    Ok(Vec::new())
}

/// Climb from an inline label to the outermost ancestor with the same text,
/// e.g. `<p><strong>Ingredients</strong></p>` anchors on the paragraph
fn widen(label: ElementRef) -> ElementRef {
    let text = element_text(label);
    let mut anchor = label;
    while let Some(parent) = anchor.parent().and_then(ElementRef::wrap) {
        if matches!(parent.value().name(), "body" | "html") || element_text(parent) != text {
            break;
        }
        anchor = parent;
    }
    anchor
}

fn collect_after(anchor: ElementRef, limits: &ScanLimits) -> Result<Vec<Entry>, ScrapeError> {
    // non-heading anchors stop at any heading
    let level = heading_level(anchor).unwrap_or(0);
    let mut entries = Vec::new();

    for sibling in anchor.next_siblings() {
        limits.check()?;
        if entries.len() >= limits.max_entries {
            break;
        }

        let element = match sibling.value() {
            Node::Text(t) => {
                entries.extend(item(t));
                continue;
            }
            Node::Element(_) => match ElementRef::wrap(sibling) {
                Some(element) => element,
                None => continue,
            },
            _ => continue,
        };

        let name = element.value().name();
        if SKIPPED.contains(&name) {
            continue;
        }
        if BOUNDARIES.contains(&name) || label_of(element).is_some() {
            break;
        }
        if let Some(sub) = heading_level(element) {
            if sub <= level || level == 0 {
                break;
            }
            let title = element_text(element);
            if !title.is_empty() {
                entries.push(Entry::Heading(title));
            }
            continue;
        }

        match name {
            "ul" | "ol" => {
                entries.extend(direct_items(element).into_iter().filter_map(|t| item(&t)))
            }
            "dl" => entries.extend(descendants(element, "dd").into_iter().filter_map(|t| item(&t))),
            "div" => {
                let nested = descendants(element, "li");
                let lines = if nested.is_empty() {
                    break_separated(element)
                } else {
                    nested
                };
                entries.extend(lines.into_iter().filter_map(|t| item(&t)));
            }
            _ => entries.extend(break_separated(element).into_iter().filter_map(|t| item(&t))),
        }
    }

    entries.truncate(limits.max_entries);
    Ok(entries)
}

fn item(raw: &str) -> Option<Entry> {
    let collapsed = text::collapse(raw);
    (!collapsed.is_empty()).then_some(Entry::Item(collapsed))
}

fn direct_items(list: ElementRef) -> Vec<String> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .map(element_text)
        .collect()
}

fn descendants(element: ElementRef, css: &str) -> Vec<String> {
    let Some(sel) = selector(css) else {
        return Vec::new();
    };
    element.select(&sel).map(element_text).collect()
}

/// Text of an element split on its `<br>` line breaks
fn break_separated(element: ElementRef) -> Vec<String> {
    let mut lines = vec![String::new()];
    for child in element.children() {
        match child.value() {
            Node::Text(t) => push_str(&mut lines, t),
            Node::Element(el) if el.name() == "br" => lines.push(String::new()),
            Node::Element(_) => {
                if let Some(inner) = ElementRef::wrap(child) {
                    let inner_lines = break_separated(inner);
                    for (i, line) in inner_lines.iter().enumerate() {
                        if i > 0 {
                            lines.push(String::new());
                        }
                        push_str(&mut lines, line);
                    }
                }
            }
            _ => {}
        }
    }
    lines
}

fn push_str(lines: &mut Vec<String>, text: &str) {
    if let Some(last) = lines.last_mut() {
        last.push(' ');
        last.push_str(text);
    }
}

fn into_instructions(entries: Vec<Entry>) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    for entry in entries {
        match entry {
            Entry::Heading(name) => instructions.push(Instruction::Section {
                name,
                steps: Vec::new(),
            }),
            Entry::Item(text) => match instructions.last_mut() {
                Some(Instruction::Section { steps, .. }) => steps.push(text),
                _ => instructions.push(Instruction::step(text)),
            },
        }
    }
    instructions
}

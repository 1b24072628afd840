//! Pure text helpers shared by the readers, the pipeline and site overrides.

pub mod date;
pub mod duration;
pub mod encoding;
pub mod links;
pub mod list;
pub mod text;

/// Repaired, markup-free, single-line text for scalar fields
pub fn clean_text(raw: &str) -> String {
    text::collapse(&text::strip_markup(&encoding::repair(raw)))
}

/// Repaired, markup-free text that keeps paragraph breaks, for instruction steps
pub fn clean_step(raw: &str) -> String {
    text::collapse_lines(&text::strip_markup(&encoding::repair(raw)))
}

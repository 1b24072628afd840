//! Repair of HTML entities and UTF-8 text that was decoded as Windows-1252.
//!
//! The mis-decoded sequences are a fixed lexicon of what publishers have been
//! seen to emit. Add to it when a new sequence shows up in the wild.

use html_escape::decode_html_entities;
use regex::Regex;
use std::sync::OnceLock;

/// UTF-8 punctuation and letters as they appear after a Windows-1252 decode.
/// Order matters: multi-byte sequences sharing a prefix come first.
const MOJIBAKE: &[(&str, &str)] = &[
    ("â€™", "’"),
    ("â€˜", "‘"),
    ("â€œ", "“"),
    ("â€\u{9d}", "”"),
    ("â€“", "–"),
    ("â€”", "—"),
    ("â€¢", "•"),
    ("â€¦", "…"),
    ("Ã\u{a0}", "à"),
    ("Ã¡", "á"),
    ("Ã¢", "â"),
    ("Ã¤", "ä"),
    ("Ã§", "ç"),
    ("Ã¨", "è"),
    ("Ã©", "é"),
    ("Ãª", "ê"),
    ("Ã«", "ë"),
    ("Ã®", "î"),
    ("Ã¯", "ï"),
    ("Ã±", "ñ"),
    ("Ã³", "ó"),
    ("Ã´", "ô"),
    ("Ã¶", "ö"),
    ("Ã¹", "ù"),
    ("Ã»", "û"),
    ("Ã¼", "ü"),
    ("Â°", "°"),
    ("Â½", "½"),
    ("Â¼", "¼"),
    ("Â¾", "¾"),
    ("Â\u{a0}", " "),
];

/// Characters that carry no content in recipe text
const INVISIBLE: &[(&str, &str)] = &[
    ("\u{a0}", " "),
    ("\u{202f}", " "),
    ("\u{2009}", " "),
    ("\u{200b}", ""),
    ("\u{ad}", ""),
];

fn ordinal_degree_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d)\s?º").expect("valid degree regex"))
}

/// Decode HTML entities (twice, some publishers double-encode) and replace
/// known mis-decoded sequences.
pub fn repair(text: &str) -> String {
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();

    let mut repaired = if decoded.contains(&['â', 'Ã', 'Â'][..]) {
        MOJIBAKE
            .iter()
            .fold(decoded, |acc, &(bad, good)| acc.replace(bad, good))
    } else {
        decoded
    };

    repaired = INVISIBLE
        .iter()
        .fold(repaired, |acc, &(bad, good)| acc.replace(bad, good));

    if repaired.contains('º') {
        repaired = ordinal_degree_regex()
            .replace_all(&repaired, "${1}°")
            .into_owned();
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repairs_smart_punctuation() {
        assert_eq!(repair("Grandmaâ€™s â€œbestâ€\u{9d} pie"), "Grandma’s “best” pie");
        assert_eq!(repair("â€“ Mix well"), "– Mix well");
        assert_eq!(repair("Bake at 180Â°C"), "Bake at 180°C");
        assert_eq!(repair("crÃ¨me fraÃ®che"), "crème fraîche");
    }

    #[test]
    fn test_decodes_entities_twice() {
        assert_eq!(repair("Salt &amp;amp; pepper"), "Salt & pepper");
        assert_eq!(repair("&frac12; cup"), "½ cup");
        assert_eq!(repair("it&#8217;s"), "it’s");
    }

    #[test]
    fn test_invisible_characters() {
        assert_eq!(repair("1\u{a0}cup"), "1 cup");
        assert_eq!(repair("soft\u{ad}ware"), "software");
    }

    #[test]
    fn test_ordinal_degree() {
        assert_eq!(repair("Oven at 200º"), "Oven at 200°");
        assert_eq!(repair("1 º paso"), "1° paso");
        assert_eq!(repair("º alone"), "º alone");
    }

    #[test]
    fn test_clean_text_untouched() {
        assert_eq!(repair("Crème brûlée"), "Crème brûlée");
    }
}

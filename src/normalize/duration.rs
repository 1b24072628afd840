//! Free-text and ISO-8601 durations to the `PT#H#M` form used by timing fields.

use regex::Regex;
use std::sync::OnceLock;

fn iso_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^P(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
        )
        .expect("valid ISO-8601 duration regex")
    })
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+(?:[.,]\d+)?)\s*(\p{L}*)").expect("valid duration token regex")
    })
}

fn clock_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2}):([0-5]\d)(?:\s*h)?$").expect("valid clock regex"))
}

/// Normalize a duration to `PT#H#M`.
///
/// Values already starting with `PT` are returned unchanged, which makes the
/// function idempotent. Text that cannot be read as a duration is returned
/// as-is; callers treat anything without the `PT` prefix as unverified.
///
/// ```
/// use recipe_scraper::normalize::duration;
///
/// assert_eq!(duration::parse("1 hr 30 min"), "PT1H30M");
/// assert_eq!(duration::parse("45 min"), "PT45M");
/// assert_eq!(duration::parse("PT10M"), "PT10M");
/// ```
pub fn parse(text: &str) -> String {
    if text.starts_with("PT") {
        return text.to_string();
    }

    let trimmed = text.trim();
    if trimmed.starts_with("PT") {
        return trimmed.to_string();
    }

    parse_iso(trimmed)
        .or_else(|| parse_clock(trimmed))
        .or_else(|| parse_free_text(trimmed))
        .map(format_minutes)
        .unwrap_or_else(|| text.to_string())
}

/// Whether the value has been normalized (or was supplied) as an ISO duration
pub fn is_normalized(value: &str) -> bool {
    value.starts_with("PT")
}

/// Format a number of minutes as `PT#H#M`
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let minutes = minutes % 60;
    match (hours, minutes) {
        (0, m) => format!("PT{m}M"),
        (h, 0) => format!("PT{h}H"),
        (h, m) => format!("PT{h}H{m}M"),
    }
}

/// `P1DT2H30M`-style durations that do not start with `PT`
fn parse_iso(text: &str) -> Option<u32> {
    let caps = iso_regex().captures(text)?;
    if caps.iter().skip(1).all(|c| c.is_none()) {
        return None;
    }

    let part = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let minutes = part(1) * 24.0 * 60.0 + part(2) * 60.0 + part(3) + part(4) / 60.0;
    Some(minutes.round() as u32)
}

/// `1:30` or `1:30 h`
fn parse_clock(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    let caps = clock_regex().captures(&lower)?;
    let hours: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u32 = caps.get(2)?.as_str().parse().ok()?;
    Some(hours * 60 + minutes)
}

#[derive(Clone, Copy, PartialEq)]
enum Unit {
    Days,
    Hours,
    Minutes,
}

fn unit_of(word: &str) -> Option<Unit> {
    match word {
        "d" | "day" | "days" => Some(Unit::Days),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(Unit::Hours),
        "m" | "min" | "mins" => Some(Unit::Minutes),
        w if w.starts_with("hour") || w.starts_with("heure") => Some(Unit::Hours),
        w if w.starts_with("min") => Some(Unit::Minutes),
        _ => None,
    }
}

/// `1 hr 30 min`, `45 minutes`, `1.5 hours`, `1h30`, or a bare number of minutes
fn parse_free_text(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    let tokens: Vec<(f64, String)> = token_regex()
        .captures_iter(&lower)
        .filter_map(|caps| {
            let number = caps.get(1)?.as_str().replace(',', ".").parse::<f64>().ok()?;
            let word = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
            Some((number, word))
        })
        .collect();

    if tokens.is_empty() {
        return None;
    }

    if tokens.len() == 1
        && tokens[0].1.is_empty()
        && lower.trim().chars().all(|c| c.is_ascii_digit())
    {
        return Some(tokens[0].0.round() as u32);
    }

    let mut total = 0.0;
    let mut found = false;
    let mut previous = None;
    for (number, word) in &tokens {
        let unit = if word.is_empty() && previous == Some(Unit::Hours) {
            Some(Unit::Minutes)
        } else {
            unit_of(word)
        };

        match unit {
            Some(Unit::Days) => total += number * 24.0 * 60.0,
            Some(Unit::Hours) => total += number * 60.0,
            Some(Unit::Minutes) => total += number,
            // `1 hr 20 mn` must not silently become one hour
            None if !word.is_empty() => return None,
            None => {}
        }

        if unit.is_some() {
            found = true;
        }
        previous = unit;
    }

    found.then(|| total.round() as u32)
}

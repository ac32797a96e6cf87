//! Locale-tolerant parsers for the textual number and date fields carried
//! by the receivables source. Both parsers are total: malformed input
//! degrades to `0.0` / `None`, never an error.

use chrono::{DateTime, NaiveDate};

/// Spanish month names, full forms first so `"marzo"` wins over `"mar"`.
const SPANISH_MONTHS: &[(&str, u32)] = &[
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
    ("ene", 1),
    ("feb", 2),
    ("mar", 3),
    ("abr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("ago", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dic", 12),
];

/// Parses a currency amount written in either European (`1.234,56`) or
/// US (`1,234.56`) notation, with optional `€`/`EUR` markers.
///
/// Whichever separator occurs last is taken as the decimal point; the
/// other is stripped as a thousands separator. Returns 0.0 for blank or
/// unparseable input.
pub fn parse_amount(raw: &str) -> f64 {
    let mut clean: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .collect();

    if clean.to_uppercase().starts_with("EUR") {
        clean.drain(..3);
    }
    if clean.to_uppercase().ends_with("EUR") {
        clean.truncate(clean.len() - 3);
    }

    if clean.is_empty() {
        return 0.0;
    }

    let last_comma = clean.rfind(',');
    let last_dot = clean.rfind('.');

    match (last_comma, last_dot) {
        // European: comma is the decimal point, dots are thousands.
        (Some(c), d) if d.map_or(true, |d| c > d) => {
            clean.retain(|ch| ch != '.');
            clean = clean.replacen(',', ".", 1);
        }
        // US: dot is the decimal point, commas are thousands.
        (Some(_), Some(_)) => {
            clean.retain(|ch| ch != ',');
        }
        _ => {}
    }

    clean.parse::<f64>().unwrap_or(0.0)
}

/// Parses a date written as ISO (`2024-03-15`), European (`15/03/2024`),
/// or Spanish text (`15 de marzo de 2024`), ignoring trailing time-of-day
/// tokens. Returns `None` for blank or unrecognizable input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut clean = trimmed.to_lowercase();
    for (name, month) in SPANISH_MONTHS {
        if clean.contains(name) {
            clean = clean.replace(name, &format!("{:02}", month));
            break;
        }
    }

    let tokens: Vec<&str> = clean
        .split(['-', '/', ' ', '\t'])
        .filter(|t| !t.is_empty() && !matches!(*t, "de" | "del" | "of"))
        .collect();

    if tokens.len() >= 3 {
        if let Some(date) = date_from_tokens(&tokens) {
            return Some(date);
        }
    }

    // Generic fallback: plain ISO date, then a full RFC 3339 instant.
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

fn date_from_tokens(tokens: &[&str]) -> Option<NaiveDate> {
    let p0 = tokens[0].parse::<i32>().ok()?;
    let p1 = tokens[1].parse::<u32>().ok()?;
    let p2 = tokens[2].parse::<i32>().ok()?;

    if tokens[0].len() == 4 {
        // Year-Month-Day
        NaiveDate::from_ymd_opt(p0, p1, p2 as u32)
    } else if tokens[2].len() == 4 || p2 > 1000 {
        // Day-Month-Year
        NaiveDate::from_ymd_opt(p2, p1, p0 as u32)
    } else {
        None
    }
}

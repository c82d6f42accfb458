use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Day cell values that mean the employee does not work that day
pub const REST_KEYWORDS: [&str; 6] = [
    "REPOS",
    "ABSENCE",
    "OFF",
    "MALADIE",
    "CONGÉ PAYÉ",
    "CONGÉ MATERNITÉ",
];

lazy_static! {
    // Unanchored: the first range found anywhere in the cell wins
    static ref SHIFT_RANGE_RE: Regex =
        Regex::new(r"([0-9]{1,2})h?\s*[-à]\s*([0-9]{1,2})h?").unwrap();
}

/// Start and end hour of a shift. The end may exceed 23 for shifts that
/// cross midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ParsedShift {
    pub start_hour: u32,
    pub end_hour: u32,
}

/// Whether a day cell holds a rest or leave marker
pub fn is_rest_marker(text: &str) -> bool {
    let upper = text.to_uppercase();
    REST_KEYWORDS.contains(&upper.as_str())
}

/// Parse a planning cell such as `"22h-6h"`, `"6 - 14"` or `"22hà6h"`.
///
/// Returns `None` for empty cells, rest markers and anything the range
/// pattern does not recognise. A shift ending before noon and before its
/// start is moved to the next day (`end + 24`).
pub fn parse_shift(text: &str) -> Option<ParsedShift> {
    if text.is_empty() || is_rest_marker(text) {
        return None;
    }

    let caps = SHIFT_RANGE_RE.captures(text.trim())?;
    let start_hour = caps[1].parse::<u32>().ok()?;
    let mut end_hour = caps[2].parse::<u32>().ok()?;

    if end_hour < start_hour && end_hour < 12 {
        end_hour += 24;
    }

    Some(ParsedShift {
        start_hour,
        end_hour,
    })
}

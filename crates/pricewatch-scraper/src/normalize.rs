//! Locale-aware price text normalization.
//!
//! Store pages render prices as `"$ 1.234.567,89"` (es-AR), `"US$1,234.56"`
//! (en-US) or split across integer/fraction elements. Everything here is a
//! pure function from text to an optional value; an unparseable price is
//! "not found", never an error.

/// Parses price text into a number, or `None` when no number can be read.
///
/// All characters except ASCII digits, `,` and `.` are dropped first, then:
///
/// - both separators present: whichever occurs last is the decimal point and
///   every occurrence of the other is removed;
/// - only `,` present: each `,` becomes `.`;
/// - only `.` present: groups of exactly three digits after every `.` are
///   thousands grouping (`"12.345"` is twelve thousand three hundred
///   forty-five); otherwise all but the last `.` are removed.
#[must_use]
pub fn normalize_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');

    let canonical = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        (None, Some(_)) => collapse_dots(&cleaned),
        (None, None) => cleaned,
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Resolves dot-only text. Digits grouped in threes after every dot
/// (`"12.345"`, `"1.234.567"`) are an integer with thousands separators;
/// otherwise the last `.` is the decimal point and the rest are dropped.
fn collapse_dots(cleaned: &str) -> String {
    let groups: Vec<&str> = cleaned.split('.').collect();
    if is_thousands_grouping(&groups) {
        return groups.concat();
    }

    let last_dot = cleaned.rfind('.').unwrap_or(cleaned.len());
    let (head, tail) = cleaned.split_at(last_dot);
    format!("{}{tail}", head.replace('.', ""))
}

fn is_thousands_grouping(groups: &[&str]) -> bool {
    let Some((lead, rest)) = groups.split_first() else {
        return false;
    };
    !rest.is_empty()
        && (1..=3).contains(&lead.len())
        && !lead.starts_with('0')
        && rest.iter().all(|g| g.len() == 3)
}

/// Joins an integer part and an optional fractional part rendered in
/// separate elements, e.g. `"1.234"` and `"56"`, before normalization.
///
/// A trailing separator on the integer part (Amazon renders `"1,234."`) is
/// dropped so the fraction can be appended cleanly.
#[must_use]
pub fn join_price_parts(whole: &str, fraction: Option<&str>) -> String {
    let whole = whole.trim();
    match fraction.map(str::trim).filter(|f| !f.is_empty()) {
        Some(fraction) => {
            let whole = trim_trailing_separator(whole);
            format!("{whole}.{fraction}")
        }
        None => whole.to_owned(),
    }
}

/// Drops trailing `.`/`,` and whitespace, e.g. `"1,234 ."` becomes `"1,234"`.
pub(crate) fn trim_trailing_separator(whole: &str) -> &str {
    whole.trim_end_matches(|c: char| matches!(c, '.' | ',') || c.is_whitespace())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

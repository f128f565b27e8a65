use crate::models::Figure;

/// Placeholder shown for a value that failed to parse.
pub const MISSING: &str = "n/a";

/// Format an integer with thousands separators.
///
/// # Examples
///
/// ```
/// use sales_core::formatting::format_number;
///
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(0), "0");
/// assert_eq!(format_number(-9876), "-9,876");
/// ```
pub fn format_number(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a whole-unit currency amount.
///
/// # Examples
///
/// ```
/// use sales_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234), "$1,234");
/// assert_eq!(format_currency(0), "$0");
/// assert_eq!(format_currency(-1), "$-1");
/// ```
pub fn format_currency(amount: i64) -> String {
    format!("${}", format_number(amount))
}

/// Format a unit count, or [`MISSING`].
pub fn format_units(units: Figure) -> String {
    units.map(format_number).unwrap_or_else(|| MISSING.to_string())
}

/// Format a currency figure, or [`MISSING`].
pub fn format_amount(amount: Figure) -> String {
    amount
        .map(format_currency)
        .unwrap_or_else(|| MISSING.to_string())
}

/// `"<units> / <revenue>"`, the layout used for per-category table cells.
pub fn format_units_and_revenue(units: Figure, revenue: Figure) -> String {
    format!("{} / {}", format_units(units), format_amount(revenue))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = s.len() % 3;
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────

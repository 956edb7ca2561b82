//! Cent-denominated money helpers.
//!
//! Every money value in the app renders through [`format_cents`], so all
//! amounts display with exactly two decimals.

/// Format cents as dollars, e.g. `1234` -> `"$12.34"`, `-50` -> `"-$0.50"`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Parse a user-entered dollar amount into cents.
///
/// Accepts an optional leading `-` and `$`, up to two decimals, and
/// surrounding whitespace: `"12"`, `"$12.5"`, `"-3.07"`, `".50"`.
/// Anything else (more decimals, stray characters, empty input) is `None`.
pub fn parse_money(input: &str) -> Option<i64> {
    let mut rest = input.trim();
    let negative = rest.starts_with('-');
    if negative {
        rest = &rest[1..];
    }
    rest = rest.strip_prefix('$').unwrap_or(rest);
    if rest.is_empty() {
        return None;
    }

    let (dollars_part, cents_part) = match rest.split_once('.') {
        None => (rest, ""),
        Some((dollars, frac)) => (dollars, frac),
    };
    if dollars_part.is_empty() && cents_part.is_empty() {
        return None;
    }
    if !dollars_part.bytes().all(|b| b.is_ascii_digit())
        || !cents_part.bytes().all(|b| b.is_ascii_digit())
        || cents_part.len() > 2
    {
        return None;
    }

    let dollars: i64 = if dollars_part.is_empty() {
        0
    } else {
        dollars_part.parse().ok()?
    };
    let cents: i64 = match cents_part.len() {
        0 => 0,
        1 => cents_part.parse::<i64>().ok()? * 10,
        _ => cents_part.parse().ok()?,
    };

    let total = dollars.checked_mul(100)?.checked_add(cents)?;
    Some(if negative { -total } else { total })
}

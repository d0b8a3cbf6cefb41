//! Display formatting for money, credits and percentages.
//!
//! Amounts are carried as `f64` everywhere else; these are the only places
//! that round.

/// Insert `,` every three digits of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed-point rendering with thousands separators: `1234.5, 2` → `1,234.50`.
pub fn format_decimal(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    // `-0.00` reads as zero.
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Whole number with thousands separators.
pub fn format_number(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Credits, rounded to a whole credit.
pub fn format_credits(credits: f64) -> String {
    format_decimal(credits, 0)
}

/// Dollar amount: `28333.333, 2` → `$28,333.33`, `-5.0, 0` → `-$5`.
/// Half-way values round the way `format!` does.
pub fn format_currency(amount: f64, decimals: usize) -> String {
    let body = format_decimal(amount, decimals);
    match body.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${body}"),
    }
}

/// Per-credit price, always four decimals: `$0.0068`.
pub fn format_rate(rate: f64) -> String {
    format_currency(rate, 4)
}

pub fn format_percent(pct: f64, decimals: usize) -> String {
    format!("{}%", format_decimal(pct, decimals))
}

/// Short axis label: `4_347_355.0` → `4.3M`, `61_432.0` → `61.4K`.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1_000_000_000.0 {
        (value / 1_000_000_000.0, "B")
    } else if abs >= 1_000_000.0 {
        (value / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        (value / 1_000.0, "K")
    } else {
        return format_decimal(value, 0);
    };
    let text = format!("{scaled:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{suffix}")
}

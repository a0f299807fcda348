/// Render a money amount as `1,234.56 USD`.
///
/// Non-finite amounts render as zero; negative amounts keep a leading minus.
pub fn format_money(amount: f64, currency: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    // Decimal rendering of the magnitude keeps every integer digit.
    let rendered = format!("{:.2}", amount.abs());
    let (whole, cents) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    let rounds_to_zero = whole.bytes().all(|b| b == b'0') && cents == "00";
    let sign = if amount < 0.0 && !rounds_to_zero { "-" } else { "" };

    format!("{sign}{}.{cents} {currency}", group_thousands(whole))
}

/// Render hours with two decimals.
pub fn format_hours(hours: f64) -> String {
    let hours = if hours.is_finite() { hours } else { 0.0 };
    format!("{hours:.2}")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

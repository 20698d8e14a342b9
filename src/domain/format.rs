// Display formatting. Values are rounded here and nowhere earlier.
use super::settings::{CurrencyFormat, CurrencyPosition};

/// Groups the integer part with commas and keeps up to two fraction digits,
/// dropping trailing zeros: `1234.5` → `1,234.5`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_money(value: f64, currency: &CurrencyFormat) -> String {
    let number = format_number(value);
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number.as_str()),
    };
    match currency.position {
        CurrencyPosition::Left => format!("{}{}{}", sign, currency.symbol, digits),
        CurrencyPosition::Right => format!("{}{}{}", sign, digits, currency.symbol),
    }
}

/// Whole-number percentage, e.g. `66.666` → `67%`
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    format!("{}%", value.round() as i64)
}

/// Signed change with one decimal, e.g. `+4.2%`
pub fn format_change(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_string();
    }
    if value > 0.0 {
        format!("+{:.1}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(1_000_000.0), "1,000,000");
        assert_eq!(format_number(-987.654), "-987.65");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn test_format_money_respects_position() {
        let left = CurrencyFormat::default();
        assert_eq!(format_money(-1500.0, &left), "-$1,500");

        let right = CurrencyFormat {
            symbol: " kr".to_string(),
            position: CurrencyPosition::Right,
        };
        assert_eq!(format_money(99.9, &right), "99.9 kr");
    }

    #[test]
    fn test_format_percent_rounds_once() {
        assert_eq!(format_percent(200.0 / 3.0), "67%");
        assert_eq!(format_percent(f64::INFINITY), "0%");
        assert_eq!(format_change(4.26), "+4.3%");
        assert_eq!(format_change(-1.0), "-1.0%");
    }
}

//! Cell formatting.

/// Formats a nightly rate with a currency symbol.
///
/// Whole amounts have no decimals (`$1,250`); others get two (`$99.50`).
/// Thousands are grouped with commas.
#[must_use]
pub fn format_price(value: f64, symbol: &str) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let rounded = (abs * 100.0).round() / 100.0;

    let (whole, cents) = if rounded.fract() == 0.0 {
        (rounded, None)
    } else {
        (rounded.trunc(), Some(((rounded.fract() * 100.0).round() as u64).min(99)))
    };

    let grouped = group_thousands(&format!("{whole:.0}"));
    match cents {
        Some(c) => format!("{sign}{symbol}{grouped}.{c:02}"),
        None => format!("{sign}{symbol}{grouped}"),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_amounts() {
        assert_eq!(format_price(250.0, "$"), "$250");
        assert_eq!(format_price(1250.0, "$"), "$1,250");
        assert_eq!(format_price(1_234_567.0, "€"), "€1,234,567");
        assert_eq!(format_price(0.0, "$"), "$0");
    }

    #[test]
    fn test_fractional_amounts() {
        assert_eq!(format_price(99.5, "$"), "$99.50");
        assert_eq!(format_price(1000.25, "£"), "£1,000.25");
        assert_eq!(format_price(10.999, "$"), "$11");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_price(-42.0, "$"), "-$42");
    }
}

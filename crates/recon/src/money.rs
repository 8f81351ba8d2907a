//! Minor-unit (cents) arithmetic.
//!
//! All grouping and differencing happens on `i64` cents. Conversion to a
//! two-digit [`Decimal`] happens once, at the very end.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest magnitude accepted for a single amount, in cents.
///
/// Keeps sums and differences of many amounts well inside `i64`.
pub const MAX_CENTS: i64 = 1_000_000_000_000_000;

/// `round(amount * 100)` with ties to even, the rounding mode of the payroll
/// exports' original tooling. Non-finite amounts and amounts beyond
/// [`MAX_CENTS`] become 0.
pub fn amount_to_cents(amount: f64) -> i64 {
    let scaled = amount * 100.0;
    if !scaled.is_finite() || scaled.abs() > MAX_CENTS as f64 {
        log::warn!("amount {amount} is out of range; counted as 0");
        return 0;
    }
    scaled.round_ties_even() as i64
}

/// Exact conversion from cents to a decimal with scale 2.
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// `round(a * 100)` with ties to even. Saturates on overflow.
pub fn decimal_to_cents(amount: Decimal) -> i64 {
    let scaled = (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    scaled
        .to_i64()
        .unwrap_or(if scaled.is_sign_negative() { i64::MIN } else { i64::MAX })
}

/// Parse an amount stored as text:
/// - Strip `R$`, `$` and whitespace
/// - Handle `(123,45)` → `-123.45`
/// - Accept `1,234.56` and the Brazilian `1.234,56` / `1234,56` / `1.234.567`
/// - Returns None if non-numeric characters remain after stripping
pub fn parse_amount(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (is_negative, inner) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };

    let cleaned: String = inner
        .replace("R$", "")
        .chars()
        .filter(|c| *c != '$' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    for (i, c) in cleaned.chars().enumerate() {
        match c {
            '0'..='9' | '.' | ',' => {}
            '-' | '+' if i == 0 && !is_negative => {}
            _ => return None,
        }
    }

    // Whichever separator comes last is the decimal separator.
    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => {
            if cleaned.matches(',').count() == 1 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    let value: f64 = normalized.parse().ok()?;
    Some(if is_negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cents_from_amount() {
        assert_eq!(amount_to_cents(1234.56), 123456);
        assert_eq!(amount_to_cents(-0.01), -1);
        assert_eq!(amount_to_cents(0.0), 0);
        assert_eq!(amount_to_cents(f64::NAN), 0);
        assert_eq!(amount_to_cents(f64::INFINITY), 0);
    }

    #[test]
    fn huge_amounts_become_zero() {
        assert_eq!(amount_to_cents(-1e300), 0);
        assert_eq!(amount_to_cents(1e300), 0);
        assert_eq!(amount_to_cents(1e13), MAX_CENTS);
        assert_eq!(amount_to_cents(1e13 + 1.0), 0);
    }

    #[test]
    fn half_cent_rounds_to_even() {
        assert_eq!(amount_to_cents(0.125), 12);
        assert_eq!(amount_to_cents(0.375), 38);
    }

    #[test]
    fn decimal_has_two_fraction_digits() {
        let d = cents_to_decimal(3456);
        assert_eq!(d.to_string(), "34.56");
        assert_eq!(d.scale(), 2);
        assert_eq!(cents_to_decimal(-120000).to_string(), "-1200.00");
    }

    #[test]
    fn decimal_cents_round_trip() {
        for s in ["0", "0.5", "1234.56", "-30.01", "999999.99"] {
            let a = Decimal::from_str(s).unwrap();
            assert_eq!(cents_to_decimal(decimal_to_cents(a)), a, "{s}");
        }
    }

    #[test]
    fn parse_plain_and_grouped() {
        assert_eq!(parse_amount("1234.56"), Some(1234.56));
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("-12"), Some(-12.0));
    }

    #[test]
    fn parse_brazilian_format() {
        assert_eq!(parse_amount("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("1234,5"), Some(1234.5));
        assert_eq!(parse_amount("(10,00)"), Some(-10.0));
        assert_eq!(parse_amount("1.234.567"), Some(1234567.0));
        assert_eq!(parse_amount("R$ 1.234.567,00"), Some(1234567.0));
    }

    #[test]
    fn parse_rejects_text() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("R$"), None);
        assert_eq!(parse_amount("Salário"), None);
        assert_eq!(parse_amount("12a"), None);
    }
}

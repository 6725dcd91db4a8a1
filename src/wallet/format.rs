//! Display helpers for the UI layer. Pure functions, no state.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CoreError, Result};

/// Nanotons per ton.
pub const NANO_SCALE: u32 = 9;
const MAX_FRACTION_DIGITS: u32 = 4;

/// Format a nanoton amount as tons: up to 4 fraction digits, no trailing
/// zeros, comma thousands separators ("1,234.5678").
pub fn format_ton_value(nanotons: &str) -> Result<String> {
    let raw: i128 = nanotons
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidState(format!("Invalid nanoton amount: {}", nanotons)))?;
    let value = Decimal::try_from_i128_with_scale(raw, NANO_SCALE)
        .map_err(|e| CoreError::InvalidState(format!("Amount out of range: {}", e)))?;

    let rounded = value
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        return Ok("0".to_string());
    }

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    Ok(out)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `EQAb....xyz1`: first four and last four characters.
pub fn to_short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}....{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ton_value() {
        assert_eq!(format_ton_value("0").unwrap(), "0");
        assert_eq!(format_ton_value("1000000000").unwrap(), "1");
        assert_eq!(format_ton_value("1500000000").unwrap(), "1.5");
        assert_eq!(format_ton_value("123456789").unwrap(), "0.1235");
        assert_eq!(format_ton_value("1234567890000").unwrap(), "1,234.5679");
        assert_eq!(format_ton_value("1000000000000000").unwrap(), "1,000,000");
        assert_eq!(format_ton_value("-2500000000").unwrap(), "-2.5");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        assert_eq!(format_ton_value("50000").unwrap(), "0.0001");
        assert_eq!(format_ton_value("49999").unwrap(), "0");
        assert_eq!(format_ton_value("999950000").unwrap(), "1");
    }

    #[test]
    fn test_format_rejects_garbage() {
        assert!(format_ton_value("1.5").is_err());
        assert!(format_ton_value("ten").is_err());
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            to_short_address("EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N"),
            "EQCD....qB2N"
        );
        assert_eq!(to_short_address("EQCD"), "EQCD");
    }
}

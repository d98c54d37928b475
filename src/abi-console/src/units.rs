//! Conversion between human-decimal text and integer minor units.
//!
//! Both directions work on digit strings so any scale factor is accepted, even one whose
//! power of ten exceeds 256 bits.

use alloy_primitives::U256;

/// Why a decimal numeral was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsError {
    Malformed,
    TooManyDecimals,
    Overflow,
}

/// Scale an unsigned decimal numeral (eg `1.5`) up by `10^decimals`.
///
/// Trailing zeros in the fractional part are ignored before the length check, so `1.50`
/// at 1 decimal is accepted.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, UnitsError> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitsError::Malformed);
    }
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(UnitsError::Malformed);
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals);
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    for _ in fraction.len()..decimals as usize {
        digits.push('0');
    }

    parse_digits(&digits)
}

/// Render minor units as a human-decimal string.
///
/// Trailing fractional zeros are trimmed and a zero fraction is omitted entirely, so this
/// is the left inverse of [`parse_units`] for canonical input.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Parse a run of ASCII decimal digits (empty reads as zero).
pub(crate) fn parse_digits(digits: &str) -> Result<U256, UnitsError> {
    if !all_digits(digits) {
        return Err(UnitsError::Malformed);
    }
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    // Only digits are left, so the radix parse can only fail on overflow.
    U256::from_str_radix(digits, 10).map_err(|_| UnitsError::Overflow)
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

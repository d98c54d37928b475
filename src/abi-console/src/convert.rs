//! Text-to-argument conversion for rendered input slots.

use abi_console_types::TypedValue;
use alloy_primitives::{Sign, I256, U256};
use tracing::debug;

use crate::{
    constants::{AMOUNT_HINTS, DEFAULT_SCALE_FACTOR},
    errors::ConversionError,
    units::{parse_digits, parse_units, UnitsError},
};

/// Converts raw input text into typed arguments under the session's scale factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeConverter {
    scale: u8,
}

impl Default for TypeConverter {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE_FACTOR)
    }
}

impl TypeConverter {
    pub fn new(scale: u8) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Convert `raw` for a parameter declared as `declared`.
    ///
    /// - integer types (`uintN`/`intN`): human-decimal scaled by the scale factor when
    ///   `name_hint` mentions an amount or value, otherwise a plain integer parse
    /// - `bool`: `true` (any case) is true, everything else is false
    /// - `address`: lower-cased, not validated
    /// - anything else passes through untouched
    pub fn convert(
        &self,
        raw: &str,
        declared: &str,
        name_hint: &str,
    ) -> Result<TypedValue, ConversionError> {
        if declared.contains("int") {
            let value = if is_amount_hint(name_hint) {
                self.convert_amount(raw, declared)?
            } else {
                convert_integer(raw, declared)?
            };
            debug!(declared, name_hint, %value, "converted integer argument");
            return Ok(value);
        }

        match declared {
            "bool" => Ok(TypedValue::Bool(raw.eq_ignore_ascii_case("true"))),
            "address" => Ok(TypedValue::Address(raw.to_lowercase())),
            _ => Ok(TypedValue::Text(raw.to_string())),
        }
    }

    fn convert_amount(&self, raw: &str, declared: &str) -> Result<TypedValue, ConversionError> {
        let text = raw.trim();
        let (negative, magnitude) = split_sign(text);
        let scaled = parse_units(magnitude, self.scale).map_err(|err| match err {
            UnitsError::TooManyDecimals => ConversionError::TooManyDecimals {
                text: raw.to_string(),
                decimals: self.scale,
            },
            UnitsError::Overflow => overflow(declared, raw),
            UnitsError::Malformed => invalid(declared, raw),
        })?;
        signed_or_unsigned(declared, raw, negative, scaled)
    }
}

fn is_amount_hint(name_hint: &str) -> bool {
    let lowered = name_hint.to_lowercase();
    AMOUNT_HINTS.iter().any(|hint| lowered.contains(hint))
}

/// Plain integer parse: decimal, or `0x`-prefixed hex.
fn convert_integer(raw: &str, declared: &str) -> Result<TypedValue, ConversionError> {
    let text = raw.trim();
    let (negative, magnitude) = split_sign(text);

    let value = match magnitude
        .strip_prefix("0x")
        .or_else(|| magnitude.strip_prefix("0X"))
    {
        Some(hex) => {
            if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid(declared, raw));
            }
            U256::from_str_radix(hex, 16).map_err(|_| overflow(declared, raw))?
        }
        None => {
            if magnitude.is_empty() {
                return Err(invalid(declared, raw));
            }
            parse_digits(magnitude).map_err(|err| match err {
                UnitsError::Overflow => overflow(declared, raw),
                _ => invalid(declared, raw),
            })?
        }
    };

    signed_or_unsigned(declared, raw, negative, value)
}

fn signed_or_unsigned(
    declared: &str,
    raw: &str,
    negative: bool,
    magnitude: U256,
) -> Result<TypedValue, ConversionError> {
    if declared.starts_with("uint") {
        if negative && !magnitude.is_zero() {
            return Err(ConversionError::Negative {
                kind: declared.to_string(),
                text: raw.to_string(),
            });
        }
        return Ok(TypedValue::Uint(magnitude));
    }

    let sign = if negative { Sign::Negative } else { Sign::Positive };
    I256::checked_from_sign_and_abs(sign, magnitude)
        .map(TypedValue::Int)
        .ok_or_else(|| overflow(declared, raw))
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    }
}

fn invalid(declared: &str, raw: &str) -> ConversionError {
    ConversionError::InvalidNumber {
        kind: declared.to_string(),
        text: raw.to_string(),
    }
}

fn overflow(declared: &str, raw: &str) -> ConversionError {
    ConversionError::Overflow {
        kind: declared.to_string(),
        text: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv() -> TypeConverter {
        TypeConverter::default()
    }

    #[test]
    fn test_plain_integer_is_identity_parse() {
        for text in ["0", "1", "42", "1000000000000000000000", "115792089237316195423570985008687907853269984665640564039457584007913129639935"] {
            let value = conv().convert(text, "uint256", "tokenId").unwrap();
            assert_eq!(value.to_string(), text);
        }
        assert_eq!(
            conv().convert("0xff", "uint8", "").unwrap(),
            TypedValue::Uint(U256::from(255u64))
        );
    }

    #[test]
    fn test_signed_integer() {
        let value = conv().convert("-12", "int256", "delta").unwrap();
        let expected = I256::checked_from_sign_and_abs(Sign::Negative, U256::from(12u64)).unwrap();
        assert_eq!(value, TypedValue::Int(expected));
    }

    #[test]
    fn test_integer_rejects_garbage() {
        assert!(matches!(
            conv().convert("abc", "uint256", "id"),
            Err(ConversionError::InvalidNumber { .. })
        ));
        assert!(matches!(
            conv().convert("", "uint256", "id"),
            Err(ConversionError::InvalidNumber { .. })
        ));
        assert!(matches!(
            conv().convert("-1", "uint256", "id"),
            Err(ConversionError::Negative { .. })
        ));
        let too_big = "9".repeat(90);
        assert!(matches!(
            conv().convert(&too_big, "uint256", "id"),
            Err(ConversionError::Overflow { .. })
        ));
    }

    #[test]
    fn test_amount_hint_scales() {
        let scaled = conv().convert("1.5", "uint256", "amount").unwrap();
        assert_eq!(scaled, TypedValue::Uint(U256::from(1_500_000_000_000_000_000u128)));

        // Hint match is case-insensitive and substring based.
        let scaled = TypeConverter::new(6).convert("2", "uint256", "maxValue").unwrap();
        assert_eq!(scaled, TypedValue::Uint(U256::from(2_000_000u64)));
        let scaled = TypeConverter::new(2).convert("0.01", "uint96", "AMOUNT_IN").unwrap();
        assert_eq!(scaled, TypedValue::Uint(U256::from(1u64)));
    }

    #[test]
    fn test_amount_rejects_excess_fraction() {
        let err = TypeConverter::new(2).convert("1.005", "uint256", "amount").unwrap_err();
        assert_eq!(
            err,
            ConversionError::TooManyDecimals {
                text: "1.005".into(),
                decimals: 2
            }
        );
        assert!(conv().convert("one", "uint256", "amount").is_err());
    }

    #[test]
    fn test_bool_is_permissive() {
        assert_eq!(conv().convert("TrUe", "bool", "").unwrap(), TypedValue::Bool(true));
        for text in ["", "false", "1", "yes", " true"] {
            assert_eq!(conv().convert(text, "bool", "").unwrap(), TypedValue::Bool(false));
        }
    }

    #[test]
    fn test_address_lowercased_without_validation() {
        assert_eq!(
            conv().convert("0xAbC", "address", "to").unwrap(),
            TypedValue::Address("0xabc".into())
        );
    }

    #[test]
    fn test_other_types_pass_through() {
        assert_eq!(
            conv().convert("Hello", "string", "value").unwrap(),
            TypedValue::Text("Hello".into())
        );
        assert_eq!(
            conv().convert("0xDEAD", "bytes", "").unwrap(),
            TypedValue::Text("0xDEAD".into())
        );
    }
}

use core::fmt;

use alloy_primitives::{Address, I256, U256};

/// Argument value produced from user text, ready to hand to a contract capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedValue {
    Uint(U256),
    Int(I256),
    Bool(bool),
    /// Lower-cased address text; validity is left to the capability.
    Address(String),
    /// Raw text for every other declared type (strings, hex bytes, arrays, tuples).
    Text(String),
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Uint(v) => write!(f, "{v}"),
            TypedValue::Int(v) => write!(f, "{v}"),
            TypedValue::Bool(v) => write!(f, "{v}"),
            TypedValue::Address(v) | TypedValue::Text(v) => f.write_str(v),
        }
    }
}

/// Decoded result of a read call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReturnValue {
    Uint(U256),
    Int(I256),
    Bool(bool),
    Address(Address),
    Bytes(Vec<u8>),
    Text(String),
    List(Vec<ReturnValue>),
    /// Named members of a struct return, in declaration order.
    Record(Vec<(String, ReturnValue)>),
}

impl ReturnValue {
    /// Big-integer-like values are the ones rendered through the scale factor.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ReturnValue::Uint(_) | ReturnValue::Int(_))
    }
}

/// Natural string form (no scaling).
impl fmt::Display for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnValue::Uint(v) => write!(f, "{v}"),
            ReturnValue::Int(v) => write!(f, "{v}"),
            ReturnValue::Bool(v) => write!(f, "{v}"),
            ReturnValue::Address(v) => f.write_str(&v.to_checksum(None)),
            ReturnValue::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            ReturnValue::Text(v) => f.write_str(v),
            ReturnValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            ReturnValue::Record(fields) => {
                for (i, (_, item)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_string_forms() {
        assert_eq!(ReturnValue::Bool(true).to_string(), "true");
        assert_eq!(ReturnValue::Bytes(vec![0xde, 0xad]).to_string(), "0xdead");
        let nested = ReturnValue::List(vec![
            ReturnValue::Uint(U256::from(1u64)),
            ReturnValue::Text("two".into()),
        ]);
        assert_eq!(nested.to_string(), "1,two");
        assert!(ReturnValue::Int(I256::ZERO).is_numeric());
        assert!(!ReturnValue::Bool(false).is_numeric());
    }
}

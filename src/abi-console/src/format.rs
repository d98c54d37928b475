//! Human-readable rendering of read-call results.

use abi_console_types::ReturnValue;
use alloy_primitives::{Sign, I256, U256};
use serde_json::{Map, Value};

use crate::{constants::DEFAULT_SCALE_FACTOR, units::format_units};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultFormatter {
    scale: u8,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE_FACTOR)
    }
}

impl ResultFormatter {
    pub fn new(scale: u8) -> Self {
        Self { scale }
    }

    /// Render a call result for the output region. Never fails.
    ///
    /// Lists become a 2-space indented JSON array of per-element strings, records a JSON
    /// object with every nested numeric rewritten as a scaled decimal string. A top-level
    /// numeric is scaled; any other scalar uses its natural form.
    pub fn format(&self, value: &ReturnValue) -> String {
        match value {
            ReturnValue::List(items) => {
                let rendered: Vec<Value> = items
                    .iter()
                    .map(|item| Value::String(self.element(item)))
                    .collect();
                pretty(&Value::Array(rendered), value)
            }
            ReturnValue::Uint(v) => self.scaled_uint(*v),
            ReturnValue::Int(v) => self.scaled_int(*v),
            ReturnValue::Record(_) => pretty(&self.to_json(value), value),
            other => other.to_string(),
        }
    }

    fn element(&self, value: &ReturnValue) -> String {
        match value {
            ReturnValue::Uint(v) => self.scaled_uint(*v),
            ReturnValue::Int(v) => self.scaled_int(*v),
            other => other.to_string(),
        }
    }

    fn to_json(&self, value: &ReturnValue) -> Value {
        match value {
            ReturnValue::Uint(v) => Value::String(self.scaled_uint(*v)),
            ReturnValue::Int(v) => Value::String(self.scaled_int(*v)),
            ReturnValue::Bool(v) => Value::Bool(*v),
            ReturnValue::List(items) => {
                Value::Array(items.iter().map(|item| self.to_json(item)).collect())
            }
            ReturnValue::Record(fields) => {
                let mut map = Map::new();
                for (name, field) in fields {
                    map.insert(name.clone(), self.to_json(field));
                }
                Value::Object(map)
            }
            other => Value::String(other.to_string()),
        }
    }

    fn scaled_uint(&self, v: U256) -> String {
        format_units(v, self.scale)
    }

    fn scaled_int(&self, v: I256) -> String {
        let (sign, abs) = v.into_sign_and_abs();
        let magnitude = format_units(abs, self.scale);
        match sign {
            Sign::Negative => format!("-{magnitude}"),
            Sign::Positive => magnitude,
        }
    }
}

/// Fee estimates are shown in raw gas units, independent of the token scale.
pub fn format_fee(fee: U256) -> String {
    fee.to_string()
}

fn pretty(json: &Value, fallback: &ReturnValue) -> String {
    serde_json::to_string_pretty(json).unwrap_or_else(|_| fallback.to_string())
}

//! Coercion of loosely typed request fields into typed calculator inputs.
//!
//! Requests arrive as flat JSON objects whose values may be numbers or
//! numeric strings (HTML forms submit everything as text). Each calculator
//! reads its fields through a [`FieldReader`] exactly once and works on a
//! typed request from then on.

use serde_json::Value;

use crate::error::{CalcError, Result};

/// Raw request record: field name to JSON value
pub type Fields = serde_json::Map<String, Value>;

/// Typed, validated view over a [`Fields`] record
pub struct FieldReader<'a> {
    fields: &'a Fields,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a Fields) -> Self {
        Self { fields }
    }

    /// Missing and `null` fields both take the default.
    fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    /// Read a real-valued field
    ///
    /// Accepts JSON numbers and numeric strings (surrounding whitespace allowed).
    pub fn float(&self, name: &'static str, default: f64) -> Result<f64> {
        let Some(value) = self.lookup(name) else {
            return Ok(default);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(CalcError::invalid_input(name, "a number", value)),
        }
    }

    /// Read an integer field
    ///
    /// JSON numbers with a fractional part are truncated toward zero; strings
    /// must spell an integer exactly.
    pub fn integer(&self, name: &'static str, default: i64) -> Result<i64> {
        let Some(value) = self.lookup(name) else {
            return Ok(default);
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_to_i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| CalcError::invalid_input(name, "an integer", value))
    }
}

fn truncate_to_i64(v: f64) -> Option<i64> {
    let t = v.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

//! Scalar cell values and rows.
//!
//! Source rows arrive as loosely typed scalars. [`Value`] makes that explicit
//! so every coercion the transforms and the join engine perform is an
//! exhaustive match rather than an implicit conversion.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell value.
///
/// Serializes as a plain JSON scalar (`null`, `true`, `1.5`, `"text"`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// One parsed record, keyed by column name.
pub type Row = BTreeMap<String, Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for `Null` and for strings containing only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Numeric coercion with the semantics of JavaScript's `Number()`.
    ///
    /// `Null` and blank strings become `0`, booleans `0`/`1`, and any string
    /// that is not a plain decimal literal becomes `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) => parse_number_literal(s),
        }
    }

    /// Returns a finite number when the value is numeric or a string that
    /// parses cleanly as one. Blank strings are not numbers here.
    pub fn as_finite_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::String(s) if !s.trim().is_empty() => {
                let n = parse_number_literal(s);
                n.is_finite().then_some(n)
            }
            _ => None,
        }
    }

    /// String coercion with the semantics of JavaScript's `String()`,
    /// except that `Null` renders as the empty string.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
        }
    }

    /// Strict (`===`) equality: same variant and same value. `NaN` is never
    /// equal to anything, `Null` equals `Null`.
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }

    /// A totally ordered, hashable key for grouping and distinct counting.
    pub fn key(&self) -> ValueKey {
        match self {
            Self::Null => ValueKey::Null,
            Self::Bool(b) => ValueKey::Bool(*b),
            Self::Number(n) => {
                let normalized = if *n == 0.0 {
                    0.0
                } else if n.is_nan() {
                    f64::NAN
                } else {
                    *n
                };
                ValueKey::Number(normalized.to_bits())
            }
            Self::String(s) => ValueKey::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Hashable projection of a [`Value`]; numbers are keyed by their bit
/// pattern with `-0` folded into `0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Number(u64),
    String(String),
}

/// Key for a whole row: every `(column, value)` pair in column order.
pub fn row_key(row: &Row) -> Vec<(String, ValueKey)> {
    row.iter()
        .map(|(column, value)| (column.clone(), value.key()))
        .collect()
}

fn parse_number_literal(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust accepts "inf"/"nan" spellings that Number() rejects.
    let literal = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !literal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_coercion_follows_js_rules() {
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
        assert_eq!(Value::from("  42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert_eq!(Value::from("1e3").to_number(), 1000.0);
        assert!(Value::from("12px").to_number().is_nan());
        assert!(Value::from("nan").to_number().is_nan());
        assert!(Value::from("inf").to_number().is_nan());
        assert_eq!(Value::from("-Infinity").to_number(), f64::NEG_INFINITY);
    }

    #[test]
    fn display_string_renders_integers_without_fraction() {
        assert_eq!(Value::Number(3.0).to_display_string(), "3");
        assert_eq!(Value::Number(-0.0).to_display_string(), "0");
        assert_eq!(Value::Number(2.25).to_display_string(), "2.25");
        assert_eq!(Value::Number(f64::NAN).to_display_string(), "NaN");
        assert_eq!(Value::Null.to_display_string(), "");
        assert_eq!(Value::Bool(false).to_display_string(), "false");
    }

    #[test]
    fn strict_equality_distinguishes_types() {
        assert!(Value::Number(1.0).strict_eq(&Value::Number(1.0)));
        assert!(!Value::Number(1.0).strict_eq(&Value::from("1")));
        assert!(!Value::Number(f64::NAN).strict_eq(&Value::Number(f64::NAN)));
        assert!(Value::Null.strict_eq(&Value::Null));
    }

    #[test]
    fn keys_fold_negative_zero() {
        assert_eq!(Value::Number(-0.0).key(), Value::Number(0.0).key());
        assert_ne!(Value::Number(1.0).key(), Value::from("1").key());
    }

    #[test]
    fn serializes_as_plain_scalars() {
        let row: Row = [
            ("a".to_string(), Value::Null),
            ("b".to_string(), Value::Bool(true)),
            ("c".to_string(), Value::Number(1.5)),
            ("d".to_string(), Value::from("x")),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"a":null,"b":true,"c":1.5,"d":"x"}"#);
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}

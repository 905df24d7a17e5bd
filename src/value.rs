//! The JSON value tree.
//!
//! [`Value`] is a closed sum type with exactly one active case. Objects are
//! backed by a `BTreeMap`, so key iteration (and therefore rendering) is
//! always in ascending key order regardless of how the source text ordered
//! its pairs. Every node owns its children outright; `Clone` is a deep copy.

use std::collections::BTreeMap;

use crate::error::TypeError;

/// The keyword case family: `true`, `false`, and `null`.
///
/// The booleans and null share one case in [`Value`] but are distinct
/// values; the boolean accessor refuses `Null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Literal {
    /// The `false` keyword.
    False,
    /// The `true` keyword.
    True,
    /// The `null` keyword.
    #[default]
    Null,
}

/// A parsed or programmatically built value.
///
/// Accessors return the held payload and fail with [`TypeError`] when the
/// active case does not match; the `is_*` predicates never fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A double-precision float.
    Float(f64),
    /// Text with escapes already resolved.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A mapping with unique keys, iterated in ascending key order.
    Object(BTreeMap<String, Value>),
    /// One of `true`, `false`, `null`.
    Literal(Literal),
}

impl Default for Value {
    fn default() -> Self {
        Value::NULL
    }
}

impl Value {
    /// The `null` literal.
    pub const NULL: Value = Value::Literal(Literal::Null);
    /// The `true` literal.
    pub const TRUE: Value = Value::Literal(Literal::True);
    /// The `false` literal.
    pub const FALSE: Value = Value::Literal(Literal::False);

    /// Build an integer value.
    pub fn int(i: i64) -> Value {
        Value::Int(i)
    }

    /// Build a float value.
    pub fn float(f: f64) -> Value {
        Value::Float(f)
    }

    /// Build a string value.
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    /// Build a boolean literal.
    pub fn boolean(b: bool) -> Value {
        if b {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    /// Build an array from a sequence of values.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Value {
        Value::Array(items.into_iter().collect())
    }

    /// Build an object from key/value pairs.
    ///
    /// A repeated key keeps its first value, matching what the parser does
    /// with duplicate keys in source text.
    pub fn object(entries: impl IntoIterator<Item = (String, Value)>) -> Value {
        let mut map = BTreeMap::new();
        for (key, value) in entries {
            map.entry(key).or_insert(value);
        }
        Value::Object(map)
    }

    /// Case name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Literal(Literal::Null) => "null",
            Value::Literal(_) => "boolean",
        }
    }

    fn mismatch(&self, expected: &'static str) -> TypeError {
        TypeError {
            expected,
            actual: self.kind(),
        }
    }

    /// Returns the integer if this is an `Int`.
    pub fn as_int(&self) -> Result<i64, TypeError> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(other.mismatch("integer")),
        }
    }

    /// Mutable access to the held integer.
    pub fn as_int_mut(&mut self) -> Result<&mut i64, TypeError> {
        match self {
            Value::Int(i) => Ok(i),
            other => Err(other.mismatch("integer")),
        }
    }

    /// Returns the float if this is a `Float`.
    pub fn as_float(&self) -> Result<f64, TypeError> {
        match self {
            Value::Float(f) => Ok(*f),
            other => Err(other.mismatch("float")),
        }
    }

    /// Mutable access to the held float.
    pub fn as_float_mut(&mut self) -> Result<&mut f64, TypeError> {
        match self {
            Value::Float(f) => Ok(f),
            other => Err(other.mismatch("float")),
        }
    }

    /// Returns the string slice if this is a `String`.
    pub fn as_str(&self) -> Result<&str, TypeError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    /// Mutable access to the held string.
    pub fn as_string_mut(&mut self) -> Result<&mut String, TypeError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    /// Returns the elements if this is an `Array`.
    pub fn as_array(&self) -> Result<&[Value], TypeError> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(other.mismatch("array")),
        }
    }

    /// Mutable access to the held array.
    pub fn as_array_mut(&mut self) -> Result<&mut Vec<Value>, TypeError> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(other.mismatch("array")),
        }
    }

    /// Returns the mapping if this is an `Object`.
    pub fn as_object(&self) -> Result<&BTreeMap<String, Value>, TypeError> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(other.mismatch("object")),
        }
    }

    /// Mutable access to the held mapping.
    pub fn as_object_mut(&mut self) -> Result<&mut BTreeMap<String, Value>, TypeError> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(other.mismatch("object")),
        }
    }

    /// Returns the literal if this is one of `true`, `false`, `null`.
    pub fn as_literal(&self) -> Result<Literal, TypeError> {
        match self {
            Value::Literal(lit) => Ok(*lit),
            other => Err(other.mismatch("literal")),
        }
    }

    /// Returns the boolean if this is `true` or `false`.
    ///
    /// `null` fails with the same [`TypeError`] family even though the
    /// literal case matched: null is not a boolean.
    pub fn as_bool(&self) -> Result<bool, TypeError> {
        match self {
            Value::Literal(Literal::True) => Ok(true),
            Value::Literal(Literal::False) => Ok(false),
            other => Err(other.mismatch("boolean")),
        }
    }

    /// Returns true if this is an integer.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Returns true if this is a float.
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns true if this is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true if this is any of `true`, `false`, `null`.
    pub fn is_literal(&self) -> bool {
        matches!(self, Value::Literal(_))
    }

    /// Returns true if this is `true` or `false`.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Literal(Literal::True | Literal::False))
    }

    /// Returns true if this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Literal(Literal::Null))
    }

    /// Get a value from an object by key. `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Get a value from an array by index. `None` for non-arrays.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

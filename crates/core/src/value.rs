//! Value types for the document store
//!
//! This module defines:
//! - Value: Unified enum for every field value a document can hold
//!
//! ## Canonical Value Model
//!
//! JSON-like scalars and containers plus three store-native kinds:
//! - Null, Bool, Int, Float, String, Bytes, Array, Map
//! - Timestamp: the store's native timestamp scalar
//! - Reference: a handle to another document
//! - Sentinel: a write-path placeholder, resolved at commit time
//!
//! ### Type Rules
//!
//! - No implicit type coercions
//! - `Int(1) != Float(1.0)` - different types are NEVER equal
//! - `Bytes` are not `String`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use crate::reference::DocumentReference;
use crate::sentinel::FieldValue;
use crate::timestamp::Timestamp;
use std::collections::BTreeMap;

/// Ordered string-keyed map of fields
pub type ValueMap = BTreeMap<String, Value>;

/// Canonical document field value
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Array of values
    Array(Vec<Value>),
    /// Map with string keys
    Map(ValueMap),
    /// Native timestamp
    Timestamp(Timestamp),
    /// Reference to another document
    Reference(DocumentReference),
    /// Write-path placeholder
    Sentinel(FieldValue),
}

// Custom PartialEq implementation for IEEE-754 float semantics
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Reference(a), Value::Reference(b)) => a == b,
            (Value::Sentinel(a), Value::Sentinel(b)) => a == b,
            // Different types are NEVER equal
            _ => false,
        }
    }
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Timestamp(_) => "Timestamp",
            Value::Reference(_) => "Reference",
            Value::Sentinel(_) => "Sentinel",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is a map value
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Check if this is a write-path sentinel
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Value::Sentinel(_))
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &ValueMap if this is a Map value
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get the timestamp if this is a Timestamp value
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Get the reference if this is a Reference value
    pub fn as_reference(&self) -> Option<&DocumentReference> {
        match self {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Look a field up if this is a Map value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(field))
    }

    // =========================================================================
    // Write path
    // =========================================================================

    /// Replace every server timestamp sentinel with `commit_time`
    ///
    /// Walks arrays and maps recursively. Returns the number of sentinels
    /// replaced.
    pub fn resolve_server_timestamps(&mut self, commit_time: Timestamp) -> usize {
        match self {
            Value::Sentinel(FieldValue::ServerTimestamp) => {
                *self = Value::Timestamp(commit_time);
                1
            }
            Value::Array(items) => items
                .iter_mut()
                .map(|v| v.resolve_server_timestamps(commit_time))
                .sum(),
            Value::Map(fields) => fields
                .values_mut()
                .map(|v| v.resolve_server_timestamps(commit_time))
                .sum(),
            _ => 0,
        }
    }

    /// True if any sentinel remains anywhere inside this value
    pub fn contains_sentinel(&self) -> bool {
        match self {
            Value::Sentinel(_) => true,
            Value::Array(items) => items.iter().any(Value::contains_sentinel),
            Value::Map(fields) => fields.values().any(Value::contains_sentinel),
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<ValueMap> for Value {
    fn from(m: ValueMap) -> Self {
        Value::Map(m)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Timestamp(t)
    }
}

impl From<DocumentReference> for Value {
    fn from(r: DocumentReference) -> Self {
        Value::Reference(r)
    }
}

impl From<FieldValue> for Value {
    fn from(s: FieldValue) -> Self {
        Value::Sentinel(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Self {
        o.map(Into::into).unwrap_or(Value::Null)
    }
}

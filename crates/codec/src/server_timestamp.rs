//! Server timestamp field wrapper
//!
//! `ServerTimestamp<V>` marks a record field that, when empty at write time,
//! is filled by the store with its own commit-time clock. An empty field does
//! not mean "no timestamp": it encodes as the [`FieldValue::ServerTimestamp`]
//! placeholder. A set field encodes as the literal timestamp.
//!
//! Unlike [`DocumentId`](crate::DocumentId), this works through any serde
//! format; no codec context is involved.

use chrono::{DateTime, Utc};
use docfield_core::{CodecError, ConversionError, FieldValue, Result, Timestamp, Value};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

/// Types a server timestamp field can hold
pub trait ServerTimestampWrappable: Sized {
    /// Convert from the store's native timestamp
    fn wrap(timestamp: Timestamp) -> std::result::Result<Self, ConversionError>;

    /// Convert into the store's native timestamp
    fn unwrap(value: &Self) -> std::result::Result<Timestamp, ConversionError>;
}

impl ServerTimestampWrappable for Timestamp {
    fn wrap(timestamp: Timestamp) -> std::result::Result<Self, ConversionError> {
        Ok(timestamp)
    }

    fn unwrap(value: &Self) -> std::result::Result<Timestamp, ConversionError> {
        Ok(*value)
    }
}

impl ServerTimestampWrappable for DateTime<Utc> {
    fn wrap(timestamp: Timestamp) -> std::result::Result<Self, ConversionError> {
        DateTime::<Utc>::from_timestamp(timestamp.seconds(), timestamp.nanos() as u32)
            .ok_or_else(|| {
                ConversionError::new(
                    "Timestamp",
                    "DateTime<Utc>",
                    format!("{} is out of range", timestamp),
                )
            })
    }

    fn unwrap(value: &Self) -> std::result::Result<Timestamp, ConversionError> {
        Timestamp::new(value.timestamp(), value.timestamp_subsec_nanos() as i32)
            .map_err(|e| ConversionError::new("DateTime<Utc>", "Timestamp", e.reason))
    }
}

/// Record field written as the store's commit time when empty
///
/// Equality and hashing compare the wrapped value only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerTimestamp<V> {
    value: Option<V>,
}

impl<V> Default for ServerTimestamp<V> {
    fn default() -> Self {
        Self::pending()
    }
}

impl<V> From<Option<V>> for ServerTimestamp<V> {
    fn from(value: Option<V>) -> Self {
        Self::new(value)
    }
}

impl<V> ServerTimestamp<V> {
    /// Create a field; `None` defers to the server clock
    pub const fn new(value: Option<V>) -> Self {
        ServerTimestamp { value }
    }

    /// Empty field, written as the server timestamp placeholder
    pub const fn pending() -> Self {
        ServerTimestamp { value: None }
    }

    /// The wrapped value, if set
    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Replace the wrapped value
    pub fn set(&mut self, value: Option<V>) {
        self.value = value;
    }

    /// True if the next write will use the server clock
    pub fn is_pending(&self) -> bool {
        self.value.is_none()
    }

    /// Take the value out, leaving the field pending
    pub fn take(&mut self) -> Option<V> {
        self.value.take()
    }

    /// Consume the field, returning the value
    pub fn into_inner(self) -> Option<V> {
        self.value
    }
}

impl<V: ServerTimestampWrappable> ServerTimestamp<V> {
    /// Decode from a stored value
    ///
    /// Null and an unresolved placeholder both read as pending.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` for any non-timestamp value, `Conversion` carrying
    /// `V::wrap`'s own error if that fails.
    pub fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Null | Value::Sentinel(FieldValue::ServerTimestamp) => Ok(Self::pending()),
            Value::Timestamp(ts) => Ok(Self::new(Some(V::wrap(*ts)?))),
            other => Err(CodecError::type_mismatch("Timestamp", other.type_name())),
        }
    }

    /// Encode to a stored value
    ///
    /// # Errors
    ///
    /// `Conversion` carrying `V::unwrap`'s own error if that fails.
    pub fn encode(&self) -> Result<Value> {
        match &self.value {
            Some(v) => Ok(Value::Timestamp(V::unwrap(v)?)),
            None => Ok(Value::Sentinel(FieldValue::ServerTimestamp)),
        }
    }
}

impl<V: ServerTimestampWrappable> Serialize for ServerTimestamp<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.value {
            Some(v) => V::unwrap(v)
                .map_err(<S::Error as ser::Error>::custom)?
                .serialize(serializer),
            None => FieldValue::ServerTimestamp.serialize(serializer),
        }
    }
}

impl<'de, V: ServerTimestampWrappable> Deserialize<'de> for ServerTimestamp<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Option::<Timestamp>::deserialize(deserializer)? {
            Some(ts) => V::wrap(ts)
                .map(|v| Self::new(Some(v)))
                .map_err(de::Error::custom),
            None => Ok(Self::pending()),
        }
    }
}

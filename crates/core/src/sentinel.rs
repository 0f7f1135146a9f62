//! Write-path sentinels
//!
//! A sentinel is a value that only the store's write path understands. It is
//! never persisted as-is: at commit time the store swaps it for a concrete
//! value.

use crate::markers;
use serde::{Serialize, Serializer};
use std::fmt;

/// Wire tag for the server timestamp placeholder
pub const SERVER_TIMESTAMP_TAG: &str = "REQUEST_TIME";

/// Placeholder values resolved by the store at commit time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// Substitute the commit-time clock value
    ServerTimestamp,
}

impl FieldValue {
    /// The server timestamp placeholder
    pub const fn server_timestamp() -> Self {
        FieldValue::ServerTimestamp
    }

    /// Wire tag carried in the serialized form
    pub const fn tag(&self) -> &'static str {
        match self {
            FieldValue::ServerTimestamp => SERVER_TIMESTAMP_TAG,
        }
    }

    /// Look a sentinel up by its wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            SERVER_TIMESTAMP_TAG => Some(FieldValue::ServerTimestamp),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::ServerTimestamp => f.write_str("FieldValue.serverTimestamp()"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::ServerTimestamp => {
                serializer.serialize_newtype_struct(markers::SERVER_TIMESTAMP, self.tag())
            }
        }
    }
}

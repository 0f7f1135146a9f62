//! Reserved serde newtype names
//!
//! Store-native types serialize through `serialize_newtype_struct` /
//! `deserialize_newtype_struct` under one of these names. The store-aware
//! encoder and decoder match on them; every other serde format sees an
//! ordinary newtype and treats it transparently.

/// Native timestamp, wraps `{ seconds, nanos }`
pub const TIMESTAMP: &str = "$__docfield_private_Timestamp";

/// Reference object, wraps the path string
pub const REFERENCE: &str = "$__docfield_private_DocumentReference";

/// Server timestamp placeholder, wraps the wire tag
pub const SERVER_TIMESTAMP: &str = "$__docfield_private_ServerTimestamp";

/// Document id field, answered from the codec context
pub const DOCUMENT_ID: &str = "$__docfield_private_DocumentId";


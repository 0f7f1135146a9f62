//! Document id field wrapper
//!
//! `DocumentId<V>` marks a record field that holds the id of the document the
//! record was read from. The id is never part of the stored payload: the
//! store decoder fills it from the [`CodecContext`] reference, and the store
//! encoder leaves it out.
//!
//! ## Usage
//!
//! ```
//! use docfield_codec::{decode_document, DocumentId};
//! use docfield_core::{DocumentReference, Value, ValueMap};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: DocumentId<String>,
//!     name: String,
//! }
//!
//! let reference = DocumentReference::parse("users/abc123").unwrap();
//! let mut fields = ValueMap::new();
//! fields.insert("name".into(), Value::from("Ada"));
//!
//! let user: User = decode_document(&reference, &fields).unwrap();
//! assert_eq!(user.id.get().map(String::as_str), Some("abc123"));
//! ```
//!
//! ## Direct Assignment
//!
//! Setting a non-empty id by hand is allowed but logged as a warning: the
//! value is kept, and replaced by the store on the next read.
//!
//! ## Declaring the Field
//!
//! Declare the field as `DocumentId<V>`, never `Option<DocumentId<V>>`. The
//! wrapper already models absence (a null reference decodes as unset). The
//! id is never stored, so an `Option` around it always sees a missing field
//! and decodes to `None` without asking the context for the reference.

use docfield_core::markers;
use docfield_core::{CodecContext, CodecError, ConversionError, DocumentReference, Result, Value};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::{self, Serialize, Serializer};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;
use tracing::warn;

const ENCODE_UNSUPPORTED: &str = "document ids can only be encoded by the store encoder";
const DECODE_UNSUPPORTED: &str = "document ids can only be decoded by the store decoder";

/// Types a document id field can hold
pub trait DocumentIdWrappable: Sized {
    /// Build the field value from the document's reference
    fn wrap(reference: &DocumentReference) -> std::result::Result<Self, ConversionError>;
}

impl DocumentIdWrappable for String {
    fn wrap(reference: &DocumentReference) -> std::result::Result<Self, ConversionError> {
        Ok(reference.document_id().to_string())
    }
}

impl DocumentIdWrappable for DocumentReference {
    fn wrap(reference: &DocumentReference) -> std::result::Result<Self, ConversionError> {
        Ok(reference.clone())
    }
}

/// Record field holding the id of the document it was read from
///
/// Equality and hashing compare the wrapped value only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId<V> {
    value: Option<V>,
}

impl<V> Default for DocumentId<V> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<V> DocumentId<V> {
    /// Empty id, to be filled in by the store decoder
    pub const fn unset() -> Self {
        DocumentId { value: None }
    }

    /// Create a document id field
    ///
    /// A non-empty value is kept but logged, since the store overwrites it
    /// on the next read. Works for any `V`; the log names the value's type.
    pub fn new(value: Option<V>) -> Self {
        if value.is_some() {
            log_ignored_value::<V>();
        }
        DocumentId { value }
    }

    /// Assign the id, with the same logging as [`DocumentId::new`]
    pub fn set(&mut self, value: Option<V>) {
        if value.is_some() {
            log_ignored_value::<V>();
        }
        self.value = value;
    }

    /// The wrapped id, if set
    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Check whether an id is present
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Take the id out, leaving the field unset
    pub fn take(&mut self) -> Option<V> {
        self.value.take()
    }

    /// Consume the field, returning the id
    pub fn into_inner(self) -> Option<V> {
        self.value
    }

    /// Encode through the generic path
    ///
    /// # Errors
    ///
    /// Always returns `EncodingUnsupported`: a document id has no stored
    /// form, the store assigns it.
    pub fn encode(&self) -> Result<Value> {
        Err(CodecError::encoding_unsupported(ENCODE_UNSUPPORTED))
    }
}

impl<V: DocumentIdWrappable> DocumentId<V> {
    /// Build the field from the document's reference
    ///
    /// `None` yields an unset field. Does not log.
    pub fn from_reference(
        reference: Option<&DocumentReference>,
    ) -> std::result::Result<Self, ConversionError> {
        let value = reference.map(V::wrap).transpose()?;
        Ok(DocumentId { value })
    }

    /// Decode the field from the ambient reference in `context`
    ///
    /// # Errors
    ///
    /// Returns `DecodingUnsupported` if `context` has no reference entry, and
    /// `Conversion` carrying `V::wrap`'s own error if that fails.
    pub fn decode(context: &CodecContext) -> Result<Self> {
        let reference = context.document_reference()?;
        Ok(Self::from_reference(reference)?)
    }
}

fn log_ignored_value<V>() {
    warn!(
        value_type = std::any::type_name::<V>(),
        "Attempting to initialize or set a document id field with a non-empty value; \
         the id is managed by the store and will be replaced when the document is read"
    );
}

// ============================================================================
// Serde
// ============================================================================

/// Inner payload of the document id marker; only the store encoder skips it
struct StoreEncoderOnly;

impl Serialize for StoreEncoderOnly {
    fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Err(ser::Error::custom(CodecError::encoding_unsupported(
            ENCODE_UNSUPPORTED,
        )))
    }
}

impl<V> Serialize for DocumentId<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(markers::DOCUMENT_ID, &StoreEncoderOnly)
    }
}

impl<'de, V: DocumentIdWrappable> Deserialize<'de> for DocumentId<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(markers::DOCUMENT_ID, DocumentIdVisitor(PhantomData))
    }
}

struct DocumentIdVisitor<V>(PhantomData<V>);

impl<'de, V: DocumentIdWrappable> Visitor<'de> for DocumentIdVisitor<V> {
    type Value = DocumentId<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a document id supplied by the store decoder")
    }

    // The store decoder answers with a single-entry map keyed by the marker.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        match map.next_key::<String>()? {
            Some(key) if key == markers::DOCUMENT_ID => {}
            _ => {
                return Err(de::Error::custom(CodecError::decoding_unsupported(
                    DECODE_UNSUPPORTED,
                )))
            }
        }
        let reference: Option<DocumentReference> = map.next_value()?;
        DocumentId::from_reference(reference.as_ref()).map_err(de::Error::custom)
    }

    // Every other format hands the marker's content over as a newtype.
    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        _deserializer: D,
    ) -> std::result::Result<Self::Value, D::Error> {
        Err(de::Error::custom(CodecError::decoding_unsupported(
            DECODE_UNSUPPORTED,
        )))
    }
}

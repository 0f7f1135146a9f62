//! Document reference type
//!
//! A `DocumentReference` is the store-specific handle naming where a record
//! lives: a collection path plus a document key, possibly nested under other
//! documents.
//!
//! ## Path Rules
//!
//! - Segments are separated by `/`
//! - No segment may be empty
//! - The number of segments is even and non-zero
//!   (`collection/doc`, `collection/doc/sub/doc`, ...)
//!
//! ## Usage
//!
//! ```
//! use docfield_core::DocumentReference;
//!
//! let r = DocumentReference::parse("users/abc123/posts/p1").unwrap();
//! assert_eq!(r.document_id(), "p1");
//! assert_eq!(r.collection_id(), "posts");
//! assert_eq!(r.parent_path(), "users/abc123/posts");
//! ```

use crate::markers;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Error when validating a reference path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// Path is empty
    Empty,
    /// A segment between slashes is empty
    EmptySegment {
        /// Zero-based index of the empty segment
        position: usize,
    },
    /// Path names a collection, not a document
    NotADocument {
        /// Number of segments found
        segments: usize,
    },
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::Empty => write!(f, "reference path cannot be empty"),
            ReferenceError::EmptySegment { position } => {
                write!(f, "reference path has an empty segment at position {}", position)
            }
            ReferenceError::NotADocument { segments } => write!(
                f,
                "reference path has {} segments (a document path needs an even number)",
                segments
            ),
        }
    }
}

impl std::error::Error for ReferenceError {}

/// Handle to a stored document
///
/// ## Invariants
///
/// - At least two segments, always an even count
/// - Every segment is non-empty
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentReference {
    segments: Vec<String>,
}

impl DocumentReference {
    /// Parse a slash-separated document path
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError` if the path is empty, has an empty segment,
    /// or has an odd number of segments.
    pub fn parse(path: &str) -> Result<Self, ReferenceError> {
        if path.is_empty() {
            return Err(ReferenceError::Empty);
        }
        let segments: Vec<String> = path.split('/').map(str::to_string).collect();
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(ReferenceError::EmptySegment { position });
        }
        if segments.len() % 2 != 0 {
            return Err(ReferenceError::NotADocument {
                segments: segments.len(),
            });
        }
        Ok(DocumentReference { segments })
    }

    /// Reference to `id` inside a top-level collection
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError` if either part is empty or contains a slash
    /// that produces an invalid path.
    pub fn new(collection: &str, id: &str) -> Result<Self, ReferenceError> {
        Self::parse(&format!("{}/{}", collection, id))
    }

    /// Reference to `id` inside a sub-collection of this document
    ///
    /// # Errors
    ///
    /// Same rules as [`DocumentReference::new`].
    pub fn child(&self, collection: &str, id: &str) -> Result<Self, ReferenceError> {
        Self::parse(&format!("{}/{}/{}", self.path(), collection, id))
    }

    /// The document's key: the last path segment
    pub fn document_id(&self) -> &str {
        // parse() guarantees at least two segments
        &self.segments[self.segments.len() - 1]
    }

    /// Name of the collection holding the document
    pub fn collection_id(&self) -> &str {
        &self.segments[self.segments.len() - 2]
    }

    /// Full collection path holding the document
    pub fn parent_path(&self) -> String {
        self.segments[..self.segments.len() - 1].join("/")
    }

    /// Full slash-separated path
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl std::str::FromStr for DocumentReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentReference::parse(s)
    }
}

// ============================================================================
// Serde
// ============================================================================

impl Serialize for DocumentReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(markers::REFERENCE, &self.path())
    }
}

impl<'de> Deserialize<'de> for DocumentReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(markers::REFERENCE, ReferenceVisitor)
    }
}

struct ReferenceVisitor;

impl<'de> Visitor<'de> for ReferenceVisitor {
    type Value = DocumentReference;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a document path")
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_str(self)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        DocumentReference::parse(v).map_err(E::custom)
    }
}

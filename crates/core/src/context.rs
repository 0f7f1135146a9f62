//! Per-call codec context
//!
//! A `CodecContext` carries information a field needs during decoding that is
//! not part of the stored payload. The decoder borrows it for the duration of
//! one call and never keeps it.

use crate::error::{CodecError, Result};
use crate::reference::DocumentReference;
use crate::value::Value;
use std::collections::BTreeMap;

/// Key under which the originating document reference is stored
pub const DOCUMENT_REFERENCE_KEY: &str = "DocumentRefUserInfoKey";

/// String-keyed side channel passed alongside a decode call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodecContext {
    entries: BTreeMap<String, Value>,
}

impl CodecContext {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for decoding the document at `reference`
    pub fn for_document(reference: DocumentReference) -> Self {
        Self::new().with_reference(Some(reference))
    }

    /// Set the ambient reference
    ///
    /// `None` records an explicitly absent reference (stored as null), which
    /// decodes a document id field as unset rather than failing.
    pub fn with_reference(mut self, reference: Option<DocumentReference>) -> Self {
        self.insert(DOCUMENT_REFERENCE_KEY, Value::from(reference));
        self
    }

    /// Insert an arbitrary entry, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Look up an entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Check whether an entry exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The ambient document reference
    ///
    /// # Errors
    ///
    /// Returns `DecodingUnsupported` if no reference entry is present, or if
    /// the entry holds something other than a reference or null.
    pub fn document_reference(&self) -> Result<Option<&DocumentReference>> {
        match self.entries.get(DOCUMENT_REFERENCE_KEY) {
            Some(Value::Reference(r)) => Ok(Some(r)),
            Some(Value::Null) => Ok(None),
            Some(other) => Err(CodecError::decoding_unsupported(format!(
                "context entry {} holds a {}, not a document reference",
                DOCUMENT_REFERENCE_KEY,
                other.type_name()
            ))),
            None => Err(CodecError::decoding_unsupported(format!(
                "no document reference in context under {}; \
                 document ids can only be decoded by the store decoder",
                DOCUMENT_REFERENCE_KEY
            ))),
        }
    }
}

//! docfield - Store-managed fields for serde records
//!
//! docfield provides two field wrappers for records stored in a document
//! store: `DocumentId<V>`, filled from the document's reference when the
//! record is read, and `ServerTimestamp<V>`, written as the store's commit
//! time when left empty.
//!
//! # Quick Start
//!
//! ```
//! use docfield::{decode_document, encode_document, DocumentId, DocumentReference};
//! use docfield::{ServerTimestamp, Timestamp};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Note {
//!     id: DocumentId<String>,
//!     body: String,
//!     updated: ServerTimestamp<Timestamp>,
//! }
//!
//! let note = Note {
//!     id: DocumentId::unset(),
//!     body: "hi".into(),
//!     updated: ServerTimestamp::pending(),
//! };
//! let fields = encode_document(&note).unwrap();
//!
//! let reference = DocumentReference::parse("notes/n1").unwrap();
//! let read: Note = decode_document(&reference, &fields).unwrap();
//! assert_eq!(read.id.get().map(String::as_str), Some("n1"));
//! assert!(read.updated.is_pending());
//! ```
//!
//! # Architecture
//!
//! Store values, references, timestamps and the decoding context live in
//! `docfield-core`. The serde encoder and decoder, and the field wrappers
//! themselves, live in `docfield-codec`. Both are re-exported here.

pub use docfield_codec::*;
pub use docfield_core::{
    CodecContext, CodecError, ConversionError, DocumentReference, FieldValue, ReferenceError,
    Result, Timestamp, Value, ValueMap, DOCUMENT_REFERENCE_KEY,
};

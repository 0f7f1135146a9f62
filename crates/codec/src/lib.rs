//! Store-aware codec and special field wrappers
//!
//! This crate provides:
//! - `to_value` / `encode_document`: serde encoder into store values
//! - `from_value` / `decode_document`: serde decoder with a per-call context
//! - `DocumentId<V>`: field filled from the document's reference on read,
//!   never written
//! - `ServerTimestamp<V>`: field written as the store's commit time when empty
//! - `CodecOptions`: decoder configuration
//!
//! ## Usage
//!
//! ```
//! use docfield_codec::{decode_document, encode_document, DocumentId, ServerTimestamp};
//! use docfield_core::{DocumentReference, FieldValue, Timestamp, Value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Post {
//!     id: DocumentId<String>,
//!     title: String,
//!     created_at: ServerTimestamp<Timestamp>,
//! }
//!
//! let post = Post {
//!     id: DocumentId::unset(),
//!     title: "hello".into(),
//!     created_at: ServerTimestamp::pending(),
//! };
//!
//! // Write: the id is left out, the empty timestamp becomes a placeholder
//! let mut fields = encode_document(&post).unwrap();
//! assert!(!fields.contains_key("id"));
//! assert_eq!(fields["created_at"], Value::Sentinel(FieldValue::ServerTimestamp));
//!
//! // The store resolves the placeholder at commit
//! let commit = Timestamp::new(1_700_000_000, 0).unwrap();
//! for v in fields.values_mut() {
//!     v.resolve_server_timestamps(commit);
//! }
//!
//! // Read: the id comes from the reference
//! let reference = DocumentReference::parse("posts/p1").unwrap();
//! let read: Post = decode_document(&reference, &fields).unwrap();
//! assert_eq!(read.id.get().map(String::as_str), Some("p1"));
//! assert_eq!(read.created_at.get(), Some(&commit));
//! ```
//!
//! ## Limitations of the Store Decoder
//!
//! A document id is never stored, so struct decoding offers every declared
//! field that is missing from the stored map to its type as an absent entry.
//! This has consequences for record shapes:
//!
//! - `#[serde(default)]` is not honoured for a missing non-`Option` field;
//!   the absent entry reports `missing field`. Use `Option<T>` instead.
//! - A `DocumentId` inside a `#[serde(flatten)]` struct is not reached and
//!   reports `missing field`. Declare it on the outer record.
//! - `Option<DocumentId<V>>` always decodes to `None`. Declare the field as
//!   `DocumentId<V>`.
//! - A failing `wrap` inside a record comes back as `CodecError::Message`
//!   carrying the conversion's text. `DocumentId::decode` and
//!   `ServerTimestamp::decode` return the `CodecError::Conversion` itself.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod de;
pub mod document_id;
pub mod ser;
pub mod server_timestamp;

pub use config::{CodecOptions, ServerTimestampBehavior};
pub use de::{decode_document, from_value, from_value_with_options, Decoder};
pub use document_id::{DocumentId, DocumentIdWrappable};
pub use ser::{encode_document, to_value, Encoder};
pub use server_timestamp::{ServerTimestamp, ServerTimestampWrappable};

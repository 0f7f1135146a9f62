//! Core types for the document field codec
//!
//! This crate defines the store-native data model shared by every codec path:
//! - Value: Unified value enum for document fields
//! - Timestamp: The store's native timestamp scalar
//! - DocumentReference: Handle naming where a document lives
//! - FieldValue: Write-path sentinels (server timestamp placeholder)
//! - CodecContext: Per-call side channel for decoding
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
#[doc(hidden)]
pub mod markers;
pub mod reference;
pub mod sentinel;
pub mod timestamp;
pub mod value;

pub use context::{CodecContext, DOCUMENT_REFERENCE_KEY};
pub use error::{CodecError, ConversionError, Result};
pub use reference::{DocumentReference, ReferenceError};
pub use sentinel::FieldValue;
pub use timestamp::Timestamp;
pub use value::{Value, ValueMap};

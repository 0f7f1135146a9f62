//! Error types for the document field codec
//!
//! This module defines the error types shared by every codec path.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Error Kinds
//!
//! - `DecodingUnsupported` / `EncodingUnsupported`: the caller went through a
//!   codec path that cannot handle the field. Not retriable; the caller must
//!   switch to the store-aware encoder or decoder.
//! - `Conversion`: a field value's own `wrap`/`unwrap` failed. Carried as-is.

use crate::reference::ReferenceError;
use std::fmt;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Failure converting between a field's value type and a store-native scalar
///
/// Returned by `wrap`/`unwrap` implementations. The codec never rewraps it:
/// callers that decode or encode a single field get the same value back
/// inside [`CodecError::Conversion`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {from} to {to}: {reason}")]
pub struct ConversionError {
    /// Source type name
    pub from: &'static str,
    /// Target type name
    pub to: &'static str,
    /// Human-readable reason
    pub reason: String,
}

impl ConversionError {
    /// Create a new conversion error
    pub fn new(from: &'static str, to: &'static str, reason: impl Into<String>) -> Self {
        ConversionError {
            from,
            to,
            reason: reason.into(),
        }
    }
}

/// Error types for the field codec
#[derive(Debug, Error)]
pub enum CodecError {
    /// The decode path cannot supply what the field type requires
    #[error("Decoding is not supported: {0}")]
    DecodingUnsupported(String),

    /// The field type cannot be encoded through this encode path
    #[error("Encoding is not supported: {0}")]
    EncodingUnsupported(String),

    /// A value's own wrap/unwrap failed
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// A reference path failed validation
    #[error("Invalid reference: {0}")]
    Reference(#[from] ReferenceError),

    /// A stored value had the wrong shape
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected type
        expected: &'static str,
        /// Actual type found
        found: &'static str,
    },

    /// Free-form error raised through serde
    #[error("{0}")]
    Message(String),
}

impl CodecError {
    /// Shorthand for [`CodecError::DecodingUnsupported`]
    pub fn decoding_unsupported(reason: impl Into<String>) -> Self {
        CodecError::DecodingUnsupported(reason.into())
    }

    /// Shorthand for [`CodecError::EncodingUnsupported`]
    pub fn encoding_unsupported(reason: impl Into<String>) -> Self {
        CodecError::EncodingUnsupported(reason.into())
    }

    /// Shorthand for [`CodecError::TypeMismatch`]
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        CodecError::TypeMismatch { expected, found }
    }

    /// True for the two "wrong codec path" kinds
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            CodecError::DecodingUnsupported(_) | CodecError::EncodingUnsupported(_)
        )
    }
}

impl serde::ser::Error for CodecError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CodecError::Message(msg.to_string())
    }
}

impl serde::de::Error for CodecError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CodecError::Message(msg.to_string())
    }
}

//! Store-aware decoder
//!
//! Deserializes any `Deserialize` type from a borrowed [`Value`], with a
//! [`CodecContext`] threaded through every nested call. The context is
//! borrowed for the duration of the call only.
//!
//! Two things set this decoder apart from a plain value deserializer:
//!
//! - The document id marker is answered from the context's reference entry,
//!   not from stored data.
//! - Struct decoding offers every declared field that is missing from the
//!   stored map as an *absent* entry. A document id field is never stored, so
//!   this is how it still reaches the reference. Absent entries decode as
//!   `None` for optional types and report `missing field` for anything else.

use crate::config::{CodecOptions, ServerTimestampBehavior};
use docfield_core::markers;
use docfield_core::{
    CodecContext, CodecError, DocumentReference, Result, Timestamp, Value, ValueMap,
    DOCUMENT_REFERENCE_KEY,
};
use serde::de::value::{BorrowedStrDeserializer, MapDeserializer};
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};
use serde::{forward_to_deserialize_any, Deserialize, Deserializer};
use std::collections::btree_map;
use tracing::debug;

static NULL: Value = Value::Null;

/// Deserialize `T` from `value`, using `context` for out-of-band fields
///
/// # Errors
///
/// Returns `DecodingUnsupported` if `T` contains a document id and `context`
/// carries no reference, and any error raised by `T`'s `Deserialize`.
///
/// A field's own `wrap` failure surfaces here as `CodecError::Message`, since
/// serde only passes error text through. Call `DocumentId::decode` or
/// `ServerTimestamp::decode` on the single field to get the
/// `CodecError::Conversion` with the original `ConversionError`.
pub fn from_value<'de, T: Deserialize<'de>>(
    value: &'de Value,
    context: &'de CodecContext,
) -> Result<T> {
    from_value_with_options(value, context, &CodecOptions::default())
}

/// [`from_value`] with explicit decoder options
pub fn from_value_with_options<'de, T: Deserialize<'de>>(
    value: &'de Value,
    context: &'de CodecContext,
    options: &CodecOptions,
) -> Result<T> {
    T::deserialize(Decoder::new(value, context, options))
}

/// Decode the document stored at `reference`
///
/// Builds a fresh context holding `reference` for this call.
pub fn decode_document<T: DeserializeOwned>(
    reference: &DocumentReference,
    fields: &ValueMap,
) -> Result<T> {
    let value = Value::Map(fields.clone());
    let context = CodecContext::for_document(reference.clone());
    from_value(&value, &context)
}

fn timestamp_parts<'de>(
    ts: Timestamp,
) -> MapDeserializer<'de, std::vec::IntoIter<(&'static str, i64)>, CodecError> {
    MapDeserializer::new(vec![("seconds", ts.seconds()), ("nanos", ts.nanos() as i64)].into_iter())
}

/// Deserializer over a borrowed [`Value`]
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'de> {
    value: &'de Value,
    context: &'de CodecContext,
    server_timestamps: ServerTimestampBehavior,
    // Set when this decoder stands for a declared struct field with no
    // stored value.
    missing: Option<&'static str>,
}

impl<'de> Decoder<'de> {
    /// Decoder for `value`
    pub fn new(value: &'de Value, context: &'de CodecContext, options: &CodecOptions) -> Self {
        Decoder {
            value,
            context,
            server_timestamps: options.server_timestamp_behavior,
            missing: None,
        }
    }

    fn child(&self, value: &'de Value) -> Self {
        Decoder {
            value,
            missing: None,
            ..*self
        }
    }

    fn absent(&self, field: &'static str) -> Self {
        Decoder {
            value: &NULL,
            missing: Some(field),
            ..*self
        }
    }

    fn check_present(&self) -> Result<()> {
        match self.missing {
            Some(field) => Err(de::Error::missing_field(field)),
            None => Ok(()),
        }
    }

    /// Timestamp an unresolved placeholder reads as, if any
    fn placeholder_timestamp(&self) -> Option<Timestamp> {
        match self.server_timestamps {
            ServerTimestampBehavior::None => None,
            ServerTimestampBehavior::Estimate => Some(Timestamp::now()),
        }
    }

    fn deserialize_document_id<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let reference = self.context.document_reference()?;
        debug!(
            reference = reference.map(|r| r.path()).as_deref().unwrap_or("null"),
            "Answering document id from codec context"
        );
        let entry = self.context.get(DOCUMENT_REFERENCE_KEY).unwrap_or(&NULL);
        visitor.visit_map(DocumentIdAccess {
            value: Some(self.child(entry)),
            key_sent: false,
        })
    }
}

impl<'de> Deserializer<'de> for Decoder<'de> {
    type Error = CodecError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.check_present()?;
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Int(i) => visitor.visit_i64(*i),
            Value::Float(f) => visitor.visit_f64(*f),
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Bytes(b) => visitor.visit_borrowed_bytes(b),
            Value::Array(items) => {
                let mut seq = SeqDecoder {
                    parent: self,
                    iter: items.iter(),
                };
                let out = visitor.visit_seq(&mut seq)?;
                match seq.iter.len() {
                    0 => Ok(out),
                    _ => Err(de::Error::invalid_length(
                        items.len(),
                        &"fewer elements in array",
                    )),
                }
            }
            Value::Map(fields) => visitor.visit_map(MapDecoder::new(self, fields, &[])),
            Value::Timestamp(ts) => visitor.visit_map(timestamp_parts(*ts)),
            Value::Reference(r) => visitor.visit_string(r.path()),
            Value::Sentinel(_) => match self.placeholder_timestamp() {
                Some(ts) => visitor.visit_map(timestamp_parts(ts)),
                None => visitor.visit_unit(),
            },
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.missing.is_some() {
            return visitor.visit_none();
        }
        match self.value {
            Value::Null => visitor.visit_none(),
            Value::Sentinel(_) if self.server_timestamps == ServerTimestampBehavior::None => {
                visitor.visit_none()
            }
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == markers::DOCUMENT_ID {
            return self.deserialize_document_id(visitor);
        }
        self.check_present()?;
        match (name, self.value) {
            (markers::TIMESTAMP, Value::Timestamp(ts)) => {
                visitor.visit_newtype_struct(timestamp_parts(*ts))
            }
            (markers::TIMESTAMP, Value::Sentinel(_)) => match self.placeholder_timestamp() {
                Some(ts) => visitor.visit_newtype_struct(timestamp_parts(ts)),
                None => Err(CodecError::type_mismatch("Timestamp", "Sentinel")),
            },
            _ => visitor.visit_newtype_struct(self),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.check_present()?;
        match self.value {
            Value::Map(map) => visitor.visit_map(MapDecoder::new(self, map, fields)),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.check_present()?;
        match self.value {
            Value::String(s) => visitor.visit_enum(s.as_str().into_deserializer()),
            Value::Map(map) if map.len() == 1 => match map.iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumDecoder {
                    variant: variant.as_str(),
                    value: self.child(value),
                }),
                None => Err(CodecError::type_mismatch("enum", "Map")),
            },
            other => Err(CodecError::type_mismatch(
                "String or single-entry Map",
                other.type_name(),
            )),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
    }
}

// ============================================================================
// Access helpers
// ============================================================================

struct SeqDecoder<'de> {
    parent: Decoder<'de>,
    iter: std::slice::Iter<'de, Value>,
}

impl<'de> SeqAccess<'de> for SeqDecoder<'de> {
    type Error = CodecError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.iter.next() {
            Some(value) => seed.deserialize(self.parent.child(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDecoder<'de> {
    parent: Decoder<'de>,
    entries: btree_map::Iter<'de, String, Value>,
    absent: std::vec::IntoIter<&'static str>,
    value: Option<Decoder<'de>>,
}

impl<'de> MapDecoder<'de> {
    fn new(parent: Decoder<'de>, map: &'de ValueMap, fields: &'static [&'static str]) -> Self {
        let absent: Vec<&'static str> = fields
            .iter()
            .copied()
            .filter(|field| !map.contains_key(*field))
            .collect();
        MapDecoder {
            parent,
            entries: map.iter(),
            absent: absent.into_iter(),
            value: None,
        }
    }
}

impl<'de> MapAccess<'de> for MapDecoder<'de> {
    type Error = CodecError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if let Some((key, value)) = self.entries.next() {
            self.value = Some(self.parent.child(value));
            return seed
                .deserialize(BorrowedStrDeserializer::new(key.as_str()))
                .map(Some);
        }
        if let Some(field) = self.absent.next() {
            self.value = Some(self.parent.absent(field));
            return seed.deserialize(BorrowedStrDeserializer::new(field)).map(Some);
        }
        Ok(None)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let value = self.value.take().ok_or_else(|| {
            CodecError::Message("map value requested before its key".to_string())
        })?;
        seed.deserialize(value)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len() + self.absent.len())
    }
}

/// Single-entry map handed to a document id visitor
struct DocumentIdAccess<'de> {
    value: Option<Decoder<'de>>,
    key_sent: bool,
}

impl<'de> MapAccess<'de> for DocumentIdAccess<'de> {
    type Error = CodecError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.key_sent {
            return Ok(None);
        }
        self.key_sent = true;
        seed.deserialize(BorrowedStrDeserializer::new(markers::DOCUMENT_ID))
            .map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let value = self.value.take().ok_or_else(|| {
            CodecError::Message("document id value requested twice".to_string())
        })?;
        seed.deserialize(value)
    }
}

struct EnumDecoder<'de> {
    variant: &'de str,
    value: Decoder<'de>,
}

impl<'de> EnumAccess<'de> for EnumDecoder<'de> {
    type Error = CodecError;
    type Variant = Decoder<'de>;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Decoder<'de>)> {
        let variant = seed.deserialize(BorrowedStrDeserializer::<CodecError>::new(self.variant))?;
        Ok((variant, self.value))
    }
}

impl<'de> VariantAccess<'de> for Decoder<'de> {
    type Error = CodecError;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            other => Err(CodecError::type_mismatch("Null", other.type_name())),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_struct("", fields, visitor)
    }
}

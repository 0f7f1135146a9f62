//! Store-aware encoder
//!
//! Serializes any `Serialize` type into a [`Value`]. This is the only
//! serializer that understands the reserved newtype names in
//! `docfield_core::markers`:
//!
//! - timestamps become `Value::Timestamp`
//! - references become `Value::Reference`
//! - the server timestamp placeholder becomes `Value::Sentinel`
//! - document id fields are left out of the enclosing struct or map
//!
//! ## Usage
//!
//! ```
//! use docfield_codec::{encode_document, ServerTimestamp};
//! use docfield_core::{FieldValue, Timestamp, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Post {
//!     title: String,
//!     created_at: ServerTimestamp<Timestamp>,
//! }
//!
//! let post = Post { title: "hi".into(), created_at: ServerTimestamp::pending() };
//! let fields = encode_document(&post).unwrap();
//! assert_eq!(fields["created_at"], Value::Sentinel(FieldValue::ServerTimestamp));
//! ```

use docfield_core::markers;
use docfield_core::{
    CodecError, DocumentReference, FieldValue, Result, Timestamp, Value, ValueMap,
};
use serde::ser::{self, Serialize, Serializer};
use tracing::debug;

/// Encoder output: `None` means "omit this field"
type Encoded = Option<Value>;

/// Serialize `value` into a store value
///
/// # Errors
///
/// Returns `EncodingUnsupported` if `value` is itself a document id, and
/// any error raised by the value's `Serialize` implementation.
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value> {
    required(value.serialize(Encoder)?)
}

/// Serialize `value` into the field map of a document
///
/// # Errors
///
/// As [`to_value`], plus `TypeMismatch` if the value does not encode to a map.
pub fn encode_document<T: ?Sized + Serialize>(value: &T) -> Result<ValueMap> {
    match to_value(value)? {
        Value::Map(fields) => Ok(fields),
        other => Err(CodecError::type_mismatch("Map", other.type_name())),
    }
}

fn required(encoded: Encoded) -> Result<Value> {
    encoded.ok_or_else(|| {
        CodecError::encoding_unsupported(
            "a document id can only be encoded as a field of a document",
        )
    })
}

fn timestamp_from_parts(parts: &Value) -> Result<Timestamp> {
    let int_field = |name: &str| -> Result<i64> {
        match parts.get(name) {
            Some(Value::Int(i)) => Ok(*i),
            Some(other) => Err(CodecError::type_mismatch("Int", other.type_name())),
            None => Err(CodecError::Message(format!(
                "timestamp is missing `{}`",
                name
            ))),
        }
    };
    let seconds = int_field("seconds")?;
    let nanos = i32::try_from(int_field("nanos")?)
        .map_err(|_| CodecError::Message("timestamp nanos do not fit in i32".to_string()))?;
    Ok(Timestamp::new(seconds, nanos)?)
}

/// Serializer producing [`Value`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder;

impl Serializer for Encoder {
    type Ok = Encoded;
    type Error = CodecError;
    type SerializeSeq = SeqEncoder;
    type SerializeTuple = SeqEncoder;
    type SerializeTupleStruct = SeqEncoder;
    type SerializeTupleVariant = VariantSeqEncoder;
    type SerializeMap = MapEncoder;
    type SerializeStruct = MapEncoder;
    type SerializeStructVariant = VariantMapEncoder;

    fn serialize_bool(self, v: bool) -> Result<Encoded> {
        Ok(Some(Value::Bool(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Encoded> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Encoded> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Encoded> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Encoded> {
        Ok(Some(Value::Int(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Encoded> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u16(self, v: u16) -> Result<Encoded> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u32(self, v: u32) -> Result<Encoded> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u64(self, v: u64) -> Result<Encoded> {
        let v = i64::try_from(v)
            .map_err(|_| CodecError::Message(format!("integer {} does not fit in i64", v)))?;
        self.serialize_i64(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Encoded> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Encoded> {
        Ok(Some(Value::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Encoded> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Encoded> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Encoded> {
        Ok(Some(Value::Bytes(v.to_vec())))
    }

    fn serialize_none(self) -> Result<Encoded> {
        Ok(Some(Value::Null))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Encoded> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Encoded> {
        Ok(Some(Value::Null))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Encoded> {
        Ok(Some(Value::Null))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Encoded> {
        Ok(Some(Value::String(variant.to_string())))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Encoded> {
        match name {
            markers::DOCUMENT_ID => Ok(None),
            markers::TIMESTAMP => {
                let parts = to_value(value)?;
                Ok(Some(Value::Timestamp(timestamp_from_parts(&parts)?)))
            }
            markers::REFERENCE => match to_value(value)? {
                Value::String(path) => Ok(Some(Value::Reference(DocumentReference::parse(
                    &path,
                )?))),
                other => Err(CodecError::type_mismatch("String", other.type_name())),
            },
            markers::SERVER_TIMESTAMP => match to_value(value)? {
                Value::String(tag) => FieldValue::from_tag(&tag)
                    .map(|sentinel| Some(Value::Sentinel(sentinel)))
                    .ok_or_else(|| CodecError::Message(format!("unknown sentinel tag {}", tag))),
                other => Err(CodecError::type_mismatch("String", other.type_name())),
            },
            _ => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Encoded> {
        let mut map = ValueMap::new();
        map.insert(variant.to_string(), to_value(value)?);
        Ok(Some(Value::Map(map)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqEncoder> {
        Ok(SeqEncoder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqEncoder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqEncoder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSeqEncoder> {
        Ok(VariantSeqEncoder {
            variant,
            seq: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapEncoder> {
        Ok(MapEncoder::default())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<MapEncoder> {
        Ok(MapEncoder::default())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<VariantMapEncoder> {
        Ok(VariantMapEncoder {
            variant,
            map: MapEncoder::default(),
        })
    }
}

// ============================================================================
// Compound encoders
// ============================================================================

/// Collects sequence and tuple elements
#[derive(Debug)]
pub struct SeqEncoder {
    items: Vec<Value>,
}

impl SeqEncoder {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqEncoder {
    type Ok = Encoded;
    type Error = CodecError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Encoded> {
        Ok(Some(Value::Array(self.items)))
    }
}

impl ser::SerializeTuple for SeqEncoder {
    type Ok = Encoded;
    type Error = CodecError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Encoded> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqEncoder {
    type Ok = Encoded;
    type Error = CodecError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Encoded> {
        ser::SerializeSeq::end(self)
    }
}

/// Tuple variant: `{ variant: [..] }`
#[derive(Debug)]
pub struct VariantSeqEncoder {
    variant: &'static str,
    seq: SeqEncoder,
}

impl ser::SerializeTupleVariant for VariantSeqEncoder {
    type Ok = Encoded;
    type Error = CodecError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.seq.push(value)
    }

    fn end(self) -> Result<Encoded> {
        let mut map = ValueMap::new();
        map.insert(self.variant.to_string(), Value::Array(self.seq.items));
        Ok(Some(Value::Map(map)))
    }
}

/// Collects map entries and struct fields
///
/// Fields whose value encodes to nothing (document ids) are dropped.
#[derive(Debug, Default)]
pub struct MapEncoder {
    map: ValueMap,
    next_key: Option<String>,
}

impl MapEncoder {
    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        match value.serialize(Encoder)? {
            Some(v) => {
                self.map.insert(key, v);
            }
            None => debug!(field = %key, "Omitting document id field from encoded document"),
        }
        Ok(())
    }
}

impl ser::SerializeMap for MapEncoder {
    type Ok = Encoded;
    type Error = CodecError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        match to_value(key)? {
            Value::String(s) => {
                self.next_key = Some(s);
                Ok(())
            }
            other => Err(CodecError::Message(format!(
                "map keys must be strings, found {}",
                other.type_name()
            ))),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self.next_key.take().ok_or_else(|| {
            CodecError::Message("serialize_value called before serialize_key".to_string())
        })?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Encoded> {
        Ok(Some(Value::Map(self.map)))
    }
}

impl ser::SerializeStruct for MapEncoder {
    type Ok = Encoded;
    type Error = CodecError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Encoded> {
        ser::SerializeMap::end(self)
    }
}

/// Struct variant: `{ variant: { .. } }`
#[derive(Debug)]
pub struct VariantMapEncoder {
    variant: &'static str,
    map: MapEncoder,
}

impl ser::SerializeStructVariant for VariantMapEncoder {
    type Ok = Encoded;
    type Error = CodecError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.map.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Encoded> {
        let mut outer = ValueMap::new();
        outer.insert(self.variant.to_string(), Value::Map(self.map.map));
        Ok(Some(Value::Map(outer)))
    }
}

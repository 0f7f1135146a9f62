//! Server Timestamp Invariants
//!
//! **Invariant**: an empty server timestamp field is written as the commit
//! time placeholder, a set field as its literal value.

use crate::common::*;
use chrono::{DateTime, TimeZone, Utc};

#[derive(Debug, Serialize, Deserialize)]
struct Audit {
    actor: String,
    at: ServerTimestamp<DateTime<Utc>>,
}

/// Encoding an empty field emits the placeholder.
#[test]
fn test_pending_field_encodes_placeholder() {
    let stored = encode_document(&Post::draft("t")).unwrap();
    assert_eq!(
        stored["created_at"],
        Value::Sentinel(FieldValue::ServerTimestamp)
    );
}

/// An empty calendar field encodes as the placeholder, not a date value.
#[test]
fn test_pending_calendar_field_encodes_placeholder() {
    let audit = Audit {
        actor: "a".into(),
        at: ServerTimestamp::pending(),
    };
    let stored = encode_document(&audit).unwrap();
    assert_eq!(stored["at"], Value::Sentinel(FieldValue::ServerTimestamp));

    assert_eq!(
        ServerTimestamp::<DateTime<Utc>>::pending().encode().unwrap(),
        Value::Sentinel(FieldValue::ServerTimestamp)
    );
    assert_eq!(
        ServerTimestamp::<DateTime<Utc>>::new(None).encode().unwrap(),
        Value::Sentinel(FieldValue::ServerTimestamp)
    );
}

/// Encoding a set field emits the literal timestamp.
#[test]
fn test_set_field_encodes_literal() {
    let mut post = Post::draft("t");
    post.created_at = ServerTimestamp::new(Some(commit_time()));
    let stored = encode_document(&post).unwrap();
    assert_eq!(stored["created_at"], Value::Timestamp(commit_time()));
}

/// Null and an unresolved placeholder both read back as empty.
#[test]
fn test_null_and_placeholder_decode_as_pending() {
    for stored_at in [Value::Null, Value::Sentinel(FieldValue::ServerTimestamp)] {
        let stored = fields(vec![("actor", Value::from("a")), ("at", stored_at)]);
        let audit: Audit = decode_document(&reference("audits/a1"), &stored).unwrap();
        assert!(audit.at.is_pending());
    }
}

/// A missing field reads back as empty.
#[test]
fn test_missing_field_decodes_as_pending() {
    let stored = fields(vec![("actor", Value::from("a"))]);
    let audit: Audit = decode_document(&reference("audits/a1"), &stored).unwrap();
    assert!(audit.at.is_pending());
}

/// The estimate behaviour reads an unresolved placeholder as local time.
#[test]
fn test_estimate_behaviour_reads_local_clock() {
    let before = Utc::now() - chrono::Duration::seconds(1);
    let stored = Value::Map(fields(vec![
        ("actor", Value::from("a")),
        ("at", Value::Sentinel(FieldValue::ServerTimestamp)),
    ]));
    let ctx = CodecContext::new();
    let options =
        CodecOptions::default().with_server_timestamp_behavior(ServerTimestampBehavior::Estimate);
    let audit: Audit = from_value_with_options(&stored, &ctx, &options).unwrap();
    assert!(*audit.at.get().unwrap() >= before);
}

/// A resolved chrono timestamp comes back with full precision.
#[test]
fn test_chrono_value_round_trip() {
    let at = Utc.timestamp_opt(1_600_000_000, 987_654_321).unwrap();
    let audit = Audit {
        actor: "a".into(),
        at: ServerTimestamp::new(Some(at)),
    };
    let stored = encode_document(&audit).unwrap();
    assert_eq!(
        stored["at"],
        Value::Timestamp(Timestamp::new(1_600_000_000, 987_654_321).unwrap())
    );
    let back: Audit = decode_document(&reference("audits/a1"), &stored).unwrap();
    assert_eq!(back.at.get(), Some(&at));
}

/// A stored value of the wrong kind is a decoding error.
#[test]
fn test_wrong_kind_is_rejected() {
    let stored = fields(vec![
        ("actor", Value::from("a")),
        ("at", Value::from("yesterday")),
    ]);
    assert!(decode_document::<Audit>(&reference("audits/a1"), &stored).is_err());
    assert!(matches!(
        ServerTimestamp::<Timestamp>::decode(&Value::from("yesterday")),
        Err(CodecError::TypeMismatch { .. })
    ));
}

/// Wrapper whose conversion always fails.
#[derive(Debug)]
struct Never;

impl ServerTimestampWrappable for Never {
    fn wrap(_timestamp: Timestamp) -> Result<Self, ConversionError> {
        Err(ConversionError::new("Timestamp", "Never", "never converts"))
    }

    fn unwrap(_value: &Self) -> Result<Timestamp, ConversionError> {
        Err(ConversionError::new("Never", "Timestamp", "never converts"))
    }
}

/// The wrapper's own conversion error is surfaced in both directions.
#[test]
fn test_conversion_errors_are_propagated() {
    match ServerTimestamp::<Never>::decode(&Value::Timestamp(commit_time())) {
        Err(CodecError::Conversion(e)) => assert_eq!(e.to, "Never"),
        other => panic!("Expected conversion error, got {:?}", other),
    }
    match ServerTimestamp::new(Some(Never)).encode() {
        Err(CodecError::Conversion(e)) => assert_eq!(e.from, "Never"),
        other => panic!("Expected conversion error, got {:?}", other),
    }
    // Through serde the reason survives as the message.
    let err = to_value(&ServerTimestamp::new(Some(Never))).unwrap_err();
    assert!(err.to_string().contains("never converts"));
}

/// An empty field is still empty after decoding a pending write.
#[test]
fn test_pending_survives_uncommitted_round_trip() {
    let stored = encode_document(&Post::draft("t")).unwrap();
    let read: Post = decode_document(&reference("posts/p1"), &stored).unwrap();
    assert!(read.created_at.is_pending());
}

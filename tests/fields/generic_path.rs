//! Generic Path
//!
//! Behaviour of the field wrappers under a format that knows nothing about
//! the store: JSON.

use crate::common::*;

#[derive(Debug, Serialize, Deserialize)]
struct Untracked {
    created_at: ServerTimestamp<Timestamp>,
}

/// A record with a document id cannot be written as JSON.
#[test]
fn test_json_encode_of_document_id_fails() {
    let err = serde_json::to_string(&Post::draft("t")).unwrap_err();
    assert!(err.to_string().contains("Encoding is not supported"));
}

/// A record with a document id cannot be read from JSON.
#[test]
fn test_json_decode_of_document_id_fails() {
    let json = r#"{"id":"abc","title":"t","likes":0,"created_at":null}"#;
    let err = serde_json::from_str::<Post>(json).unwrap_err();
    assert!(err.to_string().contains("Decoding is not supported"));
}

/// A JSON payload without the id, as the store would write it, reports the
/// missing key.
#[test]
fn test_json_decode_without_id_key_reports_missing_field() {
    let json = r#"{"title":"t","likes":0,"created_at":null}"#;
    let err = serde_json::from_str::<Post>(json).unwrap_err();
    assert!(err.to_string().contains("missing field `id`"));
}

/// Server timestamps need no context and work through JSON.
#[test]
fn test_json_server_timestamp() {
    let json = serde_json::to_value(Untracked {
        created_at: ServerTimestamp::pending(),
    })
    .unwrap();
    assert_eq!(json, serde_json::json!({"created_at": "REQUEST_TIME"}));

    let set = Untracked {
        created_at: ServerTimestamp::new(Some(Timestamp::new(5, 6).unwrap())),
    };
    let json = serde_json::to_string(&set).unwrap();
    let back: Untracked = serde_json::from_str(&json).unwrap();
    assert_eq!(back.created_at, set.created_at);
}

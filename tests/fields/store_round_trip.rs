//! Store Round Trip
//!
//! Records written through the store encoder, committed, and read back
//! through the store decoder.

use crate::common::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum Visibility {
    Public,
    Restricted { groups: Vec<String> },
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Page {
    id: DocumentId<String>,
    slug: String,
    parent: Option<DocumentReference>,
    visibility: Visibility,
    edited: ServerTimestamp<Timestamp>,
    published: Option<Timestamp>,
}

/// Full write, commit, read cycle.
#[test]
fn test_write_commit_read() {
    let post = Post::draft("hello");
    let mut stored = encode_document(&post).unwrap();
    assert_eq!(commit(&mut stored, commit_time()), 1);

    let read: Post = decode_document(&reference("posts/p1"), &stored).unwrap();
    assert_eq!(read.id.get().map(String::as_str), Some("p1"));
    assert_eq!(read.created_at.get(), Some(&commit_time()));
    assert_eq!(read.title, "hello");
}

/// Rewriting a read record keeps the literal timestamp.
#[test]
fn test_rewrite_keeps_literal_timestamp() {
    let mut stored = encode_document(&Post::draft("hello")).unwrap();
    commit(&mut stored, commit_time());
    let mut read: Post = decode_document(&reference("posts/p1"), &stored).unwrap();
    read.likes += 1;

    let mut rewritten = encode_document(&read).unwrap();
    assert_eq!(commit(&mut rewritten, Timestamp::now()), 0);
    assert_eq!(rewritten["created_at"], Value::Timestamp(commit_time()));
    assert_eq!(rewritten["likes"], Value::Int(1));
}

/// Native store types and enums survive the cycle.
#[test]
fn test_rich_record() {
    let page = Page {
        id: DocumentId::unset(),
        slug: "intro".into(),
        parent: Some(reference("books/b1")),
        visibility: Visibility::Restricted {
            groups: vec!["staff".into()],
        },
        edited: ServerTimestamp::pending(),
        published: Some(Timestamp::from_secs(1_000)),
    };
    let mut stored = encode_document(&page).unwrap();
    assert_eq!(stored["parent"], Value::Reference(reference("books/b1")));
    assert_eq!(stored["published"], Value::Timestamp(Timestamp::from_secs(1_000)));
    commit(&mut stored, commit_time());

    let read: Page = decode_document(&reference("books/b1/pages/intro"), &stored).unwrap();
    assert_eq!(read.id.get().map(String::as_str), Some("intro"));
    assert_eq!(read.parent, page.parent);
    assert_eq!(read.visibility, page.visibility);
    assert_eq!(read.edited.get(), Some(&commit_time()));
    assert_eq!(read.published, page.published);
}

/// Records that do not encode to a map are rejected as documents.
#[test]
fn test_non_map_document_rejected() {
    assert!(matches!(
        encode_document(&42u8),
        Err(CodecError::TypeMismatch { .. })
    ));
}

// =============================================================================
// Record shape limits
// =============================================================================

/// A missing defaulted field is reported, not defaulted.
#[test]
fn test_serde_default_is_not_applied_to_missing_fields() {
    #[derive(Debug, Deserialize)]
    struct Tagged {
        id: DocumentId<String>,
        #[serde(default)]
        tags: Vec<String>,
    }

    let err = decode_document::<Tagged>(&reference("c/d"), &ValueMap::new()).unwrap_err();
    assert!(err.to_string().contains("missing field `tags`"));

    let stored = fields(vec![("tags", Value::Array(vec![]))]);
    let tagged: Tagged = decode_document(&reference("c/d"), &stored).unwrap();
    assert!(tagged.tags.is_empty());
    assert_eq!(tagged.id.get().map(String::as_str), Some("d"));
}

/// A document id in a flattened struct is not reached.
#[test]
fn test_flattened_document_id_is_missing() {
    #[derive(Debug, Deserialize)]
    struct Inner {
        id: DocumentId<String>,
    }

    #[derive(Debug, Deserialize)]
    struct Outer {
        #[serde(flatten)]
        inner: Inner,
        name: String,
    }

    let stored = fields(vec![("name", Value::from("n"))]);
    let err = decode_document::<Outer>(&reference("c/d"), &stored).unwrap_err();
    assert!(err.to_string().contains("missing field `id`"));
}

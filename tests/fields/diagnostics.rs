//! Diagnostics
//!
//! Assigning a document id by hand is allowed but reported once per
//! assignment at WARN level. Store-driven construction is silent.

use crate::common::*;

#[test]
fn test_direct_assignment_warns_once() {
    let (field, warnings) = count_warnings(|| DocumentId::new(Some("abc".to_string())));
    assert_eq!(warnings, 1);
    assert_eq!(field.get().map(String::as_str), Some("abc"));
}

#[test]
fn test_set_warns_once_per_call() {
    let (_, warnings) = count_warnings(|| {
        let mut field = DocumentId::<String>::unset();
        field.set(Some("a".into()));
        field.set(Some("b".into()));
        field.set(None);
    });
    assert_eq!(warnings, 2);
}

#[test]
fn test_store_paths_are_silent() {
    let (_, warnings) = count_warnings(|| {
        let _ = DocumentId::<String>::new(None);
        let _ = DocumentId::<String>::unset();
        let stored = fields(vec![
            ("title", Value::from("t")),
            ("likes", Value::Int(0)),
            ("created_at", Value::Null),
        ]);
        let post: Post = decode_document(&reference("posts/p1"), &stored).unwrap();
        encode_document(&post).unwrap();
    });
    assert_eq!(warnings, 0);
}

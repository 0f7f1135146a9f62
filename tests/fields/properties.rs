//! Property-based checks of the field wrapper guarantees.

use crate::common::*;
use chrono::{DateTime, Utc};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,20}"
}

fn document_path() -> impl Strategy<Value = String> {
    prop::collection::vec((segment(), segment()), 1..4).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(collection, id)| format!("{}/{}", collection, id))
            .collect::<Vec<_>>()
            .join("/")
    })
}

fn timestamp() -> impl Strategy<Value = Timestamp> {
    (-62_135_596_800i64..=253_402_300_799, 0i32..1_000_000_000)
        .prop_map(|(s, n)| Timestamp::new(s, n).unwrap())
}

proptest! {
    #[test]
    fn decode_with_reference_yields_last_segment(path in document_path()) {
        let r = reference(&path);
        let field = DocumentId::<String>::decode(&CodecContext::for_document(r.clone())).unwrap();
        prop_assert_eq!(field.get().map(String::as_str), path.rsplit('/').next());

        let full = DocumentId::<DocumentReference>::decode(&CodecContext::for_document(r.clone()))
            .unwrap();
        prop_assert_eq!(full.into_inner(), Some(r));
    }

    #[test]
    fn decode_without_reference_is_unsupported(key in "[a-z]{1,10}") {
        let mut ctx = CodecContext::new();
        ctx.insert(key, Value::Null);
        prop_assert!(matches!(
            DocumentId::<String>::decode(&ctx),
            Err(CodecError::DecodingUnsupported(_))
        ));
    }

    #[test]
    fn document_id_never_encodes(id in proptest::option::of(segment())) {
        let field = DocumentId::<String>::from_reference(
            id.map(|i| reference(&format!("c/{}", i))).as_ref(),
        )
        .unwrap();
        prop_assert!(matches!(field.encode(), Err(CodecError::EncodingUnsupported(_))));
    }

    #[test]
    fn server_timestamp_round_trips(ts in timestamp()) {
        let field = ServerTimestamp::new(Some(ts));
        let encoded = field.encode().unwrap();
        prop_assert_eq!(&encoded, &Value::Timestamp(ts));
        prop_assert_eq!(ServerTimestamp::<Timestamp>::decode(&encoded).unwrap(), field);
    }

    #[test]
    fn calendar_server_timestamp_round_trips(ts in timestamp()) {
        let at = <DateTime<Utc> as ServerTimestampWrappable>::wrap(ts).unwrap();
        let field = ServerTimestamp::new(Some(at));
        let encoded = field.encode().unwrap();
        prop_assert_eq!(&encoded, &Value::Timestamp(ts));
        prop_assert_eq!(ServerTimestamp::<DateTime<Utc>>::decode(&encoded).unwrap(), field);
    }

    #[test]
    fn record_round_trips_through_store(
        path in document_path(),
        title in ".{0,40}",
        likes in any::<u32>(),
        created in proptest::option::of(timestamp()),
    ) {
        let post = Post {
            id: DocumentId::unset(),
            title,
            likes,
            created_at: ServerTimestamp::new(created),
        };
        let stored = encode_document(&post).unwrap();
        prop_assert!(!stored.contains_key("id"));
        prop_assert_eq!(
            stored["created_at"].is_sentinel(),
            created.is_none()
        );

        let read: Post = decode_document(&reference(&path), &stored).unwrap();
        prop_assert_eq!(read.id.get().map(String::as_str), path.rsplit('/').next());
        prop_assert_eq!(read.title, post.title);
        prop_assert_eq!(read.likes, post.likes);
        prop_assert_eq!(read.created_at, post.created_at);
    }
}

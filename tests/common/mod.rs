//! Shared test utilities for the integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use docfield::{
    decode_document, encode_document, from_value, from_value_with_options, to_value,
    CodecContext, CodecError, CodecOptions, ConversionError, DocumentId, DocumentIdWrappable,
    DocumentReference, FieldValue, ServerTimestamp, ServerTimestampBehavior,
    ServerTimestampWrappable, Timestamp, Value, ValueMap,
};
pub use serde::{Deserialize, Serialize};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// ============================================================================
// Fixtures
// ============================================================================

/// Record with both special fields, as an application would declare it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: DocumentId<String>,
    pub title: String,
    pub likes: u32,
    pub created_at: ServerTimestamp<Timestamp>,
}

impl Post {
    pub fn draft(title: &str) -> Self {
        Post {
            id: DocumentId::unset(),
            title: title.to_string(),
            likes: 0,
            created_at: ServerTimestamp::pending(),
        }
    }
}

/// Parse a reference, panicking on malformed test input.
pub fn reference(path: &str) -> DocumentReference {
    DocumentReference::parse(path).unwrap()
}

/// A fixed commit time.
pub fn commit_time() -> Timestamp {
    Timestamp::new(1_700_000_000, 123_000_000).unwrap()
}

/// Stand-in for the store's commit: replace every placeholder.
pub fn commit(fields: &mut ValueMap, at: Timestamp) -> usize {
    fields
        .values_mut()
        .map(|v| v.resolve_server_timestamps(at))
        .sum()
}

/// Build a field map from literal entries.
pub fn fields(entries: Vec<(&str, Value)>) -> ValueMap {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// ============================================================================
// Log capture
// ============================================================================

struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` under a scoped subscriber and return the number of WARN events.
pub fn count_warnings<R, F: FnOnce() -> R>(f: F) -> (R, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(count.clone()));
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, count.load(Ordering::SeqCst))
}

//! Decoder configuration
//!
//! Options are plain serde structs so they can live inside an application's
//! own config file. Every field has a default.
//!
//! ```
//! use docfield_codec::{CodecOptions, ServerTimestampBehavior};
//!
//! let opts: CodecOptions =
//!     serde_json::from_str(r#"{"server_timestamp_behavior": "estimate"}"#).unwrap();
//! assert_eq!(opts.server_timestamp_behavior, ServerTimestampBehavior::Estimate);
//! ```

use serde::{Deserialize, Serialize};

/// How the decoder reads a server timestamp placeholder that the store has
/// not resolved yet (for example a pending local write)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerTimestampBehavior {
    /// Read as absent
    #[default]
    None,
    /// Read as the local clock
    Estimate,
}

/// Options for the store-aware decoder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Handling of unresolved server timestamp placeholders
    pub server_timestamp_behavior: ServerTimestampBehavior,
}

impl CodecOptions {
    /// Set the server timestamp behavior
    pub fn with_server_timestamp_behavior(mut self, behavior: ServerTimestampBehavior) -> Self {
        self.server_timestamp_behavior = behavior;
        self
    }
}

//! Nanosecond-precision timestamp type
//!
//! This is the store's native timestamp scalar. Every value the store writes
//! for a server timestamp, and every timestamp it reads back, has this shape.
//!
//! ## Precision and Range
//!
//! A timestamp is whole seconds since Unix epoch plus a non-negative
//! nanosecond offset. The representable range is
//! `0001-01-01T00:00:00Z` to `9999-12-31T23:59:59.999999999Z`.
//!
//! ## Usage
//!
//! ```
//! use docfield_core::Timestamp;
//!
//! let now = Timestamp::now();
//! let exact = Timestamp::new(1_700_000_000, 250).unwrap();
//! let from_secs = Timestamp::from_secs(1000);
//! assert!(from_secs < exact);
//! ```

use crate::error::ConversionError;
use crate::markers;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds of `0001-01-01T00:00:00Z`
pub const MIN_SECONDS: i64 = -62_135_596_800;

/// Seconds of `9999-12-31T23:59:59Z`
pub const MAX_SECONDS: i64 = 253_402_300_799;

const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// Store-native timestamp
///
/// ## Invariants
///
/// - `MIN_SECONDS <= seconds <= MAX_SECONDS`
/// - `0 <= nanos < 1_000_000_000`
/// - Ordering is chronological
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    seconds: i64,
    nanos: i32,
}

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp {
        seconds: 0,
        nanos: 0,
    };

    /// Earliest representable timestamp
    pub const MIN: Timestamp = Timestamp {
        seconds: MIN_SECONDS,
        nanos: 0,
    };

    /// Latest representable timestamp
    pub const MAX: Timestamp = Timestamp {
        seconds: MAX_SECONDS,
        nanos: NANOS_PER_SECOND - 1,
    };

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a timestamp, validating both components
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if `nanos` is outside `0..1_000_000_000` or
    /// `seconds` is outside the representable range.
    pub fn new(seconds: i64, nanos: i32) -> Result<Self, ConversionError> {
        if !(0..NANOS_PER_SECOND).contains(&nanos) {
            return Err(ConversionError::new(
                "(i64, i32)",
                "Timestamp",
                format!("nanos {} out of range 0..{}", nanos, NANOS_PER_SECOND),
            ));
        }
        if !(MIN_SECONDS..=MAX_SECONDS).contains(&seconds) {
            return Err(ConversionError::new(
                "(i64, i32)",
                "Timestamp",
                format!(
                    "seconds {} out of range {}..={}",
                    seconds, MIN_SECONDS, MAX_SECONDS
                ),
            ));
        }
        Ok(Timestamp { seconds, nanos })
    }

    /// Create a timestamp for the current moment
    ///
    /// Uses system time. Returns epoch if the system clock is before Unix
    /// epoch.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp::from(duration)
    }

    /// Create a timestamp from seconds since epoch
    ///
    /// Saturates at `MIN`/`MAX`.
    pub fn from_secs(secs: i64) -> Self {
        Self::saturating(secs as i128, 0)
    }

    /// Create a timestamp from milliseconds since epoch
    ///
    /// Saturates at `MIN`/`MAX`.
    pub fn from_millis(millis: i64) -> Self {
        Self::saturating(
            millis.div_euclid(1_000) as i128,
            (millis.rem_euclid(1_000) * 1_000_000) as i32,
        )
    }

    /// Create a timestamp from microseconds since epoch
    ///
    /// Saturates at `MIN`/`MAX`.
    pub fn from_micros(micros: i64) -> Self {
        Self::saturating(
            micros.div_euclid(1_000_000) as i128,
            (micros.rem_euclid(1_000_000) * 1_000) as i32,
        )
    }

    fn saturating(seconds: i128, nanos: i32) -> Self {
        if seconds < MIN_SECONDS as i128 {
            Timestamp::MIN
        } else if seconds > MAX_SECONDS as i128 {
            Timestamp::MAX
        } else {
            Timestamp {
                seconds: seconds as i64,
                nanos,
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whole seconds since Unix epoch
    #[inline]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanoseconds past `seconds`
    #[inline]
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }

    /// Microseconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_micros(&self) -> i64 {
        self.seconds * 1_000_000 + (self.nanos / 1_000) as i64
    }

    /// Milliseconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.seconds * 1_000 + (self.nanos / 1_000_000) as i64
    }

    /// Compute duration since an earlier timestamp
    ///
    /// Returns `None` if `earlier` is actually later than `self`.
    pub fn duration_since(&self, earlier: Timestamp) -> Option<Duration> {
        if *self < earlier {
            return None;
        }
        let mut secs = self.seconds - earlier.seconds;
        let mut nanos = self.nanos - earlier.nanos;
        if nanos < 0 {
            secs -= 1;
            nanos += NANOS_PER_SECOND;
        }
        Some(Duration::new(secs as u64, nanos as u32))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

impl From<Duration> for Timestamp {
    /// Create from duration since epoch, saturating at `MAX`
    fn from(duration: Duration) -> Self {
        Self::saturating(duration.as_secs() as i128, duration.subsec_nanos() as i32)
    }
}

// ============================================================================
// Serde
// ============================================================================

#[derive(Serialize, Deserialize)]
struct TimestampParts {
    seconds: i64,
    nanos: i32,
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(
            markers::TIMESTAMP,
            &TimestampParts {
                seconds: self.seconds,
                nanos: self.nanos,
            },
        )
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(markers::TIMESTAMP, TimestampVisitor)
    }
}

struct TimestampVisitor;

impl TimestampVisitor {
    fn build<E: de::Error>(parts: TimestampParts) -> Result<Timestamp, E> {
        Timestamp::new(parts.seconds, parts.nanos).map_err(E::custom)
    }
}

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a timestamp with seconds and nanos")
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(self, d: D) -> Result<Timestamp, D::Error> {
        Self::build(TimestampParts::deserialize(d)?)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Timestamp, A::Error> {
        let parts = TimestampParts::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Self::build(parts)
    }
}

// ============================================================================
// Tests
// ============================================================================

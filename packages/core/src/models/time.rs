//! Timestamp Conversion
//!
//! Block records carry creation and edit times as milliseconds since the
//! Unix epoch. Conversion to calendar time truncates to whole seconds: the
//! millisecond remainder is dropped, never rounded.
//!
//! # Examples
//!
//! ```rust
//! use notion_model_core::models::time::datetime_from_millis;
//!
//! let t = datetime_from_millis(1_609_459_200_500).unwrap();
//! assert_eq!(t.timestamp(), 1_609_459_200);
//! assert_eq!(t.timestamp_subsec_millis(), 0);
//! ```

use chrono::{DateTime, Utc};

/// Convert epoch milliseconds to a UTC time truncated to the second
///
/// Integer division truncates toward zero, so negative (pre-epoch) values
/// truncate toward the epoch as well.
///
/// Returns `None` only if the value is outside chrono's representable range.
pub fn datetime_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(millis / 1000, 0)
}

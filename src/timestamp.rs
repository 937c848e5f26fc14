//! Timestamp annotation rendering.

use chrono::{DateTime, Local};

/// Options accepted by the timestamp enable/toggle operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampOptions {
    /// Stamp every existing line at enable time. `None` falls back to the
    /// configured `timestamp_backfill` default.
    pub backfill: Option<bool>,
}

impl TimestampOptions {
    /// Request backfill explicitly, overriding the configured default.
    pub fn with_backfill(backfill: bool) -> Self {
        Self {
            backfill: Some(backfill),
        }
    }
}

/// Render one stamp: `now` through the strftime `format`, then `pad`.
///
/// The format string is validated at config load
/// ([`crate::FollowConfig::validate`]), so rendering itself never fails.
pub fn render(now: DateTime<Local>, format: &str, pad: &str) -> String {
    format!("{}{}", now.format(format), pad)
}

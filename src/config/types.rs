use serde::{Deserialize, Serialize};

/// Runtime settings for the follow controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowConfig {
    /// How close (in lines) a cursor must sit to the buffer tail to count as
    /// "near bottom" and be carried forward (default: 3).
    #[serde(default = "default_threshold")]
    pub threshold: usize,

    /// Seed timestamp annotations on a buffer the first time follow is
    /// enabled for it, unless the buffer already has an explicit setting.
    #[serde(default)]
    pub timestamps: bool,

    /// strftime format for rendered stamps (default: `%H:%M:%S`).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Host highlight-group name the stamps are displayed with.
    #[serde(default = "default_timestamp_highlight")]
    pub timestamp_highlight: String,

    /// Pad string appended after each rendered stamp.
    #[serde(default = "default_timestamp_pad")]
    pub timestamp_pad: String,

    /// Stamp existing lines when timestamps are enabled without an explicit
    /// backfill choice.
    #[serde(default)]
    pub timestamp_backfill: bool,

    /// Delay in milliseconds before the second end-of-buffer jump after an
    /// enable. A settling heuristic: hosts with a reliable "render settled"
    /// hook should run the jump from that hook instead.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_threshold() -> usize {
    3
}

fn default_timestamp_format() -> String {
    "%H:%M:%S".to_string()
}

fn default_timestamp_highlight() -> String {
    "Comment".to_string()
}

fn default_timestamp_pad() -> String {
    " ".to_string()
}

fn default_settle_delay_ms() -> u64 {
    100
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            timestamps: false,
            timestamp_format: default_timestamp_format(),
            timestamp_highlight: default_timestamp_highlight(),
            timestamp_pad: default_timestamp_pad(),
            timestamp_backfill: false,
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

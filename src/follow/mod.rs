//! The follow controller.
//!
//! Tracks two independent per-buffer flags — follow and timestamps — and
//! reacts to host line-change notifications in two phases: a synchronous
//! immediate phase (timestamp annotation, flag checks) and a deferred phase
//! (cursor repositioning) scheduled through the host as a plain [`Deferred`]
//! payload, so the post-edit line count is only read once the host's update
//! batch has settled.

use std::time::Duration;

use chrono::Local;
use tracing::{debug, trace};

use crate::config::{ConfigStore, FollowConfig};
use crate::host::{Annotation, BufferId, Deferred, Host, HostError, LinesChanged, WindowId};
use crate::timestamp::{self, TimestampOptions};

mod plan;
mod state;

use state::BufferRegistry;

/// Per-buffer follow/timestamp state plus the reactions that drive windows
/// to the end of growing buffers.
///
/// All operations are silent no-ops on buffer handles the host no longer
/// knows, and every per-window failure inside the scroll phase skips that
/// window without aborting the rest.
pub struct FollowController {
    config: ConfigStore,
    buffers: BufferRegistry,
}

impl FollowController {
    pub fn new(config: ConfigStore) -> Self {
        Self {
            config,
            buffers: BufferRegistry::default(),
        }
    }

    /// Shared settings this controller consults on every decision.
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Whether appended lines currently auto-scroll windows showing `buffer`.
    pub fn is_following(&self, buffer: BufferId) -> bool {
        self.buffers.get(buffer).is_some_and(|state| state.follow)
    }

    /// Whether newly appended lines currently receive timestamp annotations.
    pub fn timestamps_enabled(&self, buffer: BufferId) -> bool {
        self.buffers
            .get(buffer)
            .is_some_and(|state| state.timestamps_on())
    }

    /// Turn follow mode on for `buffer`.
    ///
    /// Installs the line-change subscription once, seeds the timestamp flag
    /// from the config default when the buffer has no explicit setting yet,
    /// and jumps every window showing the buffer to the last line — both
    /// immediately and once more after the configured settle delay. A buffer
    /// shown in no window records the jump and applies it the first time a
    /// window displays it. Idempotent: re-enabling re-runs the jump only.
    pub fn enable(&mut self, host: &mut dyn Host, buffer: BufferId) {
        if !host.buffer_exists(buffer) {
            trace!(%buffer, "enable on dead buffer ignored");
            return;
        }
        let cfg = self.config.get();
        let state = self.buffers.entry(buffer);
        state.follow = true;
        if !state.attached && host.watch_lines(buffer) {
            state.attached = true;
        }
        let seed_timestamps = cfg.timestamps && state.timestamps.is_none();
        debug!(%buffer, "follow enabled");
        if seed_timestamps {
            self.timestamps_enable(host, buffer, TimestampOptions::default());
        }
        self.jump_to_end(host, buffer);
    }

    /// Turn follow mode off for `buffer`. Timestamp state is untouched and
    /// the line-change subscription stays installed; the next notification
    /// short-circuits on the flag. Idempotent.
    pub fn disable(&mut self, host: &mut dyn Host, buffer: BufferId) {
        if !host.buffer_exists(buffer) {
            trace!(%buffer, "disable on dead buffer ignored");
            return;
        }
        let Some(state) = self.buffers.get_mut(buffer) else {
            return;
        };
        state.follow = false;
        state.pending_jump = false;
        debug!(%buffer, "follow disabled");
    }

    /// Flip follow mode by delegating to [`enable`](Self::enable) or
    /// [`disable`](Self::disable).
    pub fn toggle(&mut self, host: &mut dyn Host, buffer: BufferId) {
        if !host.buffer_exists(buffer) {
            trace!(%buffer, "toggle on dead buffer ignored");
            return;
        }
        if self.is_following(buffer) {
            self.disable(host, buffer);
        } else {
            self.enable(host, buffer);
        }
    }

    /// Turn timestamp annotations on for `buffer`; no-op when already
    /// explicitly enabled. When backfill resolves true (explicit option,
    /// else the configured default), every existing line is stamped with the
    /// current time.
    pub fn timestamps_enable(
        &mut self,
        host: &mut dyn Host,
        buffer: BufferId,
        options: TimestampOptions,
    ) {
        if !host.buffer_exists(buffer) {
            trace!(%buffer, "timestamps enable on dead buffer ignored");
            return;
        }
        let cfg = self.config.get();
        let state = self.buffers.entry(buffer);
        if state.timestamps == Some(true) {
            return;
        }
        state.timestamps = Some(true);
        if !state.attached && host.watch_lines(buffer) {
            state.attached = true;
        }
        debug!(%buffer, "timestamps enabled");
        if options.backfill.unwrap_or(cfg.timestamp_backfill) {
            match host.line_count(buffer) {
                Ok(count) => stamp_rows(host, buffer, 0..count, &cfg),
                Err(err) => trace!(%buffer, %err, "backfill skipped"),
            }
        }
    }

    /// Turn timestamp annotations off for `buffer` and remove every
    /// annotation this crate placed on it; no-op when already explicitly
    /// disabled.
    pub fn timestamps_disable(&mut self, host: &mut dyn Host, buffer: BufferId) {
        if !host.buffer_exists(buffer) {
            trace!(%buffer, "timestamps disable on dead buffer ignored");
            return;
        }
        let state = self.buffers.entry(buffer);
        if state.timestamps == Some(false) {
            return;
        }
        state.timestamps = Some(false);
        host.clear_annotations(buffer);
        debug!(%buffer, "timestamps disabled");
    }

    /// Flip timestamp annotations. The backfill option travels with the flip
    /// into the enabled state.
    pub fn timestamps_toggle(
        &mut self,
        host: &mut dyn Host,
        buffer: BufferId,
        options: TimestampOptions,
    ) {
        if !host.buffer_exists(buffer) {
            trace!(%buffer, "timestamps toggle on dead buffer ignored");
            return;
        }
        if self.timestamps_enabled(buffer) {
            self.timestamps_disable(host, buffer);
        } else {
            self.timestamps_enable(host, buffer, options);
        }
    }

    /// React to a host line-change notification.
    ///
    /// Immediate phase: stamp the newly inserted rows when timestamps are on
    /// (deletions never stamp). Deferred phase: when follow is on, schedule a
    /// [`Deferred::ScrollSync`] so the line count is read after the current
    /// edit batch instead of mid-batch.
    pub fn handle_lines_changed(&mut self, host: &mut dyn Host, event: LinesChanged) {
        let Some(state) = self.buffers.get(event.buffer) else {
            return;
        };
        let follow = state.follow;
        let stamps = state.timestamps_on();
        let inserted = event.inserted();
        if inserted > 0 && stamps {
            let cfg = self.config.get();
            stamp_rows(host, event.buffer, event.first..event.first + inserted, &cfg);
        }
        if !follow {
            return;
        }
        host.defer(Deferred::ScrollSync {
            buffer: event.buffer,
            inserted,
        });
    }

    /// Execute a deferred payload the host scheduled earlier.
    ///
    /// Each payload is one-shot; a disable issued between scheduling and
    /// execution wins.
    pub fn run_deferred(&mut self, host: &mut dyn Host, task: Deferred) {
        match task {
            Deferred::ScrollSync { buffer, inserted } => self.scroll_sync(host, buffer, inserted),
            Deferred::JumpToEnd { buffer } => {
                if self.is_following(buffer) {
                    carry_all(host, buffer);
                }
            }
        }
    }

    /// Host callback for the one-shot "buffer became visible" notification:
    /// applies a jump recorded while the buffer was hidden.
    pub fn buffer_shown(&mut self, host: &mut dyn Host, buffer: BufferId) {
        let Some(state) = self.buffers.get_mut(buffer) else {
            return;
        };
        if !state.pending_jump {
            return;
        }
        state.pending_jump = false;
        if !state.follow || !host.buffer_exists(buffer) {
            return;
        }
        debug!(%buffer, "buffer shown, applying recorded jump");
        self.jump_to_end(host, buffer);
    }

    /// Host lifecycle callback: the buffer is gone, drop its state.
    pub fn buffer_closed(&mut self, buffer: BufferId) {
        self.buffers.remove(buffer);
        trace!(%buffer, "buffer state dropped");
    }

    fn jump_to_end(&mut self, host: &mut dyn Host, buffer: BufferId) {
        if host.windows_showing(buffer).is_empty() {
            self.buffers.entry(buffer).pending_jump = true;
            host.notify_when_shown(buffer);
            trace!(%buffer, "hidden buffer, jump recorded until shown");
            return;
        }
        carry_all(host, buffer);
        let delay = Duration::from_millis(self.config.get().settle_delay_ms);
        host.defer_after(delay, Deferred::JumpToEnd { buffer });
    }

    fn scroll_sync(&self, host: &mut dyn Host, buffer: BufferId, inserted: usize) {
        if !self.is_following(buffer) {
            return;
        }
        if !host.buffer_exists(buffer) {
            trace!(%buffer, "buffer vanished before scroll sync");
            return;
        }
        let last = match host.line_count(buffer) {
            Ok(last) => last,
            Err(err) => {
                trace!(%buffer, %err, "scroll sync aborted");
                return;
            }
        };
        let threshold = self.config.get().threshold;
        for window in host.windows_showing(buffer) {
            if !host.window_exists(window) {
                trace!(%window, "stale window listing skipped");
                continue;
            }
            let cursor = match host.cursor_line(window) {
                Ok(cursor) => cursor,
                Err(err) => {
                    trace!(%window, %err, "cursor read failed, window skipped");
                    continue;
                }
            };
            if !plan::should_carry(cursor, last, inserted, threshold) {
                continue;
            }
            if let Err(err) = carry_window(host, window, last) {
                debug!(%window, %err, "cursor move failed, window skipped");
            }
        }
    }
}

/// Unconditional end-of-buffer jump for every window showing `buffer`.
fn carry_all(host: &mut dyn Host, buffer: BufferId) {
    let last = match host.line_count(buffer) {
        Ok(last) => last,
        Err(err) => {
            trace!(%buffer, %err, "jump skipped");
            return;
        }
    };
    for window in host.windows_showing(buffer) {
        if let Err(err) = carry_window(host, window, last) {
            debug!(%window, %err, "window skipped during jump");
        }
    }
}

fn carry_window(host: &mut dyn Host, window: WindowId, last: usize) -> Result<(), HostError> {
    host.set_cursor(window, last)?;
    host.scroll_cursor_to_bottom(window)
}

/// Stamp `rows` of `buffer` with one rendering of the current time. A stale
/// buffer aborts the remaining rows; the next notification reattempts.
fn stamp_rows(
    host: &mut dyn Host,
    buffer: BufferId,
    rows: std::ops::Range<usize>,
    cfg: &FollowConfig,
) {
    let text = timestamp::render(Local::now(), &cfg.timestamp_format, &cfg.timestamp_pad);
    for row in rows {
        let annotation = Annotation {
            row,
            text: text.clone(),
            highlight: cfg.timestamp_highlight.clone(),
        };
        if let Err(err) = host.annotate(buffer, annotation) {
            trace!(%buffer, %err, "annotation skipped");
            break;
        }
    }
}

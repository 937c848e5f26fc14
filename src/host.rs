//! Backend-agnostic buffer/window host interface.
//!
//! Implementations wrap a concrete host (an editor core, a TUI pane manager)
//! and expose a uniform API consumed by the follow controller. Only the
//! implementation module should depend on the underlying host crate; this
//! crate ships no production binding of its own.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Opaque handle to a host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Opaque handle to a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// A line-change notification from the host.
///
/// Rows are 0-based and end-exclusive: the edit replaced rows
/// `[first, old_end)` with rows `[first, new_end)`. A pure append at the end
/// of an `n`-line buffer arrives as `first = old_end = n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinesChanged {
    pub buffer: BufferId,
    pub first: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl LinesChanged {
    /// Number of rows the edit added. Zero for deletions and same-size
    /// replacements.
    pub fn inserted(&self) -> usize {
        self.new_end.saturating_sub(self.old_end)
    }
}

/// Deferred work payload.
///
/// The controller never hands the host a closure; it schedules one of these
/// and the host calls [`crate::FollowController::run_deferred`] with it when
/// the scheduled moment arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Re-read the line count once the current edit batch has settled and
    /// carry near-bottom windows to the end. `inserted` is the row count the
    /// triggering edit added; the near-bottom check measures distance from
    /// the buffer tail as it was before those rows arrived.
    ScrollSync { buffer: BufferId, inserted: usize },
    /// Second, unconditional end-of-buffer jump issued a fixed delay after
    /// an enable, to outlast host UI settling.
    JumpToEnd { buffer: BufferId },
}

/// A non-content annotation displayed next to a buffer row.
///
/// Annotations live in the host's display layer under this crate's
/// namespace; they never modify buffer text and are removable in bulk via
/// [`Host::clear_annotations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// 0-based buffer row the annotation is attached to.
    pub row: usize,
    pub text: String,
    /// Host highlight-group name used to display the text.
    pub highlight: String,
}

/// Errors from host calls that touched a stale handle.
///
/// These are always non-fatal to the controller: the affected entity is
/// skipped and the next notification naturally reattempts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("{0} no longer exists")]
    BufferGone(BufferId),

    #[error("{0} no longer exists")]
    WindowGone(WindowId),
}

/// Backend-agnostic host capability surface.
///
/// All methods take plain handles; a handle may go stale at any point, which
/// fallible methods report as [`HostError`] and queries report as `false` or
/// an empty list.
pub trait Host {
    /// Whether `buffer` is still a live handle.
    fn buffer_exists(&self, buffer: BufferId) -> bool;

    /// Total line count of `buffer`.
    fn line_count(&self, buffer: BufferId) -> Result<usize, HostError>;

    /// Windows currently displaying `buffer`. Empty when the buffer is
    /// hidden or gone.
    fn windows_showing(&self, buffer: BufferId) -> Vec<WindowId>;

    /// Whether `window` is still a live handle.
    fn window_exists(&self, window: WindowId) -> bool;

    /// 1-based cursor line of `window`.
    fn cursor_line(&self, window: WindowId) -> Result<usize, HostError>;

    /// Move the cursor of `window` to 1-based `line`, column 0.
    fn set_cursor(&mut self, window: WindowId, line: usize) -> Result<(), HostError>;

    /// Scroll `window` so its cursor line becomes the bottom-most visible
    /// line.
    fn scroll_cursor_to_bottom(&mut self, window: WindowId) -> Result<(), HostError>;

    /// Place `annotation` on `buffer` under this crate's namespace.
    fn annotate(&mut self, buffer: BufferId, annotation: Annotation) -> Result<(), HostError>;

    /// Remove every annotation this crate placed on `buffer`.
    fn clear_annotations(&mut self, buffer: BufferId);

    /// Start delivering [`LinesChanged`] events for `buffer`. Returns `false`
    /// when the buffer is gone; the subscription must be installed at most
    /// once per buffer, which the controller guards on its side.
    fn watch_lines(&mut self, buffer: BufferId) -> bool;

    /// Request a single callback (via
    /// [`crate::FollowController::buffer_shown`]) the next time `buffer`
    /// becomes visible in a window.
    fn notify_when_shown(&mut self, buffer: BufferId);

    /// Run `task` after the current update batch settles.
    fn defer(&mut self, task: Deferred);

    /// Run `task` after `delay`.
    fn defer_after(&mut self, delay: Duration, task: Deferred);
}

//! Follow-mode controller for line-oriented buffer hosts.
//!
//! `tailview` makes a text buffer behave like a continuously growing log
//! view: when new lines are appended, every window displaying that buffer is
//! scrolled to reveal them — but only if the window's cursor was already near
//! the bottom, so a reader who scrolled back through history is left alone.
//! Newly appended lines can optionally receive a non-destructive timestamp
//! annotation.
//!
//! The embedding host (an editor core, a TUI pane manager) owns buffers,
//! windows, cursors, annotations, and the event loop. This crate owns only
//! the per-buffer flags and the decision logic, and reaches the host through
//! the [`Host`] trait. Deferred work is handed back to the host as a plain
//! [`Deferred`] payload and re-enters through
//! [`FollowController::run_deferred`], keeping ordering explicit and the
//! whole controller testable against an in-memory host.

pub mod config;
pub mod follow;
pub mod host;
pub mod logging;
pub mod timestamp;

pub use config::{ConfigError, ConfigStore, FollowConfig};
pub use follow::FollowController;
pub use host::{Annotation, BufferId, Deferred, Host, HostError, LinesChanged, WindowId};
pub use timestamp::TimestampOptions;

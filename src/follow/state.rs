//! Per-buffer follow state.

use std::collections::HashMap;

use crate::host::BufferId;

/// Flags tracked for one buffer. Dropped when the host reports the buffer
/// closed; nothing here survives the buffer's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BufferState {
    /// Appended lines trigger auto-scroll.
    pub follow: bool,
    /// `None` until the user — or the config default at first follow-enable —
    /// makes an explicit choice. The config default must never override an
    /// explicit `Some(false)`.
    pub timestamps: Option<bool>,
    /// One-shot guard: the host line-change subscription is installed at most
    /// once per buffer.
    pub attached: bool,
    /// A "jump to end" was requested while no window showed the buffer;
    /// applied the first time a window displays it.
    pub pending_jump: bool,
}

impl BufferState {
    pub fn timestamps_on(&self) -> bool {
        self.timestamps == Some(true)
    }
}

/// Registry of per-buffer state, keyed by host buffer handle.
///
/// An explicit map owned by the controller, not ambient host-attached
/// storage: lifecycle is driven by the host's registered/closed callbacks.
#[derive(Debug, Default)]
pub(crate) struct BufferRegistry {
    entries: HashMap<BufferId, BufferState>,
}

impl BufferRegistry {
    pub fn entry(&mut self, buffer: BufferId) -> &mut BufferState {
        self.entries.entry(buffer).or_default()
    }

    pub fn get(&self, buffer: BufferId) -> Option<&BufferState> {
        self.entries.get(&buffer)
    }

    pub fn get_mut(&mut self, buffer: BufferId) -> Option<&mut BufferState> {
        self.entries.get_mut(&buffer)
    }

    pub fn remove(&mut self, buffer: BufferId) {
        self.entries.remove(&buffer);
    }
}

//! In-memory host for exercising the follow controller.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use tailview::{
    Annotation, BufferId, Deferred, FollowController, Host, HostError, LinesChanged, WindowId,
};

#[derive(Debug, Default)]
struct MemoryBuffer {
    lines: Vec<String>,
    annotations: Vec<Annotation>,
    watch_calls: u32,
    show_requested: bool,
    /// Window listing as the host would report it. Deliberately left stale
    /// when a window is closed, so tests exercise the controller's
    /// revalidation of listed handles.
    windows: Vec<WindowId>,
}

#[derive(Debug)]
struct MemoryWindow {
    buffer: BufferId,
    /// 1-based, like an editor's cursor.
    cursor_line: usize,
    /// Whether the last cursor operation was a scroll-to-bottom.
    bottomed: bool,
}

/// In-memory [`Host`] with explicit queues for deferred work, so tests
/// single-step the event loop by hand.
#[derive(Debug, Default)]
pub struct MemoryHost {
    buffers: HashMap<BufferId, MemoryBuffer>,
    windows: HashMap<WindowId, MemoryWindow>,
    next_id: u64,
    deferred: Vec<Deferred>,
    delayed: Vec<(Duration, Deferred)>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_buffer(&mut self, lines: &[&str]) -> BufferId {
        self.next_id += 1;
        let id = BufferId(self.next_id);
        self.buffers.insert(
            id,
            MemoryBuffer {
                lines: lines.iter().map(ToString::to_string).collect(),
                ..MemoryBuffer::default()
            },
        );
        id
    }

    /// Open a window on `buffer` with the cursor on line 1.
    pub fn open_window(&mut self, buffer: BufferId) -> WindowId {
        self.next_id += 1;
        let id = WindowId(self.next_id);
        self.windows.insert(
            id,
            MemoryWindow {
                buffer,
                cursor_line: 1,
                bottomed: false,
            },
        );
        self.buffers
            .get_mut(&buffer)
            .expect("open_window on unknown buffer")
            .windows
            .push(id);
        id
    }

    /// Drop the window handle but keep it listed on its buffer, the way a
    /// host can report a window that died mid-iteration.
    pub fn close_window(&mut self, window: WindowId) {
        self.windows.remove(&window);
    }

    pub fn close_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
    }

    pub fn place_cursor(&mut self, window: WindowId, line: usize) {
        let win = self.windows.get_mut(&window).expect("unknown window");
        win.cursor_line = line;
        win.bottomed = false;
    }

    pub fn cursor_of(&self, window: WindowId) -> usize {
        self.windows[&window].cursor_line
    }

    pub fn is_bottomed(&self, window: WindowId) -> bool {
        self.windows[&window].bottomed
    }

    /// Append lines and return the change event the host would emit.
    pub fn append_lines(&mut self, buffer: BufferId, lines: &[&str]) -> LinesChanged {
        let buf = self.buffers.get_mut(&buffer).expect("unknown buffer");
        let old = buf.lines.len();
        buf.lines.extend(lines.iter().map(ToString::to_string));
        LinesChanged {
            buffer,
            first: old,
            old_end: old,
            new_end: buf.lines.len(),
        }
    }

    /// Remove the last `count` lines and return the change event.
    pub fn remove_last_lines(&mut self, buffer: BufferId, count: usize) -> LinesChanged {
        let buf = self.buffers.get_mut(&buffer).expect("unknown buffer");
        let old = buf.lines.len();
        let new = old.saturating_sub(count);
        buf.lines.truncate(new);
        LinesChanged {
            buffer,
            first: new,
            old_end: old,
            new_end: new,
        }
    }

    pub fn annotations(&self, buffer: BufferId) -> &[Annotation] {
        &self.buffers[&buffer].annotations
    }

    pub fn watch_calls(&self, buffer: BufferId) -> u32 {
        self.buffers[&buffer].watch_calls
    }

    pub fn show_requested(&self, buffer: BufferId) -> bool {
        self.buffers[&buffer].show_requested
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn delayed_len(&self) -> usize {
        self.delayed.len()
    }

    pub fn drain_deferred(&mut self) -> Vec<Deferred> {
        std::mem::take(&mut self.deferred)
    }

    pub fn drain_delayed(&mut self) -> Vec<(Duration, Deferred)> {
        std::mem::take(&mut self.delayed)
    }
}

/// Run everything deferred to "after the current update batch", including
/// tasks those runs schedule in turn.
pub fn run_batch(controller: &mut FollowController, host: &mut MemoryHost) {
    loop {
        let tasks = host.drain_deferred();
        if tasks.is_empty() {
            break;
        }
        for task in tasks {
            controller.run_deferred(host, task);
        }
    }
}

/// Fire every delay-scheduled task, as if all timers elapsed.
pub fn run_delayed(controller: &mut FollowController, host: &mut MemoryHost) {
    for (_, task) in host.drain_delayed() {
        controller.run_deferred(host, task);
    }
}

/// Drain both queues until nothing is pending.
pub fn settle(controller: &mut FollowController, host: &mut MemoryHost) {
    run_batch(controller, host);
    run_delayed(controller, host);
    run_batch(controller, host);
}

impl Host for MemoryHost {
    fn buffer_exists(&self, buffer: BufferId) -> bool {
        self.buffers.contains_key(&buffer)
    }

    fn line_count(&self, buffer: BufferId) -> Result<usize, HostError> {
        self.buffers
            .get(&buffer)
            .map(|buf| buf.lines.len())
            .ok_or(HostError::BufferGone(buffer))
    }

    fn windows_showing(&self, buffer: BufferId) -> Vec<WindowId> {
        self.buffers
            .get(&buffer)
            .map(|buf| buf.windows.clone())
            .unwrap_or_default()
    }

    fn window_exists(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    fn cursor_line(&self, window: WindowId) -> Result<usize, HostError> {
        self.windows
            .get(&window)
            .map(|win| win.cursor_line)
            .ok_or(HostError::WindowGone(window))
    }

    fn set_cursor(&mut self, window: WindowId, line: usize) -> Result<(), HostError> {
        let win = self
            .windows
            .get_mut(&window)
            .ok_or(HostError::WindowGone(window))?;
        win.cursor_line = line;
        Ok(())
    }

    fn scroll_cursor_to_bottom(&mut self, window: WindowId) -> Result<(), HostError> {
        let win = self
            .windows
            .get_mut(&window)
            .ok_or(HostError::WindowGone(window))?;
        win.bottomed = true;
        Ok(())
    }

    fn annotate(&mut self, buffer: BufferId, annotation: Annotation) -> Result<(), HostError> {
        let buf = self
            .buffers
            .get_mut(&buffer)
            .ok_or(HostError::BufferGone(buffer))?;
        buf.annotations.push(annotation);
        Ok(())
    }

    fn clear_annotations(&mut self, buffer: BufferId) {
        if let Some(buf) = self.buffers.get_mut(&buffer) {
            buf.annotations.clear();
        }
    }

    fn watch_lines(&mut self, buffer: BufferId) -> bool {
        match self.buffers.get_mut(&buffer) {
            Some(buf) => {
                buf.watch_calls += 1;
                true
            }
            None => false,
        }
    }

    fn notify_when_shown(&mut self, buffer: BufferId) {
        if let Some(buf) = self.buffers.get_mut(&buffer) {
            buf.show_requested = true;
        }
    }

    fn defer(&mut self, task: Deferred) {
        self.deferred.push(task);
    }

    fn defer_after(&mut self, delay: Duration, task: Deferred) {
        self.delayed.push((delay, task));
    }
}

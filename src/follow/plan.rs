//! Pure scroll-decision logic.
//!
//! Kept free of host calls so the carry predicate unit-tests against plain
//! numbers, the same way the UI reducers elsewhere in this crate's lineage
//! are pure functions over state snapshots.

/// Whether a window whose cursor sits on 1-based `cursor_line` should be
/// carried to the end of a buffer whose post-edit line count is `last_line`,
/// of which the final `inserted` rows just arrived.
///
/// "Near bottom" measures distance from the tail as it was before the new
/// rows landed: a reader parked within `threshold` lines of the old end is
/// carried forward, anyone higher up is reading history and is left alone.
/// A cursor already on the last line trivially satisfies the inequality, so
/// the at-end case needs no separate check.
pub(crate) fn should_carry(
    cursor_line: usize,
    last_line: usize,
    inserted: usize,
    threshold: usize,
) -> bool {
    cursor_line + threshold >= last_line.saturating_sub(inserted)
}

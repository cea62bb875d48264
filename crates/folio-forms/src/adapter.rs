//! The host-table boundary.
//!
//! Folio does not render cells itself; it drives a host table (a platform
//! table view, a TUI list, a test double) through the [`TableHost`] trait.
//! All coordinates crossing this boundary are in *visible* space: index 0 is
//! the first visible section or row, hidden entries do not count.
//!
//! One update cycle produces at most one `begin_updates`/`end_updates`
//! transaction. Within it, removals are always issued before insertions, and
//! removal indices refer to the pre-transaction layout while insertion
//! indices refer to the post-transaction layout. This is the contract batch
//! table APIs share, and the reconciler depends on it.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// A (section, row) coordinate in visible space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowPath {
    /// Index into the visible section sequence.
    pub section: usize,
    /// Index into the section's visible row sequence.
    pub row: usize,
}

impl RowPath {
    /// Construct a path from visible indices.
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for RowPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}.{}]", self.section, self.row)
    }
}

/// How the host should animate a structural edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditAnimation {
    /// Cross-fade inserted and removed entries.
    #[default]
    Fade,
    /// Apply the edit without animation.
    None,
}

/// The surface a host table implements to receive structural edits.
///
/// Implementations may assume calls arrive in the transaction order
/// described in the module docs and that every index is valid for the
/// layout the call refers to.
pub trait TableHost: Send {
    /// Open an edit transaction.
    fn begin_updates(&mut self);

    /// Insert sections at the given post-transaction indices.
    fn insert_sections(&mut self, indices: &[usize], animation: EditAnimation);

    /// Remove sections at the given pre-transaction indices.
    fn delete_sections(&mut self, indices: &[usize], animation: EditAnimation);

    /// Insert rows at the given post-transaction paths.
    fn insert_rows(&mut self, paths: &[RowPath], animation: EditAnimation);

    /// Remove rows at the given pre-transaction paths.
    fn delete_rows(&mut self, paths: &[RowPath], animation: EditAnimation);

    /// Replace the footer text of a section that stays visible.
    fn refresh_footer(&mut self, section: usize, footer: Option<&str>);

    /// Close the transaction, applying all queued edits atomically.
    fn end_updates(&mut self);
}

/// One call recorded by a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEdit {
    Begin,
    InsertSections(Vec<usize>),
    DeleteSections(Vec<usize>),
    InsertRows(Vec<RowPath>),
    DeleteRows(Vec<RowPath>),
    RefreshFooter(usize, Option<String>),
    End,
}

/// A [`TableHost`] that records every call it receives, for tests.
#[derive(Default, Clone)]
pub struct RecordingHost {
    edits: Arc<Mutex<Vec<HostEdit>>>,
}

impl RecordingHost {
    /// Create an empty recording host.
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls received so far, in order.
    pub fn log(&self) -> Vec<HostEdit> {
        self.edits.lock().clone()
    }

    /// Forget all recorded calls.
    pub fn clear(&self) {
        self.edits.lock().clear();
    }
}

impl TableHost for RecordingHost {
    fn begin_updates(&mut self) {
        self.edits.lock().push(HostEdit::Begin);
    }

    fn insert_sections(&mut self, indices: &[usize], _animation: EditAnimation) {
        self.edits.lock().push(HostEdit::InsertSections(indices.to_vec()));
    }

    fn delete_sections(&mut self, indices: &[usize], _animation: EditAnimation) {
        self.edits.lock().push(HostEdit::DeleteSections(indices.to_vec()));
    }

    fn insert_rows(&mut self, paths: &[RowPath], _animation: EditAnimation) {
        self.edits.lock().push(HostEdit::InsertRows(paths.to_vec()));
    }

    fn delete_rows(&mut self, paths: &[RowPath], _animation: EditAnimation) {
        self.edits.lock().push(HostEdit::DeleteRows(paths.to_vec()));
    }

    fn refresh_footer(&mut self, section: usize, footer: Option<&str>) {
        self.edits
            .lock()
            .push(HostEdit::RefreshFooter(section, footer.map(str::to_owned)));
    }

    fn end_updates(&mut self) {
        self.edits.lock().push(HostEdit::End);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_path_display() {
        assert_eq!(RowPath::new(2, 5).to_string(), "[2.5]");
    }

    #[test]
    fn test_recording_host_preserves_order() {
        let host = RecordingHost::new();
        {
            let mut h: Box<dyn TableHost> = Box::new(host.clone());
            h.begin_updates();
            h.delete_rows(&[RowPath::new(0, 1)], EditAnimation::Fade);
            h.insert_sections(&[2], EditAnimation::Fade);
            h.end_updates();
        }
        assert_eq!(
            host.log(),
            vec![
                HostEdit::Begin,
                HostEdit::DeleteRows(vec![RowPath::new(0, 1)]),
                HostEdit::InsertSections(vec![2]),
                HostEdit::End,
            ]
        );
    }

    #[test]
    fn test_recording_host_clear() {
        let host = RecordingHost::new();
        let mut h = host.clone();
        h.begin_updates();
        h.end_updates();
        host.clear();
        assert!(host.log().is_empty());
    }
}

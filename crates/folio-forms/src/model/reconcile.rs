//! Visibility reconciliation.
//!
//! The reconciler compares the previously-visible snapshot of each level
//! against the current flags and emits index-based insert/remove edits for
//! the host table, then commits the current state as the new snapshot. One
//! pass over each level suffices because entries never reorder: an entry is
//! either in both sequences, newly visible, or newly hidden.
//!
//! Edit coordinates follow the batch-transaction contract in
//! [`adapter`](crate::adapter): removals carry pre-transaction indices,
//! insertions carry post-transaction indices. Row edits inside a section
//! that is itself appearing or disappearing are folded into the section
//! edit and never forwarded separately.

use tracing::debug;

use folio_core::logging::targets;

use super::entity::SectionId;
use super::store::FormModel;
use crate::adapter::{EditAnimation, RowPath, TableHost};

/// One structural edit at a single level of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEdit {
    /// The entry became visible; `index` is its position in the *new*
    /// visible sequence.
    Insert { index: usize },
    /// The entry became hidden; `index` is its position in the *old*
    /// visible sequence.
    Remove { index: usize },
}

/// Diff two visible subsequences of a fixed ordering.
///
/// `all` is the full construction-order sequence; `previous` and `current`
/// must be subsequences of it. Walking `all` once, each entry falls into one
/// of four cases by membership in the two subsequences, and the two index
/// counters advance exactly when the entry occupies a slot in the
/// corresponding sequence.
pub fn diff_visibility<K: Eq + Copy>(all: &[K], previous: &[K], current: &[K]) -> Vec<LevelEdit> {
    let mut edits = Vec::new();
    let mut old_index = 0usize;
    let mut new_index = 0usize;
    for entry in all {
        let was_visible = previous.get(old_index) == Some(entry);
        let is_visible = current.get(new_index) == Some(entry);
        match (was_visible, is_visible) {
            (true, true) => {
                old_index += 1;
                new_index += 1;
            }
            (false, true) => {
                edits.push(LevelEdit::Insert { index: new_index });
                new_index += 1;
            }
            (true, false) => {
                edits.push(LevelEdit::Remove { index: old_index });
                old_index += 1;
            }
            (false, false) => {}
        }
    }
    edits
}

/// All structural edits produced by one reconciliation pass.
///
/// Applied to a host as a single begin/end transaction via
/// [`apply`](EditBatch::apply).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditBatch {
    /// Post-transaction indices of sections that became visible.
    pub section_inserts: Vec<usize>,
    /// Pre-transaction indices of sections that became hidden.
    pub section_removes: Vec<usize>,
    /// Post-transaction paths of rows that became visible.
    pub row_inserts: Vec<RowPath>,
    /// Pre-transaction paths of rows that became hidden.
    pub row_removes: Vec<RowPath>,
    /// Footer text for sections visible both before and after the pass.
    pub footer_refreshes: Vec<(usize, Option<String>)>,
}

impl EditBatch {
    /// Returns `true` if the pass changed nothing the host can see.
    ///
    /// Footer refreshes are always re-sent, so they do not count as edits.
    pub fn is_empty(&self) -> bool {
        self.section_inserts.is_empty()
            && self.section_removes.is_empty()
            && self.row_inserts.is_empty()
            && self.row_removes.is_empty()
    }

    /// Forward the batch to a host as one transaction.
    ///
    /// Removals go out before insertions, per the host contract. Calls with
    /// nothing to say are skipped entirely.
    pub fn apply(&self, host: &mut dyn TableHost, animation: EditAnimation) {
        host.begin_updates();
        if !self.section_removes.is_empty() {
            host.delete_sections(&self.section_removes, animation);
        }
        if !self.row_removes.is_empty() {
            host.delete_rows(&self.row_removes, animation);
        }
        if !self.section_inserts.is_empty() {
            host.insert_sections(&self.section_inserts, animation);
        }
        if !self.row_inserts.is_empty() {
            host.insert_rows(&self.row_inserts, animation);
        }
        for (section, footer) in &self.footer_refreshes {
            host.refresh_footer(*section, footer.as_deref());
        }
        host.end_updates();
    }
}

impl FormModel {
    /// Diff every level against its snapshot, commit the new snapshots, and
    /// return the edits the host table needs.
    ///
    /// Snapshots are committed unconditionally, including for sections the
    /// host cannot currently see, so a section that disappears and later
    /// reappears comes back with its row layout already up to date.
    pub fn reconcile(&self) -> EditBatch {
        let batch = self.with_inner(|inner| {
            let mut batch = EditBatch::default();

            let order = inner.order().to_vec();
            let old_sections = inner.previously_visible_sections().to_vec();
            let new_sections = inner.current_visible_sections();

            for edit in diff_visibility(&order, &old_sections, &new_sections) {
                match edit {
                    LevelEdit::Insert { index } => batch.section_inserts.push(index),
                    LevelEdit::Remove { index } => batch.section_removes.push(index),
                }
            }

            // Row diffs run for every section so snapshots stay current,
            // but only sections visible on both sides of the pass forward
            // their row edits; the rest are covered by the section edit.
            for &section in &order {
                let rows = inner.section_rows(section).to_vec();
                let old_rows = inner.previously_visible_rows(section).to_vec();
                let new_rows = inner.current_visible_rows(section);
                let row_edits = diff_visibility(&rows, &old_rows, &new_rows);

                let old_pos = position_of(&old_sections, section);
                let new_pos = position_of(&new_sections, section);
                if let (Some(old_section_index), Some(new_section_index)) = (old_pos, new_pos) {
                    for edit in row_edits {
                        match edit {
                            LevelEdit::Insert { index } => batch
                                .row_inserts
                                .push(RowPath::new(new_section_index, index)),
                            LevelEdit::Remove { index } => batch
                                .row_removes
                                .push(RowPath::new(old_section_index, index)),
                        }
                    }
                    batch
                        .footer_refreshes
                        .push((new_section_index, inner.footer(section)));
                }

                inner.commit_row_snapshot(section, new_rows);
            }

            inner.commit_section_snapshot(new_sections);
            batch
        });

        debug!(
            target: targets::RECONCILE,
            section_inserts = batch.section_inserts.len(),
            section_removes = batch.section_removes.len(),
            row_inserts = batch.row_inserts.len(),
            row_removes = batch.row_removes.len(),
            "reconciled"
        );
        batch
    }
}

fn position_of(sections: &[SectionId], section: SectionId) -> Option<usize> {
    sections.iter().position(|&id| id == section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{HostEdit, RecordingHost};

    #[test]
    fn test_diff_no_change() {
        let all = [1, 2, 3];
        assert!(diff_visibility(&all, &all, &all).is_empty());
    }

    #[test]
    fn test_diff_single_insert_uses_new_index() {
        // 2 appears between 1 and 3; its new-sequence index is 1.
        let all = [1, 2, 3];
        let edits = diff_visibility(&all, &[1, 3], &[1, 2, 3]);
        assert_eq!(edits, vec![LevelEdit::Insert { index: 1 }]);
    }

    #[test]
    fn test_diff_single_remove_uses_old_index() {
        let all = [1, 2, 3];
        let edits = diff_visibility(&all, &[1, 2, 3], &[1, 3]);
        assert_eq!(edits, vec![LevelEdit::Remove { index: 1 }]);
    }

    #[test]
    fn test_diff_swap_visibility() {
        // 1 hides while 2 shows; both indices are 0 in their own sequences
        // and the batch transaction keeps them from clashing.
        let all = [1, 2];
        let edits = diff_visibility(&all, &[1], &[2]);
        assert_eq!(
            edits,
            vec![
                LevelEdit::Insert { index: 0 },
                LevelEdit::Remove { index: 0 },
            ]
        );
    }

    #[test]
    fn test_diff_everything_hidden_and_back() {
        let all = [1, 2];
        let gone = diff_visibility(&all, &[1, 2], &[]);
        assert_eq!(
            gone,
            vec![
                LevelEdit::Remove { index: 0 },
                LevelEdit::Remove { index: 1 },
            ]
        );
        let back = diff_visibility(&all, &[], &[1, 2]);
        assert_eq!(
            back,
            vec![
                LevelEdit::Insert { index: 0 },
                LevelEdit::Insert { index: 1 },
            ]
        );
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let model = FormModel::new();
        let r0 = model.add_row();
        let s0 = model.add_section(vec![r0]);
        model.prime();
        model.set_section_visible(s0, false);
        assert!(!model.reconcile().is_empty());
        assert!(model.reconcile().is_empty());
    }

    #[test]
    fn test_row_insert_uses_current_section_index() {
        // Hiding section 0 and showing a row in section 1 in the same pass:
        // the row insert must address section 1 at its new index 0.
        let model = FormModel::new();
        let r0 = model.add_row();
        let r1 = model.add_row();
        let r2 = model.add_row();
        let s0 = model.add_section(vec![r0]);
        let _s1 = model.add_section(vec![r1, r2]);
        model.set_row_visible(r2, false);
        model.prime();

        model.set_section_visible(s0, false);
        model.set_row_visible(r2, true);
        let batch = model.reconcile();
        assert_eq!(batch.section_removes, vec![0]);
        assert_eq!(batch.row_inserts, vec![RowPath::new(0, 1)]);
    }

    #[test]
    fn test_row_remove_uses_previous_section_index() {
        // Showing section 0 and hiding a row in section 1 in the same pass:
        // the row remove must address section 1 at its old index 0.
        let model = FormModel::new();
        let r0 = model.add_row();
        let r1 = model.add_row();
        let r2 = model.add_row();
        let s0 = model.add_section(vec![r0]);
        let _s1 = model.add_section(vec![r1, r2]);
        model.set_section_visible(s0, false);
        model.prime();

        model.set_section_visible(s0, true);
        model.set_row_visible(r2, false);
        let batch = model.reconcile();
        assert_eq!(batch.section_inserts, vec![0]);
        assert_eq!(batch.row_removes, vec![RowPath::new(0, 1)]);
    }

    #[test]
    fn test_row_edits_suppressed_for_appearing_section() {
        // The section insert already carries its rows; no separate row edit.
        let model = FormModel::new();
        let r0 = model.add_row();
        let s0 = model.add_section(vec![r0]);
        model.set_section_visible(s0, false);
        model.set_row_visible(r0, false);
        model.prime();

        model.set_section_visible(s0, true);
        model.set_row_visible(r0, true);
        let batch = model.reconcile();
        assert_eq!(batch.section_inserts, vec![0]);
        assert!(batch.row_inserts.is_empty());
    }

    #[test]
    fn test_hidden_section_snapshot_still_commits() {
        // Row flags flipped while the section is hidden must not replay as
        // edits when the section reappears.
        let model = FormModel::new();
        let r0 = model.add_row();
        let r1 = model.add_row();
        let s0 = model.add_section(vec![r0, r1]);
        model.prime();

        model.set_section_visible(s0, false);
        model.reconcile();
        model.set_row_visible(r1, false);
        model.reconcile();

        model.set_section_visible(s0, true);
        let batch = model.reconcile();
        assert_eq!(batch.section_inserts, vec![0]);
        assert!(batch.row_removes.is_empty());
        assert_eq!(model.visible_row_count(0), 1);
    }

    #[test]
    fn test_apply_orders_removes_before_inserts() {
        let model = FormModel::new();
        let r0 = model.add_row();
        let r1 = model.add_row();
        let s0 = model.add_section(vec![r0]);
        let s1 = model.add_section(vec![r1]);
        model.set_section_visible(s1, false);
        model.prime();

        model.set_section_visible(s0, false);
        model.set_section_visible(s1, true);
        let batch = model.reconcile();

        let host = RecordingHost::new();
        batch.apply(&mut host.clone(), EditAnimation::None);
        assert_eq!(
            host.log(),
            vec![
                HostEdit::Begin,
                HostEdit::DeleteSections(vec![0]),
                HostEdit::InsertSections(vec![0]),
                HostEdit::End,
            ]
        );
    }

    #[test]
    fn test_apply_skips_empty_edit_calls() {
        let batch = EditBatch::default();
        let host = RecordingHost::new();
        batch.apply(&mut host.clone(), EditAnimation::Fade);
        assert_eq!(host.log(), vec![HostEdit::Begin, HostEdit::End]);
    }
}

//! The form model store.

use parking_lot::RwLock;
use slotmap::SlotMap;
use tracing::trace;

use folio_core::logging::targets;

use super::entity::{Row, RowId, Section, SectionId, SelectHandler};
use crate::adapter::RowPath;

struct ModelInner {
    sections: SlotMap<SectionId, Section>,
    rows: SlotMap<RowId, Row>,
    /// Section construction order, fixed once building is done.
    order: Vec<SectionId>,
    /// The visible-section sequence captured at the end of the last
    /// reconciliation pass.
    previously_visible: Vec<SectionId>,
}

/// The form model: section/row tree, visibility flags, and the memoized
/// previous-visible snapshots the reconciler diffs against.
///
/// All methods take `&self`; the model guards its state internally so that
/// binding closures holding an `Arc<FormModel>` can flip flags during an
/// update pass. Handle-taking methods panic on handles from a different
/// model, which is always a construction bug.
pub struct FormModel {
    inner: RwLock<ModelInner>,
}

impl FormModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ModelInner {
                sections: SlotMap::with_key(),
                rows: SlotMap::with_key(),
                order: Vec::new(),
                previously_visible: Vec::new(),
            }),
        }
    }

    // =============================================================
    // Construction
    // =============================================================

    /// Allocate a new row, initially visible and unattached.
    pub fn add_row(&self) -> RowId {
        self.inner.write().rows.insert(Row::new())
    }

    /// Attach rows to a new section, appended after all existing sections.
    ///
    /// The row order given here is the section's fixed display order.
    ///
    /// # Panics
    ///
    /// Panics if a row handle is unknown to this model or already attached
    /// to another section.
    pub fn add_section(&self, rows: Vec<RowId>) -> SectionId {
        let mut inner = self.inner.write();
        for &row in &rows {
            let row = inner
                .rows
                .get_mut(row)
                .unwrap_or_else(|| panic!("unknown row handle {row:?}"));
            assert!(!row.attached, "row is already attached to a section");
            row.attached = true;
        }
        let id = inner.sections.insert(Section::new(rows));
        inner.order.push(id);
        inner.previously_visible.push(id);
        id
    }

    // =============================================================
    // Flag writes (the binding pass calls these)
    // =============================================================

    /// Set a row's visibility flag.
    ///
    /// This only updates the flag; the host table learns about it on the
    /// next [`reconcile`](Self::reconcile).
    pub fn set_row_visible(&self, id: RowId, visible: bool) {
        let mut inner = self.inner.write();
        let row = &mut inner.rows[id];
        if row.visible != visible {
            trace!(target: targets::MODEL, ?id, visible, "row visibility changed");
        }
        row.visible = visible;
    }

    /// Set a section's visibility flag.
    pub fn set_section_visible(&self, id: SectionId, visible: bool) {
        let mut inner = self.inner.write();
        let section = &mut inner.sections[id];
        if section.visible != visible {
            trace!(target: targets::MODEL, ?id, visible, "section visibility changed");
        }
        section.visible = visible;
    }

    /// Set whether selecting a row shows highlight feedback.
    pub fn set_row_highlight(&self, id: RowId, highlight: bool) {
        self.inner.write().rows[id].should_highlight = highlight;
    }

    /// Install (or clear) a row's selection callback.
    pub fn set_row_on_select(&self, id: RowId, handler: Option<SelectHandler>) {
        self.inner.write().rows[id].on_select = handler;
    }

    /// Set a section's footer text.
    pub fn set_footer(&self, id: SectionId, footer: Option<String>) {
        self.inner.write().sections[id].footer = footer;
    }

    // =============================================================
    // Visible-space queries (what the host table asks)
    // =============================================================

    /// Visible sections, in construction order.
    pub fn visible_sections(&self) -> Vec<SectionId> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .copied()
            .filter(|&id| inner.sections[id].visible)
            .collect()
    }

    /// Visible rows of a section, in construction order.
    pub fn visible_rows(&self, section: SectionId) -> Vec<RowId> {
        let inner = self.inner.read();
        inner.sections[section]
            .rows
            .iter()
            .copied()
            .filter(|&id| inner.rows[id].visible)
            .collect()
    }

    /// Number of visible sections.
    pub fn visible_section_count(&self) -> usize {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter(|&&id| inner.sections[id].visible)
            .count()
    }

    /// Number of visible rows in the visible section at `section_index`.
    ///
    /// # Panics
    ///
    /// Panics if `section_index` is out of visible range.
    pub fn visible_row_count(&self, section_index: usize) -> usize {
        let section = self.visible_sections()[section_index];
        self.visible_rows(section).len()
    }

    /// Resolve a visible-space path to the row handle it addresses.
    ///
    /// # Panics
    ///
    /// Panics if the path is out of visible range.
    pub fn row_at(&self, path: RowPath) -> RowId {
        let section = self.visible_sections()[path.section];
        self.visible_rows(section)[path.row]
    }

    /// Footer text of the visible section at `section_index`.
    ///
    /// # Panics
    ///
    /// Panics if `section_index` is out of visible range.
    pub fn footer_title(&self, section_index: usize) -> Option<String> {
        let section = self.visible_sections()[section_index];
        self.inner.read().sections[section].footer.clone()
    }

    /// Whether the row at a visible-space path wants highlight feedback.
    pub fn should_highlight(&self, path: RowPath) -> bool {
        let row = self.row_at(path);
        self.inner.read().rows[row].should_highlight
    }

    /// Deliver a selection at a visible-space path.
    ///
    /// The handler runs outside the model lock, so it is free to mutate
    /// state and trigger a new update pass.
    pub fn select(&self, path: RowPath) {
        let row = self.row_at(path);
        let handler = self.inner.read().rows[row].on_select.clone();
        if let Some(handler) = handler {
            trace!(target: targets::MODEL, %path, "row selected");
            handler();
        }
    }

    // =============================================================
    // Snapshots
    // =============================================================

    /// Recapture every previous-visible snapshot from the current flags
    /// without emitting edits.
    ///
    /// Called once after the initial binding pass, so the first real
    /// reconciliation diffs against what the host table actually shows
    /// rather than the everything-visible construction state.
    pub fn prime(&self) {
        let mut inner = self.inner.write();
        inner.previously_visible = inner
            .order
            .iter()
            .copied()
            .filter(|&id| inner.sections[id].visible)
            .collect();
        let visible_rows: Vec<(SectionId, Vec<RowId>)> = inner
            .order
            .iter()
            .map(|&sid| {
                let rows = inner.sections[sid]
                    .rows
                    .iter()
                    .copied()
                    .filter(|&rid| inner.rows[rid].visible)
                    .collect();
                (sid, rows)
            })
            .collect();
        for (sid, rows) in visible_rows {
            inner.sections[sid].previously_visible = rows;
        }
    }

    // =============================================================
    // Introspection (used by the reconciler and tests)
    // =============================================================

    /// All sections in construction order, visible or not.
    pub fn section_order(&self) -> Vec<SectionId> {
        self.inner.read().order.clone()
    }

    /// All rows of a section in construction order, visible or not.
    pub fn rows_of(&self, section: SectionId) -> Vec<RowId> {
        self.inner.read().sections[section].rows.clone()
    }

    /// Current visibility flag of a row.
    pub fn is_row_visible(&self, id: RowId) -> bool {
        self.inner.read().rows[id].visible
    }

    /// Current visibility flag of a section.
    pub fn is_section_visible(&self, id: SectionId) -> bool {
        self.inner.read().sections[id].visible
    }

    pub(crate) fn with_inner<R>(&self, f: impl FnOnce(&mut ModelInnerView<'_>) -> R) -> R {
        let mut inner = self.inner.write();
        f(&mut ModelInnerView { inner: &mut inner })
    }
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable view over the model internals, handed to the reconciler so it can
/// diff and commit snapshots under a single lock acquisition.
pub(crate) struct ModelInnerView<'a> {
    inner: &'a mut ModelInner,
}

impl ModelInnerView<'_> {
    pub fn order(&self) -> &[SectionId] {
        &self.inner.order
    }

    pub fn previously_visible_sections(&self) -> &[SectionId] {
        &self.inner.previously_visible
    }

    pub fn current_visible_sections(&self) -> Vec<SectionId> {
        self.inner
            .order
            .iter()
            .copied()
            .filter(|&id| self.inner.sections[id].visible)
            .collect()
    }

    pub fn section_rows(&self, id: SectionId) -> &[RowId] {
        &self.inner.sections[id].rows
    }

    pub fn previously_visible_rows(&self, id: SectionId) -> &[RowId] {
        &self.inner.sections[id].previously_visible
    }

    pub fn current_visible_rows(&self, id: SectionId) -> Vec<RowId> {
        self.inner.sections[id]
            .rows
            .iter()
            .copied()
            .filter(|&rid| self.inner.rows[rid].visible)
            .collect()
    }

    pub fn footer(&self, id: SectionId) -> Option<String> {
        self.inner.sections[id].footer.clone()
    }

    pub fn commit_section_snapshot(&mut self, visible: Vec<SectionId>) {
        self.inner.previously_visible = visible;
    }

    pub fn commit_row_snapshot(&mut self, id: SectionId, visible: Vec<RowId>) {
        self.inner.sections[id].previously_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_model_is_send_sync() {
        fn is_send_sync<T: Send + Sync>() {}
        is_send_sync::<FormModel>();
    }

    fn two_section_model() -> (FormModel, Vec<RowId>, Vec<SectionId>) {
        let model = FormModel::new();
        let r0 = model.add_row();
        let r1 = model.add_row();
        let r2 = model.add_row();
        let s0 = model.add_section(vec![r0, r1]);
        let s1 = model.add_section(vec![r2]);
        (model, vec![r0, r1, r2], vec![s0, s1])
    }

    #[test]
    fn test_everything_visible_at_construction() {
        let (model, _, _) = two_section_model();
        assert_eq!(model.visible_section_count(), 2);
        assert_eq!(model.visible_row_count(0), 2);
        assert_eq!(model.visible_row_count(1), 1);
    }

    #[test]
    fn test_hiding_row_compacts_visible_indices() {
        let (model, rows, sections) = two_section_model();
        model.set_row_visible(rows[0], false);
        assert_eq!(model.visible_row_count(0), 1);
        assert_eq!(model.row_at(RowPath::new(0, 0)), rows[1]);
        assert_eq!(model.visible_rows(sections[0]), vec![rows[1]]);
    }

    #[test]
    fn test_hiding_section_compacts_visible_indices() {
        let (model, rows, _) = two_section_model();
        let sections = model.section_order();
        model.set_section_visible(sections[0], false);
        assert_eq!(model.visible_section_count(), 1);
        // Section 1 is now the visible section 0.
        assert_eq!(model.row_at(RowPath::new(0, 0)), rows[2]);
    }

    #[test]
    fn test_hidden_section_rows_keep_their_flags() {
        let (model, rows, sections) = two_section_model();
        model.set_section_visible(sections[0], false);
        model.set_row_visible(rows[0], false);
        assert!(!model.is_row_visible(rows[0]));
        assert!(model.is_row_visible(rows[1]));
    }

    #[test]
    #[should_panic(expected = "already attached")]
    fn test_row_cannot_join_two_sections() {
        let model = FormModel::new();
        let row = model.add_row();
        model.add_section(vec![row]);
        model.add_section(vec![row]);
    }

    #[test]
    fn test_select_invokes_handler_outside_lock() {
        let (model, rows, _) = two_section_model();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = hits.clone();
        model.set_row_on_select(rows[2], Some(Arc::new(move || {
            hits2.fetch_add(1, Ordering::SeqCst);
        })));
        model.select(RowPath::new(1, 0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_select_without_handler_is_a_no_op() {
        let (model, _, _) = two_section_model();
        model.select(RowPath::new(0, 0));
    }

    #[test]
    fn test_handler_may_reenter_the_model() {
        // A selection handler flipping flags must not deadlock.
        let (model, rows, _) = two_section_model();
        let model = Arc::new(model);
        let model2 = model.clone();
        let hidden = rows[0];
        model.set_row_on_select(rows[2], Some(Arc::new(move || {
            model2.set_row_visible(hidden, false);
        })));
        model.select(RowPath::new(1, 0));
        assert!(!model.is_row_visible(rows[0]));
    }

    #[test]
    fn test_footer_title_in_visible_space() {
        let (model, _, sections) = two_section_model();
        model.set_footer(sections[1], Some("About".into()));
        model.set_section_visible(sections[0], false);
        assert_eq!(model.footer_title(0).as_deref(), Some("About"));
    }

    #[test]
    fn test_should_highlight() {
        let (model, rows, _) = two_section_model();
        assert!(!model.should_highlight(RowPath::new(0, 0)));
        model.set_row_highlight(rows[0], true);
        assert!(model.should_highlight(RowPath::new(0, 0)));
    }
}

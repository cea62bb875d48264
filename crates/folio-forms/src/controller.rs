//! The form controller: what a host table talks to.
//!
//! A [`FormController`] pairs one built form (its model plus cell widgets)
//! with an optional attached [`TableHost`]. The host asks it data-source
//! questions in visible space (counts, cells, footers, highlight) and
//! forwards selections to it; the driver asks it to reconcile after each
//! update pass, which pushes structural edits out to the host if one is
//! attached.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use folio_core::logging::targets;

use crate::adapter::{EditAnimation, RowPath, TableHost};
use crate::builder::SectionRef;
use crate::model::{FormModel, RowId};
use crate::widget::Cell;

/// A built form, ready to drive a host table.
pub struct FormController {
    model: Arc<FormModel>,
    sections: Vec<SectionRef>,
    cells: HashMap<RowId, Arc<Cell>>,
    title: String,
    host: Mutex<Option<Box<dyn TableHost>>>,
}

impl FormController {
    /// Wrap a built section tree and its model.
    pub fn new(title: impl Into<String>, model: Arc<FormModel>, sections: Vec<SectionRef>) -> Self {
        let mut cells = HashMap::new();
        for section in &sections {
            for cell in &section.cells {
                cells.insert(cell.id, cell.widget.clone());
            }
        }
        Self {
            model,
            sections,
            cells,
            title: title.into(),
            host: Mutex::new(None),
        }
    }

    /// The screen title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The model behind this form.
    pub fn model(&self) -> &Arc<FormModel> {
        &self.model
    }

    /// The built section tree, in construction order.
    pub fn sections(&self) -> &[SectionRef] {
        &self.sections
    }

    /// Attach the host table that should receive structural edits.
    ///
    /// Replaces any previously attached host. The host is expected to load
    /// its initial layout from the data-source queries right after
    /// attaching.
    pub fn attach_host(&self, host: Box<dyn TableHost>) {
        *self.host.lock() = Some(host);
    }

    /// Detach the current host, if any. Reconciliation keeps running
    /// against the model so a later host attaches to current state.
    pub fn detach_host(&self) -> Option<Box<dyn TableHost>> {
        self.host.lock().take()
    }

    // =============================================================
    // Data source (visible space)
    // =============================================================

    /// Number of visible sections.
    pub fn visible_section_count(&self) -> usize {
        self.model.visible_section_count()
    }

    /// Number of visible rows in the visible section at `section_index`.
    pub fn visible_row_count(&self, section_index: usize) -> usize {
        self.model.visible_row_count(section_index)
    }

    /// The cell widget at a visible-space path.
    ///
    /// # Panics
    ///
    /// Panics if the path is out of visible range.
    pub fn cell_at(&self, path: RowPath) -> Arc<Cell> {
        let row = self.model.row_at(path);
        self.cells[&row].clone()
    }

    /// Footer text of the visible section at `section_index`.
    pub fn footer_title(&self, section_index: usize) -> Option<String> {
        self.model.footer_title(section_index)
    }

    /// Whether the row at a visible-space path wants highlight feedback.
    pub fn should_highlight(&self, path: RowPath) -> bool {
        self.model.should_highlight(path)
    }

    /// Deliver a selection from the host table.
    pub fn select(&self, path: RowPath) {
        self.model.select(path);
    }

    // =============================================================
    // Reconciliation
    // =============================================================

    /// Diff the model against its snapshots and forward the edits to the
    /// attached host, if any.
    pub fn reconcile(&self) {
        let batch = self.model.reconcile();
        let mut host = self.host.lock();
        if let Some(host) = host.as_deref_mut() {
            batch.apply(host, EditAnimation::Fade);
        } else if !batch.is_empty() {
            debug!(
                target: targets::RECONCILE,
                title = %self.title,
                "no host attached, edits dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{HostEdit, RecordingHost};
    use crate::builder::CellRef;

    fn single_cell_controller() -> (FormController, RowId) {
        let model = Arc::new(FormModel::new());
        let row = model.add_row();
        let cell = Cell::new("Enabled");
        let section = model.add_section(vec![row]);
        model.prime();
        let sections = vec![SectionRef {
            id: section,
            cells: vec![CellRef {
                id: row,
                widget: cell,
            }],
        }];
        (FormController::new("Settings", model, sections), row)
    }

    #[test]
    fn test_data_source_queries() {
        let (controller, _) = single_cell_controller();
        assert_eq!(controller.title(), "Settings");
        assert_eq!(controller.visible_section_count(), 1);
        assert_eq!(controller.visible_row_count(0), 1);
        assert_eq!(
            controller.cell_at(RowPath::new(0, 0)).title.get(),
            "Enabled"
        );
    }

    #[test]
    fn test_reconcile_without_host_still_commits() {
        let (controller, row) = single_cell_controller();
        controller.model().set_row_visible(row, false);
        controller.reconcile();
        assert_eq!(controller.visible_row_count(0), 0);

        // Attaching a host afterwards starts from the committed state.
        let host = RecordingHost::new();
        controller.attach_host(Box::new(host.clone()));
        controller.reconcile();
        assert_eq!(host.log(), vec![HostEdit::Begin, HostEdit::RefreshFooter(0, None), HostEdit::End]);
    }

    #[test]
    fn test_reconcile_forwards_to_host() {
        let (controller, row) = single_cell_controller();
        let host = RecordingHost::new();
        controller.attach_host(Box::new(host.clone()));
        controller.model().set_row_visible(row, false);
        controller.reconcile();
        assert_eq!(
            host.log(),
            vec![
                HostEdit::Begin,
                HostEdit::DeleteRows(vec![RowPath::new(0, 0)]),
                HostEdit::RefreshFooter(0, None),
                HostEdit::End,
            ]
        );
    }

    #[test]
    fn test_detach_host_stops_forwarding() {
        let (controller, row) = single_cell_controller();
        let host = RecordingHost::new();
        controller.attach_host(Box::new(host.clone()));
        assert!(controller.detach_host().is_some());
        controller.model().set_row_visible(row, false);
        controller.reconcile();
        assert!(host.log().is_empty());
    }
}

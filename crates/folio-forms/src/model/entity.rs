//! Row and section entities.
//!
//! Entities are dumb flag-and-callback records; everything visual lives in
//! the widget layer, and everything structural (ordering, snapshots) lives
//! in [`FormModel`](super::FormModel). Rows hold no back-reference to their
//! section, so the tree is acyclic and teardown is a plain drop.

use std::sync::Arc;

use slotmap::new_key_type;

new_key_type! {
    /// A stable handle to one section, assigned at construction.
    pub struct SectionId;

    /// A stable handle to one row, assigned at construction.
    pub struct RowId;
}

/// Callback invoked when a visible row is selected.
pub type SelectHandler = Arc<dyn Fn() + Send + Sync>;

/// One row of a section.
///
/// The row sequence of a section is immutable after attachment; only these
/// derived fields mutate, in place, once per update cycle.
pub(crate) struct Row {
    /// Derived from the bound visibility predicate each update cycle.
    pub visible: bool,
    /// Whether selecting this row should show highlight feedback.
    pub should_highlight: bool,
    /// Selection callback, if the row is interactive.
    pub on_select: Option<SelectHandler>,
    /// Set when the row is claimed by a section; a row belongs to exactly one.
    pub attached: bool,
}

impl Row {
    pub(crate) fn new() -> Self {
        Self {
            visible: true,
            should_highlight: false,
            on_select: None,
            attached: false,
        }
    }
}

/// One section of the form.
pub(crate) struct Section {
    /// Ordered rows, fixed at attachment time.
    pub rows: Vec<RowId>,
    /// Derived from the bound visibility predicate each update cycle.
    pub visible: bool,
    /// Footer text below the section, re-derived each update cycle.
    pub footer: Option<String>,
    /// The visible-row sequence captured at the end of the last
    /// reconciliation pass.
    pub previously_visible: Vec<RowId>,
}

impl Section {
    pub(crate) fn new(rows: Vec<RowId>) -> Self {
        // Every row starts visible, so the initial snapshot is the full
        // sequence; FormModel::prime recaptures it after the first binding
        // pass.
        let previously_visible = rows.clone();
        Self {
            rows,
            visible: true,
            footer: None,
            previously_visible,
        }
    }
}

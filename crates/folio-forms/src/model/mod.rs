//! The form model: a fixed two-level tree with derived visibility.
//!
//! A form is a tree of sections and rows built exactly once from a schema.
//! The tree's structure never changes afterwards - every update cycle only
//! rewrites the derived boolean visibility flags (and footer text), and the
//! reconciler turns those flag changes into the minimal set of index-based
//! section/row edits for the host table.
//!
//! # Core Types
//!
//! - [`SectionId`] / [`RowId`]: stable opaque handles assigned at
//!   construction - entity identity is handle identity, never content
//!   equality
//! - [`FormModel`]: owns the tree, the visibility flags, and the memoized
//!   previous-visible snapshots
//! - [`RowPath`](crate::adapter::RowPath): a (section, row) coordinate in
//!   *visible* space, what the host table addresses cells with
//! - [`EditBatch`]: one update cycle's worth of structural edits
//!
//! # Update Cycle
//!
//! ```text
//! change(mutator)
//!     │
//!     ▼
//! binding pass          rewrites every visibility flag + widget property
//!     │
//!     ▼
//! FormModel::reconcile  diffs previous-visible vs current-visible,
//!     │                 per level, and commits the new snapshots
//!     ▼
//! EditBatch::apply      one begin/end transaction on the host table
//! ```
//!
//! The reconciler never reorders: construction order is fixed, only
//! membership in the visible set changes.

mod entity;
mod reconcile;
mod store;

pub use entity::{RowId, SectionId, SelectHandler};
pub use reconcile::{EditBatch, LevelEdit, diff_visibility};
pub use store::FormModel;

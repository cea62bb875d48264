//! Prelude module for Folio forms.
//!
//! Re-exports everything a typical form schema needs:
//!
//! ```ignore
//! use folio_forms::prelude::*;
//! ```

// ============================================================================
// State Projections
// ============================================================================

pub use folio_core::{Getter, Lens, getter, lens};

// ============================================================================
// Builders
// ============================================================================

pub use crate::builder::{
    CellRef, Element, Form, SectionRef, bind, control_row, detail_row, form, label,
    nested_text_row, option_row, section, text_input, toggle,
};

// ============================================================================
// Driving a Form
// ============================================================================

pub use crate::binding::{BuildContext, Navigator, NullNavigator};
pub use crate::controller::FormController;
pub use crate::driver::FormDriver;

// ============================================================================
// Host Boundary
// ============================================================================

pub use crate::adapter::{EditAnimation, RowPath, TableHost};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::{Accessory, Cell, CellControl, Color, Label, TextInput, Toggle};

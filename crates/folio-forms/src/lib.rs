//! Folio - a declarative, state-driven form layer for table-based UIs.
//!
//! A form binds one plain application state value to a two-level table of
//! sections and rows. The schema is built once; from then on every change
//! flows one way: a mutation funnels through the driver, a binding pass
//! rewrites widget properties and visibility flags from the fresh state,
//! and the reconciler turns flag changes into the minimal batch of
//! insert/remove edits for the host table.
//!
//! # Example
//!
//! ```
//! use folio_forms::prelude::*;
//!
//! #[derive(Clone)]
//! struct Settings {
//!     enabled: bool,
//!     password: String,
//! }
//!
//! let schema = form(vec![
//!     section(
//!         vec![control_row("Enabled", toggle(lens!(Settings, enabled)), None)],
//!         None,
//!         None,
//!     ),
//!     section(
//!         vec![nested_text_row("Password", lens!(Settings, password))],
//!         None,
//!         Some(getter!(Settings, enabled)),
//!     ),
//! ]);
//!
//! let driver = FormDriver::new(
//!     "Settings",
//!     Settings { enabled: true, password: "1234".into() },
//!     schema,
//! );
//!
//! driver.change(|settings| settings.enabled = false);
//! assert_eq!(driver.controller().visible_section_count(), 1);
//! ```
//!
//! # Crate Layout
//!
//! - [`builder`]: schema combinators (`form`, `section`, `toggle`, ...)
//! - [`driver`]: state ownership and the update pipeline
//! - [`controller`]: the data-source surface a host table talks to
//! - [`model`]: the section/row tree and the visibility reconciler
//! - [`adapter`]: the [`TableHost`](adapter::TableHost) boundary
//! - [`widget`]: cells and their embedded controls
//! - [`binding`]: lenses-to-widgets plumbing shared by the layers above

pub mod adapter;
pub mod binding;
pub mod builder;
pub mod controller;
pub mod driver;
pub mod error;
pub mod model;
pub mod prelude;
pub mod widget;

pub use adapter::{EditAnimation, RowPath, TableHost};
pub use controller::FormController;
pub use driver::FormDriver;
pub use error::FormError;
pub use model::FormModel;

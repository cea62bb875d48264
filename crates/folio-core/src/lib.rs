//! Core systems for Folio.
//!
//! This crate provides the foundational components of the Folio form toolkit:
//!
//! - **Signal/Slot System**: Type-safe notification between form components
//! - **Property System**: Change-detecting value cells for widget state
//! - **Lenses**: Composable typed projections into application state
//! - **Retain Arena**: Explicit keep-alive ownership for callback handlers
//!
//! # Signal/Slot Example
//!
//! ```
//! use folio_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Lens Example
//!
//! ```
//! use folio_core::lens;
//!
//! #[derive(Clone)]
//! struct Settings {
//!     enabled: bool,
//! }
//!
//! let enabled = lens!(Settings, enabled);
//! let mut settings = Settings { enabled: false };
//! enabled.set(&mut settings, true);
//! assert!(enabled.get(&settings));
//! ```

pub mod arena;
pub mod lens;
pub mod logging;
pub mod property;
pub mod signal;

pub use arena::{RetainArena, RetainId, Retained};
pub use lens::{Getter, Lens};
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};

//! Logging facilities for Folio.
//!
//! Folio instruments its subsystems with the `tracing` crate. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every event carries an explicit target so subsystems can be filtered
//! individually, e.g. `RUST_LOG=folio_forms::reconcile=debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "folio_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "folio_core::signal";
    /// Form model and visibility target.
    pub const MODEL: &str = "folio_forms::model";
    /// Reconciliation engine target.
    pub const RECONCILE: &str = "folio_forms::reconcile";
    /// Update-pass driver target.
    pub const DRIVER: &str = "folio_forms::driver";
}

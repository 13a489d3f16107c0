//! Reconciliation loop.
//!
//! # Data Flow
//! ```text
//! Every tick:
//!     discovery (API or DNS)
//!         failure → log, backoff sleep, retry
//!     → render (sort, template)
//!         failure → "no change"
//!     → install (fingerprint compare, atomic replace)
//!         failure → fatal
//!     → supervise (decision table: start / reload / none)
//!         start failure → fatal, reload failure → logged
//!     → sleep interval
//! ```
//!
//! # Design Decisions
//! - Ticks run strictly one after another
//! - Fatal errors trigger `Shutdown` instead of flipping a global flag
//! - The installed file is the only state carried between ticks

pub mod reconciler;

pub use reconciler::{ReconcileError, Reconciler, TickOutcome};

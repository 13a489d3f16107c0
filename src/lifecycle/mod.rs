//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Select discovery → Build Reconciler
//!
//! Shutdown (shutdown.rs):
//!     Signal or fatal error → trigger → loop exits at next tick boundary
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then discovery, then the loop
//! - Ticks are never interrupted mid-way; sleeps are

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_reconciler, StartupError};

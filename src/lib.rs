//! Border controller: a reconciliation sidecar for a reverse proxy.
//!
//! Discovers the backends of a service (swarm controller API or DNS task
//! resolution), renders them into the proxy configuration through a
//! template, installs the result atomically when it changed, and keeps the
//! proxy process running and reloaded.
//!
//! ```text
//!   ┌────────────┐   ┌──────────┐   ┌───────────┐   ┌─────────────┐
//!   │ discovery  │──▶│  render  │──▶│  install  │──▶│ supervisor  │
//!   │ api | dns  │   │ template │   │ sha256 +  │   │ start or    │
//!   └────────────┘   └──────────┘   │ rename    │   │ reload      │
//!         ▲                         └───────────┘   └─────────────┘
//!         └──────────────── reconcile (tick, backoff) ──────────────┘
//! ```

// Core pipeline
pub mod discovery;
pub mod install;
pub mod reconcile;
pub mod render;
pub mod supervisor;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::SidecarConfig;
pub use lifecycle::Shutdown;
pub use reconcile::{Reconciler, TickOutcome};

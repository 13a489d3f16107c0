//! Proxy process supervision.
//!
//! # Data Flow
//! ```text
//! Each tick (after compare/install):
//!     liveness.rs (scan /proc for the proxy process)
//!     → SupervisorAction::decide(changed, running)
//!     → process.rs (start or reload the proxy)
//! ```
//!
//! # Design Decisions
//! - Liveness is re-queried every tick, never cached
//! - Inspection errors count as "not running" (fail toward restart)
//! - Process control sits behind `ProxyControl` so the loop can be tested
//!   without real processes

pub mod liveness;
pub mod process;

use async_trait::async_trait;
use thiserror::Error;

pub use process::ProcessSupervisor;

/// Errors from proxy process control.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The command could not be launched.
    #[error("failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The reload command ran but reported failure.
    #[error("{binary} reload exited with {status}")]
    ReloadFailed {
        binary: String,
        status: std::process::ExitStatus,
    },
}

/// Control surface of the proxy process.
#[async_trait]
pub trait ProxyControl: Send + Sync {
    /// Whether a proxy process is currently running.
    async fn is_running(&self) -> bool;

    /// Launch the proxy in the foreground.
    async fn start(&self) -> Result<(), SupervisorError>;

    /// Ask the running proxy to reload its configuration.
    async fn reload(&self) -> Result<(), SupervisorError>;
}

/// What the supervisor does at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorAction {
    None,
    Start,
    Reload,
}

impl SupervisorAction {
    /// Decision table over (config changed, proxy running).
    pub fn decide(changed: bool, running: bool) -> Self {
        match (changed, running) {
            (true, true) => Self::Reload,
            (true, false) => Self::Start,
            (false, true) => Self::None,
            (false, false) => Self::Start,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Start => "start",
            Self::Reload => "reload",
        }
    }
}

impl std::fmt::Display for SupervisorAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Backend discovery subsystem.
//!
//! # Data Flow
//! ```text
//! DiscoveryStrategy (from config)
//!     → api.rs (controller service inspection, host failover)
//!     → dns.rs (task name resolution)
//!     → unordered raw identifiers + EndpointLayout
//!     → render (sort, split, template)
//! ```
//!
//! # Design Decisions
//! - Exactly one strategy per process lifetime, chosen at startup
//! - Discovery never touches the installed configuration
//! - Duplicates from the source are passed through untouched
//! - Every network call has an explicit deadline

pub mod api;
pub mod dns;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::DiscoveryStrategy;
use crate::render::EndpointLayout;

pub use api::{ApiDiscovery, InspectResponse};
pub use dns::DnsDiscovery;

/// Errors that can occur while discovering backends.
///
/// All variants except `InvalidController` are tick-local: the loop logs
/// them and retries after a cooldown.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Every configured controller failed at the transport or HTTP level.
    #[error("cannot reach any controller host ({attempted} tried)")]
    NoReachableController { attempted: usize },

    /// The authoritative controller answered with an unreadable body.
    #[error("invalid response from controller {controller}: {reason}")]
    Decode { controller: String, reason: String },

    /// The controller reported an application-level error.
    #[error("controller error {code}: {message}")]
    Controller { code: i64, message: String },

    /// Name resolution failed or returned no addresses.
    #[error("failed to resolve {name}: {reason}")]
    Resolve { name: String, reason: String },

    /// A controller URL could not be built from the configuration.
    #[error("invalid controller endpoint for host {host}: {reason}")]
    InvalidController { host: String, reason: String },
}

/// A mechanism for enumerating the current backends of a service.
#[async_trait]
pub trait BackendDiscovery: Send + Sync {
    /// Short strategy name for logs and metrics.
    fn strategy(&self) -> &'static str;

    /// How raw identifiers from this strategy become endpoints.
    fn layout(&self) -> &EndpointLayout;

    /// Enumerate raw backend identifiers. Order is not significant.
    async fn discover(&self) -> Result<Vec<String>, DiscoveryError>;
}

/// Build the discovery implementation for the configured strategy.
pub fn from_strategy(strategy: &DiscoveryStrategy) -> Result<Box<dyn BackendDiscovery>, DiscoveryError> {
    match strategy {
        DiscoveryStrategy::Api(settings) => Ok(Box::new(ApiDiscovery::new(settings)?)),
        DiscoveryStrategy::Dns(settings) => Ok(Box::new(DnsDiscovery::new(settings))),
    }
}

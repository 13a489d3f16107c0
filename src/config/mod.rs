//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, strategy selection)
//!     → SidecarConfig (validated, immutable)
//!     → consumed once by lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Discovery mode conflicts are fatal before the loop starts

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ApiSettings, DiscoveryConfig, DiscoveryStrategy, DnsSettings, LoopConfig,
    ObservabilityConfig, ProxyProcessConfig, RenderConfig, SidecarConfig,
};
pub use validation::{validate_config, ValidationError};

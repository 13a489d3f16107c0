//! Startup orchestration.
//!
//! # Responsibilities
//! - Select the discovery strategy from validated configuration
//! - Initialize components in dependency order
//! - Hand a ready `Reconciler` to the caller
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Components initialize in order, not concurrently

use thiserror::Error;

use crate::config::{SidecarConfig, ValidationError};
use crate::discovery::{self, DiscoveryError};
use crate::install::ConfigInstaller;
use crate::reconcile::Reconciler;
use crate::render::{ConfigRenderer, MiniJinjaEngine};
use crate::supervisor::ProcessSupervisor;

/// Errors that prevent the sidecar from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid discovery configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Config(Vec<ValidationError>),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Wire production components from configuration.
pub fn build_reconciler(config: &SidecarConfig) -> Result<Reconciler, StartupError> {
    let strategy = config.discovery.strategy().map_err(StartupError::Config)?;
    let discovery = discovery::from_strategy(&strategy)?;

    tracing::info!(
        strategy = discovery.strategy(),
        template = %config.render.template_path.display(),
        live_config = %config.render.live_config_path.display(),
        proxy = %config.proxy.binary,
        "Components initialized"
    );

    let renderer = ConfigRenderer::new(
        Box::new(MiniJinjaEngine::new()),
        config.render.template_path.clone(),
    );
    let installer = ConfigInstaller::new(config.render.live_config_path.clone());
    let supervisor = ProcessSupervisor::new(config.proxy.clone());

    Ok(Reconciler::new(
        discovery,
        renderer,
        installer,
        Box::new(supervisor),
        config.reconcile.clone(),
    ))
}

//! The reconciler: one tick, and the loop that repeats it.

use std::time::Duration;

use thiserror::Error;

use crate::config::LoopConfig;
use crate::discovery::{BackendDiscovery, DiscoveryError};
use crate::install::{ConfigInstaller, InstallError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::render::ConfigRenderer;
use crate::resilience::calculate_backoff;
use crate::supervisor::{ProxyControl, SupervisorAction, SupervisorError};

/// Conditions that stop the reconciliation loop.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The live configuration could not be written.
    #[error("cannot install configuration: {0}")]
    Install(#[from] InstallError),

    /// The proxy could not be started.
    #[error("cannot start proxy: {0}")]
    Start(#[source] SupervisorError),
}

/// Result of a single non-fatal tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// Discovery failed; nothing else ran this tick.
    DiscoveryFailed(DiscoveryError),

    /// The tick ran to completion.
    Reconciled {
        backends: usize,
        changed: bool,
        action: SupervisorAction,
    },
}

/// Drives discovery, rendering, install and supervision.
pub struct Reconciler {
    discovery: Box<dyn BackendDiscovery>,
    renderer: ConfigRenderer,
    installer: ConfigInstaller,
    supervisor: Box<dyn ProxyControl>,
    timing: LoopConfig,
}

impl Reconciler {
    pub fn new(
        discovery: Box<dyn BackendDiscovery>,
        renderer: ConfigRenderer,
        installer: ConfigInstaller,
        supervisor: Box<dyn ProxyControl>,
        timing: LoopConfig,
    ) -> Self {
        Self {
            discovery,
            renderer,
            installer,
            supervisor,
            timing,
        }
    }

    /// Name of the active discovery strategy.
    pub fn strategy(&self) -> &'static str {
        self.discovery.strategy()
    }

    /// Run one tick: discover → render → compare/install → supervise.
    ///
    /// `Err` is returned only for fatal conditions.
    pub async fn tick(&self) -> Result<TickOutcome, ReconcileError> {
        let strategy = self.discovery.strategy();

        let raw = match self.discovery.discover().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(strategy, error = %e, "Backend discovery failed");
                metrics::record_discovery_failure(strategy);
                return Ok(TickOutcome::DiscoveryFailed(e));
            }
        };

        let backends = raw.len();
        tracing::info!(strategy, backends = ?raw, "Discovered backends");
        metrics::record_backends(backends);

        let changed = match self.renderer.render(raw, self.discovery.layout()) {
            Ok(rendered) => self.installer.detect_and_install(&rendered)?,
            Err(e) => {
                tracing::error!(
                    template = %self.renderer.template_path().display(),
                    error = %e,
                    "Rendering failed, keeping installed configuration"
                );
                metrics::record_render_failure();
                false
            }
        };
        if changed {
            metrics::record_config_install();
        }

        let running = self.supervisor.is_running().await;
        let action = SupervisorAction::decide(changed, running);
        tracing::debug!(changed, running, %action, "Supervisor decision");

        match action {
            SupervisorAction::None => {}
            SupervisorAction::Start => {
                self.supervisor.start().await.map_err(ReconcileError::Start)?;
            }
            SupervisorAction::Reload => {
                if let Err(e) = self.supervisor.reload().await {
                    tracing::warn!(error = %e, "Proxy reload failed, retrying on next change");
                }
            }
        }
        metrics::record_proxy_action(action);

        Ok(TickOutcome::Reconciled {
            backends,
            changed,
            action,
        })
    }

    /// Repeat ticks until `shutdown` is triggered or a fatal error occurs.
    ///
    /// A fatal error triggers `shutdown` before it is returned.
    pub async fn run(&self, shutdown: &Shutdown) -> Result<(), ReconcileError> {
        let interval = Duration::from_secs(self.timing.interval_secs);
        let mut failures: u32 = 0;

        tracing::info!(
            strategy = self.strategy(),
            interval_secs = self.timing.interval_secs,
            "Reconciliation loop starting"
        );

        while !shutdown.is_triggered() {
            let delay = match self.tick().await {
                Ok(TickOutcome::DiscoveryFailed(_)) => {
                    failures = failures.saturating_add(1);
                    metrics::record_tick("discovery_failed");
                    let delay = calculate_backoff(
                        failures,
                        self.timing.retry_base_ms,
                        self.timing.retry_max_ms,
                    );
                    tracing::info!(
                        consecutive_failures = failures,
                        retry_in_ms = delay.as_millis() as u64,
                        "Retrying discovery"
                    );
                    delay
                }
                Ok(TickOutcome::Reconciled { .. }) => {
                    failures = 0;
                    metrics::record_tick("reconciled");
                    interval
                }
                Err(e) => {
                    tracing::error!(error = %e, "Fatal reconciliation error, stopping");
                    metrics::record_tick("fatal");
                    shutdown.trigger();
                    return Err(e);
                }
            };

            if shutdown.sleep(delay).await {
                break;
            }
        }

        tracing::info!("Reconciliation loop stopped");
        Ok(())
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("strategy", &self.discovery.strategy())
            .field("renderer", &self.renderer)
            .field("installer", &self.installer)
            .field("timing", &self.timing)
            .finish()
    }
}

//! Command-based proxy control.
//!
//! # Responsibilities
//! - Start the proxy as a foreground child process
//! - Reap the child so it never lingers as a zombie
//! - Run the reload command and wait for its verdict

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::ProxyProcessConfig;
use crate::supervisor::liveness::is_process_running;
use crate::supervisor::{ProxyControl, SupervisorError};

/// Controls the proxy through its own command line.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    config: ProxyProcessConfig,
}

impl ProcessSupervisor {
    pub fn new(config: ProxyProcessConfig) -> Self {
        Self { config }
    }

    fn spawn_error(&self, source: std::io::Error) -> SupervisorError {
        SupervisorError::Spawn {
            binary: self.config.binary.clone(),
            source,
        }
    }
}

#[async_trait]
impl ProxyControl for ProcessSupervisor {
    async fn is_running(&self) -> bool {
        let proc_root = self.config.proc_root.clone();
        let name = self.config.process_name.clone();

        tokio::task::spawn_blocking(move || is_process_running(&proc_root, &name))
            .await
            .unwrap_or(false)
    }

    async fn start(&self) -> Result<(), SupervisorError> {
        tracing::info!(
            binary = %self.config.binary,
            args = ?self.config.start_args,
            "Starting proxy"
        );

        let mut child = Command::new(&self.config.binary)
            .args(&self.config.start_args)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let binary = self.config.binary.clone();
        let pid = child.id();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => tracing::warn!(binary = %binary, ?pid, %status, "Proxy process exited"),
                Err(e) => tracing::error!(binary = %binary, ?pid, error = %e, "Failed to wait on proxy process"),
            }
        });

        Ok(())
    }

    async fn reload(&self) -> Result<(), SupervisorError> {
        tracing::info!(
            binary = %self.config.binary,
            args = ?self.config.reload_args,
            "Reloading proxy"
        );

        let status = Command::new(&self.config.binary)
            .args(&self.config.reload_args)
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            return Err(SupervisorError::ReloadFailed {
                binary: self.config.binary.clone(),
                status,
            });
        }
        Ok(())
    }
}

//! Change detection and configuration install.
//!
//! # Data Flow
//! ```text
//! RenderedConfig (fingerprint)
//!     → fingerprint of live config file (unreadable → empty content)
//!     → equal: report unchanged, no write
//!     → different: temp file → write → fsync → rename over live path
//! ```
//!
//! # Design Decisions
//! - Fingerprints, not byte comparison, so audit logs stay small
//! - The live file is replaced atomically; readers never see a partial write
//! - Write failures are fatal to the caller

pub mod fingerprint;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::render::RenderedConfig;

pub use fingerprint::Fingerprint;

/// The live configuration file could not be replaced.
#[derive(Debug, Error)]
#[error("cannot write config file {}: {source}", path.display())]
pub struct InstallError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Compares rendered configuration with the live file and installs changes.
#[derive(Debug, Clone)]
pub struct ConfigInstaller {
    live_path: PathBuf,
}

impl ConfigInstaller {
    pub fn new(live_path: impl Into<PathBuf>) -> Self {
        Self {
            live_path: live_path.into(),
        }
    }

    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    /// Fingerprint of the installed configuration.
    ///
    /// A missing or unreadable file counts as empty content.
    pub fn current_fingerprint(&self) -> Fingerprint {
        match fs::read(&self.live_path) {
            Ok(bytes) => Fingerprint::of(&bytes),
            Err(e) => {
                tracing::warn!(
                    path = %self.live_path.display(),
                    error = %e,
                    "Cannot read existing config, treating as empty"
                );
                Fingerprint::of(&[])
            }
        }
    }

    /// Install `rendered` if it differs from the live file.
    ///
    /// Returns whether the live file changed.
    pub fn detect_and_install(&self, rendered: &RenderedConfig) -> Result<bool, InstallError> {
        let existing = self.current_fingerprint();

        tracing::info!(
            rendered = %rendered.fingerprint(),
            existing = %existing,
            "Comparing configuration fingerprints"
        );

        if &existing == rendered.fingerprint() {
            tracing::debug!("Fingerprints equal, nothing to do");
            return Ok(false);
        }

        self.install(rendered.as_bytes())?;

        tracing::info!(
            path = %self.live_path.display(),
            fingerprint = %rendered.fingerprint(),
            "Installed new configuration"
        );
        Ok(true)
    }

    fn install(&self, bytes: &[u8]) -> Result<(), InstallError> {
        let fail = |source| InstallError {
            path: self.live_path.clone(),
            source,
        };

        let dir = match self.live_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(fail)?;
        temp.write_all(bytes).map_err(fail)?;
        temp.as_file().sync_all().map_err(fail)?;

        let permissions = match fs::metadata(&self.live_path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => new_file_permissions(),
        };
        if let Some(permissions) = permissions {
            temp.as_file().set_permissions(permissions).map_err(fail)?;
        }

        temp.persist(&self.live_path).map_err(|e| fail(e.error))?;
        Ok(())
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

//! Shared fakes for reconciliation tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use border_controller::config::LoopConfig;
use border_controller::discovery::{BackendDiscovery, DiscoveryError};
use border_controller::install::ConfigInstaller;
use border_controller::render::{BackendEndpoint, ConfigRenderer, EndpointLayout, RenderError, TemplateEngine};
use border_controller::supervisor::{ProxyControl, SupervisorError};
use border_controller::Reconciler;

/// Discovery that replays a script, then keeps failing.
pub struct ScriptedDiscovery {
    layout: EndpointLayout,
    script: Mutex<VecDeque<Result<Vec<String>, DiscoveryError>>>,
}

impl ScriptedDiscovery {
    pub fn new(layout: EndpointLayout, script: Vec<Result<Vec<String>, DiscoveryError>>) -> Self {
        Self {
            layout,
            script: Mutex::new(script.into()),
        }
    }

    pub fn dns(port: &str, script: Vec<Result<Vec<String>, DiscoveryError>>) -> Self {
        Self::new(EndpointLayout::SharedPort { port: port.into() }, script)
    }
}

#[async_trait]
impl BackendDiscovery for ScriptedDiscovery {
    fn strategy(&self) -> &'static str {
        "scripted"
    }

    fn layout(&self) -> &EndpointLayout {
        &self.layout
    }

    async fn discover(&self) -> Result<Vec<String>, DiscoveryError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(DiscoveryError::NoReachableController { attempted: 0 }))
    }
}

pub fn hosts(ids: &[&str]) -> Result<Vec<String>, DiscoveryError> {
    Ok(ids.iter().map(|s| s.to_string()).collect())
}

pub fn unreachable() -> Result<Vec<String>, DiscoveryError> {
    Err(DiscoveryError::NoReachableController { attempted: 2 })
}

/// Writes one `server host:port;` line per record.
pub struct LineEngine;

impl TemplateEngine for LineEngine {
    fn render(&self, _: &Path, backends: &[BackendEndpoint]) -> Result<Vec<u8>, RenderError> {
        Ok(backends
            .iter()
            .map(|b| format!("server {}:{};\n", b.host, b.port))
            .collect::<String>()
            .into_bytes())
    }
}

/// Always fails, like a broken template.
pub struct BrokenEngine;

impl TemplateEngine for BrokenEngine {
    fn render(&self, path: &Path, _: &[BackendEndpoint]) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Template {
            path: path.to_path_buf(),
            reason: "unexpected end of input".into(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Start,
    Reload,
}

/// Records every control call; `start` marks the proxy as running.
#[derive(Clone, Default)]
pub struct RecordingSupervisor {
    pub running: Arc<AtomicBool>,
    pub probes: Arc<AtomicUsize>,
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub fail_start: Arc<AtomicBool>,
    pub fail_reload: Arc<AtomicBool>,
}

impl RecordingSupervisor {
    pub fn running() -> Self {
        let supervisor = Self::default();
        supervisor.running.store(true, Ordering::SeqCst);
        supervisor
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn failure(&self) -> SupervisorError {
        SupervisorError::Spawn {
            binary: "fake-proxy".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        }
    }
}

#[async_trait]
impl ProxyControl for RecordingSupervisor {
    async fn is_running(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.running.load(Ordering::SeqCst)
    }

    async fn start(&self) -> Result<(), SupervisorError> {
        self.calls.lock().unwrap().push(Call::Start);
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(self.failure());
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn reload(&self) -> Result<(), SupervisorError> {
        self.calls.lock().unwrap().push(Call::Reload);
        if self.fail_reload.load(Ordering::SeqCst) {
            return Err(self.failure());
        }
        Ok(())
    }
}

/// Fast loop timing for tests.
pub fn fast_timing() -> LoopConfig {
    LoopConfig {
        interval_secs: 3600,
        retry_base_ms: 10,
        retry_max_ms: 20,
    }
}

pub fn reconciler(
    discovery: ScriptedDiscovery,
    engine: impl TemplateEngine + 'static,
    live_path: &Path,
    supervisor: &RecordingSupervisor,
) -> Reconciler {
    Reconciler::new(
        Box::new(discovery),
        ConfigRenderer::new(Box::new(engine), "border.tpl"),
        ConfigInstaller::new(live_path),
        Box::new(supervisor.clone()),
        fast_timing(),
    )
}

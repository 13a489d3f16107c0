//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the sidecar.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the border controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SidecarConfig {
    /// Backend discovery settings (API or DNS, never both).
    pub discovery: DiscoveryConfig,

    /// Template and live configuration paths.
    pub render: RenderConfig,

    /// Proxy process control.
    pub proxy: ProxyProcessConfig,

    /// Reconciliation loop timing.
    pub reconcile: LoopConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend discovery configuration.
///
/// API mode is selected by `ingress_service_name`, DNS mode by
/// `task_dns_name`. Empty strings count as unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Service to inspect through the swarm controller API.
    pub ingress_service_name: Option<String>,

    /// Controller hosts, tried in order.
    pub controller_hosts: Vec<String>,

    /// Domain suffix appended to controller hosts and discovered nodes.
    pub host_dns_domain: String,

    /// Port the controller API is exposed on.
    pub controller_port: String,

    /// API key sent as the `api_key` query parameter.
    pub api_key: String,

    /// Fully-qualified task name resolved through DNS.
    pub task_dns_name: Option<String>,

    /// Port shared by every DNS-discovered backend.
    pub service_port: Option<String>,

    /// Controller request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ingress_service_name: None,
            controller_hosts: Vec::new(),
            host_dns_domain: String::new(),
            controller_port: String::new(),
            api_key: String::new(),
            task_dns_name: None,
            service_port: None,
            request_timeout_secs: 5,
        }
    }
}

/// Discovery strategy selected from [`DiscoveryConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    Api(ApiSettings),
    Dns(DnsSettings),
}

/// Settings for controller API discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub service_name: String,
    pub controller_hosts: Vec<String>,
    pub dns_domain: String,
    pub controller_port: String,
    pub api_key: String,
    pub request_timeout_secs: u64,
}

/// Settings for DNS task discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsSettings {
    pub task_name: String,
    pub service_port: String,
}

/// Template and live configuration paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Template rendered every tick.
    pub template_path: PathBuf,

    /// Configuration file the proxy reads.
    pub live_config_path: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("/config/border-controller-config.tpl"),
            live_config_path: PathBuf::from("/etc/nginx/nginx.conf"),
        }
    }
}

/// Proxy process control configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyProcessConfig {
    /// Process name as reported in `/proc/<pid>/status`.
    pub process_name: String,

    /// Binary used for start and reload.
    pub binary: String,

    /// Arguments that start the proxy in the foreground.
    pub start_args: Vec<String>,

    /// Arguments that ask a running proxy to reload.
    pub reload_args: Vec<String>,

    /// Root of the proc filesystem.
    pub proc_root: PathBuf,
}

impl Default for ProxyProcessConfig {
    fn default() -> Self {
        Self {
            process_name: "nginx".to_string(),
            binary: "nginx".to_string(),
            start_args: vec!["-g".to_string(), "daemon off;".to_string()],
            reload_args: vec!["-s".to_string(), "reload".to_string()],
            proc_root: PathBuf::from("/proc"),
        }
    }
}

/// Reconciliation loop timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Delay between successful ticks in seconds.
    pub interval_secs: u64,

    /// Base delay for discovery retry backoff in milliseconds.
    pub retry_base_ms: u64,

    /// Maximum discovery retry delay in milliseconds (must stay below the interval).
    pub retry_max_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            retry_base_ms: 1000,
            retry_max_ms: 5000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: `pretty` or `json`.
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

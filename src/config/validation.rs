//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce that exactly one discovery strategy is configured
//! - Validate value ranges (intervals > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SidecarConfig → Result<(), Vec<ValidationError>>
//! - Runs before the reconciliation loop starts

use thiserror::Error;

use crate::config::schema::{
    ApiSettings, DiscoveryConfig, DiscoveryStrategy, DnsSettings, SidecarConfig,
};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("both ingress_service_name and task_dns_name are configured")]
    ConflictingDiscovery,

    #[error("no service discovery configured (set ingress_service_name or task_dns_name)")]
    NoDiscovery,

    #[error("API discovery requires at least one controller host")]
    NoControllerHosts,

    #[error("{0} must not be empty")]
    Missing(&'static str),

    #[error("DNS discovery requires service_port")]
    MissingServicePort,

    #[error("invalid port for {field}: '{value}'")]
    InvalidPort { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("retry_max_ms ({retry_max_ms}) must be shorter than the tick interval ({interval_ms} ms)")]
    RetryNotShorterThanInterval { retry_max_ms: u64, interval_ms: u64 },

    #[error("unknown log_format '{0}' (expected 'pretty' or 'json')")]
    UnknownLogFormat(String),
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn check_port(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().parse::<u16>().map(|p| p == 0).unwrap_or(true) {
        errors.push(ValidationError::InvalidPort {
            field,
            value: value.to_string(),
        });
    }
}

impl DiscoveryConfig {
    /// Select the discovery strategy.
    ///
    /// Exactly one of API or DNS mode must be configured.
    pub fn strategy(&self) -> Result<DiscoveryStrategy, Vec<ValidationError>> {
        match (non_empty(&self.ingress_service_name), non_empty(&self.task_dns_name)) {
            (Some(_), Some(_)) => Err(vec![ValidationError::ConflictingDiscovery]),
            (None, None) => Err(vec![ValidationError::NoDiscovery]),
            (Some(service), None) => self.api_settings(service).map(DiscoveryStrategy::Api),
            (None, Some(task)) => self.dns_settings(task).map(DiscoveryStrategy::Dns),
        }
    }

    fn api_settings(&self, service: &str) -> Result<ApiSettings, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let hosts: Vec<String> = self
            .controller_hosts
            .iter()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        if hosts.is_empty() {
            errors.push(ValidationError::NoControllerHosts);
        }
        if self.host_dns_domain.trim().is_empty() {
            errors.push(ValidationError::Missing("host_dns_domain"));
        }
        if self.controller_port.trim().is_empty() {
            errors.push(ValidationError::Missing("controller_port"));
        } else {
            check_port("controller_port", &self.controller_port, &mut errors);
        }
        if self.api_key.is_empty() {
            errors.push(ValidationError::Missing("api_key"));
        }
        if self.request_timeout_secs == 0 {
            errors.push(ValidationError::Zero("request_timeout_secs"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ApiSettings {
            service_name: service.to_string(),
            controller_hosts: hosts,
            dns_domain: self.host_dns_domain.trim().to_string(),
            controller_port: self.controller_port.trim().to_string(),
            api_key: self.api_key.clone(),
            request_timeout_secs: self.request_timeout_secs,
        })
    }

    fn dns_settings(&self, task: &str) -> Result<DnsSettings, Vec<ValidationError>> {
        let Some(port) = non_empty(&self.service_port) else {
            return Err(vec![ValidationError::MissingServicePort]);
        };

        let mut errors = Vec::new();
        check_port("service_port", port, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(DnsSettings {
            task_name: task.to_string(),
            service_port: port.to_string(),
        })
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &SidecarConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = match config.discovery.strategy() {
        Ok(_) => Vec::new(),
        Err(errors) => errors,
    };

    if config.render.template_path.as_os_str().is_empty() {
        errors.push(ValidationError::Missing("template_path"));
    }
    if config.render.live_config_path.as_os_str().is_empty() {
        errors.push(ValidationError::Missing("live_config_path"));
    }

    if config.proxy.process_name.trim().is_empty() {
        errors.push(ValidationError::Missing("process_name"));
    }
    if config.proxy.binary.trim().is_empty() {
        errors.push(ValidationError::Missing("binary"));
    }

    let timing = &config.reconcile;
    if timing.interval_secs == 0 {
        errors.push(ValidationError::Zero("interval_secs"));
    }
    if timing.retry_base_ms == 0 {
        errors.push(ValidationError::Zero("retry_base_ms"));
    }
    let interval_ms = timing.interval_secs.saturating_mul(1000);
    if timing.interval_secs > 0 && timing.retry_max_ms >= interval_ms {
        errors.push(ValidationError::RetryNotShorterThanInterval {
            retry_max_ms: timing.retry_max_ms,
            interval_ms,
        });
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_config() -> SidecarConfig {
        let mut config = SidecarConfig::default();
        config.discovery.ingress_service_name = Some("ingress".into());
        config.discovery.controller_hosts = vec!["dh1".into(), "dh2".into()];
        config.discovery.host_dns_domain = "svc.local".into();
        config.discovery.controller_port = "2376".into();
        config.discovery.api_key = "secret".into();
        config
    }

    fn dns_config() -> SidecarConfig {
        let mut config = SidecarConfig::default();
        config.discovery.task_dns_name = Some("tasks.web".into());
        config.discovery.service_port = Some("9090".into());
        config
    }

    #[test]
    fn test_api_config_is_valid() {
        let config = api_config();
        assert!(validate_config(&config).is_ok());

        let DiscoveryStrategy::Api(settings) = config.discovery.strategy().unwrap() else {
            panic!("expected API strategy");
        };
        assert_eq!(settings.service_name, "ingress");
        assert_eq!(settings.controller_hosts, vec!["dh1", "dh2"]);
    }

    #[test]
    fn test_dns_config_is_valid() {
        let config = dns_config();
        assert!(validate_config(&config).is_ok());
        assert_eq!(
            config.discovery.strategy().unwrap(),
            DiscoveryStrategy::Dns(DnsSettings {
                task_name: "tasks.web".into(),
                service_port: "9090".into(),
            })
        );
    }

    #[test]
    fn test_both_strategies_rejected() {
        let mut config = api_config();
        config.discovery.task_dns_name = Some("tasks.web".into());
        config.discovery.service_port = Some("9090".into());

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ConflictingDiscovery));
    }

    #[test]
    fn test_no_strategy_rejected() {
        let errors = validate_config(&SidecarConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoDiscovery]);
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let mut config = dns_config();
        config.discovery.ingress_service_name = Some("  ".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_dns_requires_port() {
        let mut config = dns_config();
        config.discovery.service_port = None;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingServicePort]);
    }

    #[test]
    fn test_api_collects_all_errors() {
        let mut config = api_config();
        config.discovery.controller_hosts.clear();
        config.discovery.controller_port = "http".into();
        config.discovery.api_key.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::NoControllerHosts));
        assert!(errors.contains(&ValidationError::Missing("api_key")));
    }

    #[test]
    fn test_retry_must_be_shorter_than_interval() {
        let mut config = dns_config();
        config.reconcile.interval_secs = 5;
        config.reconcile.retry_max_ms = 5000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RetryNotShorterThanInterval {
                retry_max_ms: 5000,
                interval_ms: 5000,
            }]
        );
    }

    #[test]
    fn test_unknown_log_format() {
        let mut config = dns_config();
        config.observability.log_format = "xml".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::UnknownLogFormat("xml".into())]);
    }
}

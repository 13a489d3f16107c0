//! DNS task discovery.

use async_trait::async_trait;
use tokio::net::lookup_host;

use crate::config::DnsSettings;
use crate::discovery::{BackendDiscovery, DiscoveryError};
use crate::render::EndpointLayout;

/// Discovery by resolving a swarm task name to its addresses.
///
/// Every resolved address shares the configured service port.
#[derive(Debug, Clone)]
pub struct DnsDiscovery {
    task_name: String,
    layout: EndpointLayout,
}

impl DnsDiscovery {
    pub fn new(settings: &DnsSettings) -> Self {
        Self {
            task_name: settings.task_name.clone(),
            layout: EndpointLayout::SharedPort {
                port: settings.service_port.clone(),
            },
        }
    }
}

#[async_trait]
impl BackendDiscovery for DnsDiscovery {
    fn strategy(&self) -> &'static str {
        "dns"
    }

    fn layout(&self) -> &EndpointLayout {
        &self.layout
    }

    async fn discover(&self) -> Result<Vec<String>, DiscoveryError> {
        let addrs = lookup_host((self.task_name.as_str(), 0))
            .await
            .map_err(|e| DiscoveryError::Resolve {
                name: self.task_name.clone(),
                reason: e.to_string(),
            })?;

        let hosts: Vec<String> = addrs.map(|addr| addr.ip().to_string()).collect();
        if hosts.is_empty() {
            return Err(DiscoveryError::Resolve {
                name: self.task_name.clone(),
                reason: "no addresses returned".to_string(),
            });
        }

        tracing::debug!(task = %self.task_name, count = hosts.len(), "Resolved task addresses");
        Ok(hosts)
    }
}

//! Controller API discovery.
//!
//! # Responsibilities
//! - Query `GET /service/inspect/{service}?api_key={key}` on each controller
//! - Fail over to the next controller on transport errors and non-2xx statuses
//! - Map the terse wire envelope to descriptive fields
//!
//! # Design Decisions
//! - The first 2xx response is authoritative; its decode or application
//!   error fails discovery without consulting later controllers
//! - `code >= 500` is an application error regardless of HTTP status
//! - Errors are logged without URLs so the API key never reaches the logs

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::config::ApiSettings;
use crate::discovery::{BackendDiscovery, DiscoveryError};
use crate::render::EndpointLayout;

/// Controller response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InspectResponse {
    /// Application status code; `>= 500` signals failure.
    #[serde(rename = "Acode", default)]
    pub code: i64,

    /// Human-readable status message.
    #[serde(rename = "Astring", default)]
    pub message: String,

    /// Backends as `"<node> <port>"` identifiers.
    #[serde(rename = "Aslice", default)]
    pub backends: Option<Vec<String>>,
}

impl InspectResponse {
    /// Extract the backend list, surfacing application errors.
    pub fn into_backends(self) -> Result<Vec<String>, DiscoveryError> {
        if self.code >= 500 {
            return Err(DiscoveryError::Controller {
                code: self.code,
                message: self.message,
            });
        }
        Ok(self.backends.unwrap_or_default())
    }
}

/// One controller to query.
#[derive(Debug, Clone)]
struct Controller {
    host: String,
    url: Url,
}

/// Discovery through the swarm controller's service inspection API.
#[derive(Debug)]
pub struct ApiDiscovery {
    client: reqwest::Client,
    controllers: Vec<Controller>,
    layout: EndpointLayout,
}

/// Build the inspection URL for a controller base URL.
pub fn inspect_url(base: &Url, service: &str, api_key: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["service", "inspect", service]);
    }
    url.query_pairs_mut().clear().append_pair("api_key", api_key);
    url
}

impl ApiDiscovery {
    /// Create a discovery client for `http://{host}.{domain}:{port}` controllers.
    pub fn new(settings: &ApiSettings) -> Result<Self, DiscoveryError> {
        let bases = settings
            .controller_hosts
            .iter()
            .map(|host| {
                let raw = format!(
                    "http://{}.{}:{}/",
                    host, settings.dns_domain, settings.controller_port
                );
                Url::parse(&raw).map_err(|e| DiscoveryError::InvalidController {
                    host: host.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_base_urls(settings, bases)
    }

    /// Create a discovery client against explicit controller base URLs.
    ///
    /// The URLs replace the ones derived from `controller_hosts`.
    pub fn with_base_urls(settings: &ApiSettings, bases: Vec<Url>) -> Result<Self, DiscoveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| DiscoveryError::InvalidController {
                host: "*".to_string(),
                reason: e.to_string(),
            })?;

        let controllers = bases
            .into_iter()
            .map(|base| Controller {
                host: base.host_str().unwrap_or_default().to_string(),
                url: inspect_url(&base, &settings.service_name, &settings.api_key),
            })
            .collect();

        Ok(Self {
            client,
            controllers,
            layout: EndpointLayout::NodePort {
                domain: settings.dns_domain.clone(),
            },
        })
    }
}

#[async_trait]
impl BackendDiscovery for ApiDiscovery {
    fn strategy(&self) -> &'static str {
        "api"
    }

    fn layout(&self) -> &EndpointLayout {
        &self.layout
    }

    async fn discover(&self) -> Result<Vec<String>, DiscoveryError> {
        for controller in &self.controllers {
            tracing::debug!(controller = %controller.host, "Inspecting service");

            let response = match self.client.get(controller.url.clone()).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(
                        controller = %controller.host,
                        error = %e.without_url(),
                        "Controller unreachable, trying next host"
                    );
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(
                    controller = %controller.host,
                    status = %status,
                    "Controller returned non-success status, trying next host"
                );
                continue;
            }

            let envelope: InspectResponse =
                response.json().await.map_err(|e| DiscoveryError::Decode {
                    controller: controller.host.clone(),
                    reason: e.without_url().to_string(),
                })?;

            return envelope.into_backends();
        }

        Err(DiscoveryError::NoReachableController {
            attempted: self.controllers.len(),
        })
    }
}

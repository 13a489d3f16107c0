//! Backend endpoint records.
//!
//! # Responsibilities
//! - Represent a single discovered backend as `{host, port}`
//! - Put raw identifiers into canonical order
//! - Combine identifiers with the configured domain or shared port

use serde::Serialize;

use crate::render::RenderError;

/// One reachable instance of the proxied service.
///
/// Templates see the fields as `Node` and `Port`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BackendEndpoint {
    #[serde(rename = "Node")]
    pub host: String,

    #[serde(rename = "Port")]
    pub port: String,
}

impl BackendEndpoint {
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
        }
    }
}

/// How raw discovery identifiers map to endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointLayout {
    /// Identifiers are `"<node> <port>"`; the host is `<node>.<domain>`.
    NodePort { domain: String },

    /// Identifiers are hosts; every endpoint uses `port`.
    SharedPort { port: String },
}

impl EndpointLayout {
    /// Convert raw identifiers into endpoints in canonical order.
    ///
    /// Sorting happens on the raw identifiers, before they are split, and is
    /// the only ordering step. Duplicates are kept.
    pub fn endpoints(&self, mut raw: Vec<String>) -> Result<Vec<BackendEndpoint>, RenderError> {
        raw.sort();
        raw.into_iter().map(|id| self.endpoint(id)).collect()
    }

    fn endpoint(&self, identifier: String) -> Result<BackendEndpoint, RenderError> {
        match self {
            Self::NodePort { domain } => {
                let mut fields = identifier.split_whitespace();
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(node), Some(port), None) => {
                        Ok(BackendEndpoint::new(format!("{}.{}", node, domain), port))
                    }
                    _ => Err(RenderError::MalformedBackend(identifier)),
                }
            }
            Self::SharedPort { port } => Ok(BackendEndpoint::new(identifier, port.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_node_port_layout() {
        let layout = EndpointLayout::NodePort {
            domain: "svc.local".into(),
        };
        let endpoints = layout.endpoints(raw(&["node1 8080", "node2 8080"])).unwrap();
        assert_eq!(
            endpoints,
            vec![
                BackendEndpoint::new("node1.svc.local", "8080"),
                BackendEndpoint::new("node2.svc.local", "8080"),
            ]
        );
    }

    #[test]
    fn test_shared_port_layout_sorts() {
        let layout = EndpointLayout::SharedPort {
            port: "9090".into(),
        };
        let endpoints = layout.endpoints(raw(&["10.0.0.2", "10.0.0.1"])).unwrap();
        assert_eq!(
            endpoints,
            vec![
                BackendEndpoint::new("10.0.0.1", "9090"),
                BackendEndpoint::new("10.0.0.2", "9090"),
            ]
        );
    }

    #[test]
    fn test_sort_uses_raw_identifier() {
        // "a 9" < "a-b 1" raw, while "a-b.x" < "a.x" once combined
        let layout = EndpointLayout::NodePort { domain: "x".into() };
        let endpoints = layout.endpoints(raw(&["a-b 1", "a 9"])).unwrap();
        assert_eq!(endpoints[0], BackendEndpoint::new("a.x", "9"));
        assert_eq!(endpoints[1], BackendEndpoint::new("a-b.x", "1"));
    }

    #[test]
    fn test_duplicates_preserved() {
        let layout = EndpointLayout::SharedPort { port: "80".into() };
        let endpoints = layout.endpoints(raw(&["10.0.0.1", "10.0.0.1"])).unwrap();
        assert_eq!(endpoints.len(), 2);
    }

    #[test]
    fn test_malformed_identifier() {
        let layout = EndpointLayout::NodePort { domain: "x".into() };
        let err = layout.endpoints(raw(&["node1 8080", "node2"])).unwrap_err();
        assert!(matches!(err, RenderError::MalformedBackend(ref id) if id == "node2"));
    }

    #[test]
    fn test_serializes_as_node_and_port() {
        let json = serde_json::to_string(&BackendEndpoint::new("n.x", "80")).unwrap();
        assert_eq!(json, r#"{"Node":"n.x","Port":"80"}"#);
    }
}

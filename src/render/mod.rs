//! Configuration rendering subsystem.
//!
//! # Data Flow
//! ```text
//! raw identifiers (unordered)
//!     → endpoint.rs (sort raw form, split, add domain/port)
//!     → ordered Vec<BackendEndpoint>
//!     → template.rs (TemplateEngine: records → bytes)
//!     → RenderedConfig (bytes + fingerprint)
//! ```
//!
//! # Design Decisions
//! - Rendering is pure: same ordered input, byte-identical output
//! - Sorting the raw identifiers is the only ordering step
//! - The template engine is a pluggable strategy
//! - Any render error means "no change" to the caller

pub mod endpoint;
pub mod template;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::install::Fingerprint;

pub use endpoint::{BackendEndpoint, EndpointLayout};
pub use template::{MiniJinjaEngine, TemplateEngine};

/// Errors that can occur while rendering the proxy configuration.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A controller identifier was not `"<node> <port>"`.
    #[error("malformed backend identifier '{0}' (expected '<node> <port>')")]
    MalformedBackend(String),

    /// The template file could not be read.
    #[error("cannot read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template failed to parse or execute.
    #[error("template {} failed: {reason}", path.display())]
    Template { path: PathBuf, reason: String },
}

/// Immutable output of one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    bytes: Vec<u8>,
    fingerprint: Fingerprint,
}

impl RenderedConfig {
    pub fn new(bytes: Vec<u8>) -> Self {
        let fingerprint = Fingerprint::of(&bytes);
        Self { bytes, fingerprint }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

/// Turns discovered backends into proxy configuration bytes.
pub struct ConfigRenderer {
    engine: Box<dyn TemplateEngine>,
    template_path: PathBuf,
}

impl ConfigRenderer {
    pub fn new(engine: Box<dyn TemplateEngine>, template_path: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            template_path: template_path.into(),
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Normalize raw identifiers with `layout` and render them.
    pub fn render(&self, raw: Vec<String>, layout: &EndpointLayout) -> Result<RenderedConfig, RenderError> {
        let endpoints = layout.endpoints(raw)?;
        self.render_endpoints(&endpoints)
    }

    /// Render an already ordered list of endpoints.
    pub fn render_endpoints(&self, endpoints: &[BackendEndpoint]) -> Result<RenderedConfig, RenderError> {
        let bytes = self.engine.render(&self.template_path, endpoints)?;
        let rendered = RenderedConfig::new(bytes);

        tracing::debug!(
            fingerprint = %rendered.fingerprint(),
            content = %String::from_utf8_lossy(rendered.as_bytes()),
            "Rendered configuration"
        );

        Ok(rendered)
    }
}

impl std::fmt::Debug for ConfigRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigRenderer")
            .field("template_path", &self.template_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes one `host:port` line per record.
    struct LineEngine;

    impl TemplateEngine for LineEngine {
        fn render(&self, _: &Path, backends: &[BackendEndpoint]) -> Result<Vec<u8>, RenderError> {
            Ok(backends
                .iter()
                .map(|b| format!("{}:{}\n", b.host, b.port))
                .collect::<String>()
                .into_bytes())
        }
    }

    fn renderer() -> ConfigRenderer {
        ConfigRenderer::new(Box::new(LineEngine), "unused.tpl")
    }

    fn raw(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_is_deterministic() {
        let layout = EndpointLayout::SharedPort { port: "80".into() };
        let first = renderer().render(raw(&["b", "a"]), &layout).unwrap();
        let second = renderer().render(raw(&["b", "a"]), &layout).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_enumeration_order_does_not_matter() {
        let layout = EndpointLayout::NodePort { domain: "d".into() };
        let one = renderer().render(raw(&["b 1", "a 2"]), &layout).unwrap();
        let two = renderer().render(raw(&["a 2", "b 1"]), &layout).unwrap();
        assert_eq!(one.as_bytes(), two.as_bytes());
        assert_eq!(one.as_bytes(), b"a.d:2\nb.d:1\n");
    }

    #[test]
    fn test_malformed_identifier_fails_render() {
        let layout = EndpointLayout::NodePort { domain: "d".into() };
        assert!(renderer().render(raw(&["lonely"]), &layout).is_err());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = RenderedConfig::new(b"upstream a;".to_vec());
        let b = RenderedConfig::new(b"upstream b;".to_vec());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), &Fingerprint::of(b"upstream a;"));
    }
}

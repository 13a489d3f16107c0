//! Template engines.
//!
//! The renderer only depends on the [`TemplateEngine`] contract: ordered
//! records in, bytes out. [`MiniJinjaEngine`] is the production engine.

use std::fs;
use std::path::Path;

use minijinja::{context, Environment, UndefinedBehavior};

use crate::render::{BackendEndpoint, RenderError};

/// Renders ordered backend records through a template.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_path: &Path, backends: &[BackendEndpoint]) -> Result<Vec<u8>, RenderError>;
}

/// Jinja-style templates rendered with minijinja.
///
/// The template is re-read on every call so edits are picked up on the
/// next tick. Records are exposed as `backends`:
///
/// ```text
/// {% for b in backends %}server {{ b.Node }}:{{ b.Port }};
/// {% endfor %}
/// ```
#[derive(Debug, Default, Clone)]
pub struct MiniJinjaEngine;

impl MiniJinjaEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_path: &Path, backends: &[BackendEndpoint]) -> Result<Vec<u8>, RenderError> {
        let source = fs::read_to_string(template_path).map_err(|source| RenderError::TemplateRead {
            path: template_path.to_path_buf(),
            source,
        })?;

        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        let output = env
            .render_str(&source, context! { backends => backends })
            .map_err(|e| RenderError::Template {
                path: template_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(output.into_bytes())
    }
}

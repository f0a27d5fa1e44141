//! Handlebars templates (synchronous renderer).

use std::sync::Arc;

use ::handlebars::Handlebars;
use anyhow::{Context, Result};

use super::{Renderer, TemplateContext, TemplateEngine};

/// Compiles `.handlebars` sources with the `handlebars` crate.
///
/// Each template gets its own registry: HTML escaping on, strict mode off
/// (missing bindings render empty).
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlebarsEngine;

impl TemplateEngine for HandlebarsEngine {
    fn compile(&self, source: &str, cx: &TemplateContext<'_>) -> Result<Renderer> {
        let name = cx.path.display().to_string();

        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry
            .register_template_string(&name, source)
            .with_context(|| format!("cannot compile handlebars template {name}"))?;

        let registry = Arc::new(registry);
        Ok(Renderer::sync(move |bindings| {
            registry
                .render(&name, bindings)
                .with_context(|| format!("cannot render {name}"))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn compile(source: &str) -> Result<Renderer> {
        let cx = TemplateContext {
            path: Path::new("/site/page.handlebars"),
            root: Path::new("/site"),
        };
        HandlebarsEngine.compile(source, &cx)
    }

    #[tokio::test]
    async fn test_render_escapes() {
        let renderer = compile("<h1>{{title}}</h1>").unwrap();
        assert!(!renderer.is_async());

        let html = renderer.render(json!({"title": "a < b"})).await.unwrap();
        assert_eq!(html, "<h1>a &lt; b</h1>");
    }

    #[tokio::test]
    async fn test_missing_binding_renders_empty() {
        let renderer = compile("<p>{{missing}}</p>").unwrap();
        assert_eq!(renderer.render(json!({})).await.unwrap(), "<p></p>");
    }

    #[tokio::test]
    async fn test_each_block() {
        let renderer = compile("{{#each items}}<li>{{this}}</li>{{/each}}").unwrap();
        let html = renderer.render(json!({"items": ["a", "b"]})).await.unwrap();
        assert_eq!(html, "<li>a</li><li>b</li>");
    }

    #[test]
    fn test_syntax_error() {
        let err = compile("{{#each items}}").unwrap_err();
        assert!(err.to_string().contains("page.handlebars"));
    }
}

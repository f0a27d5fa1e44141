//! Template engines and the uniform renderer they produce.
//!
//! Both engines compile source text into a [`Renderer`]. A renderer is either
//! synchronous (handlebars) or asynchronous (EJS, whose includes are read at
//! render time); callers never care which, they always `render(..).await`.

mod ejs;
mod handlebars;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

pub use self::ejs::EjsEngine;
pub use self::handlebars::HandlebarsEngine;

/// Which engine produced a template artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Ejs,
    Handlebars,
}

impl EngineKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ejs => "ejs",
            Self::Handlebars => "handlebars",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a template lives, for include resolution and diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    /// Absolute path of the template file.
    pub path: &'a Path,
    /// Load root; absolute include paths resolve against it.
    pub root: &'a Path,
}

/// Compiles template source text into a [`Renderer`].
pub trait TemplateEngine: Send + Sync {
    fn compile(&self, source: &str, cx: &TemplateContext<'_>) -> Result<Renderer>;
}

type SyncRender = dyn Fn(&Value) -> Result<String> + Send + Sync;
type AsyncRender = dyn Fn(Value) -> BoxFuture<'static, Result<String>> + Send + Sync;

/// A compiled template.
#[derive(Clone)]
pub enum Renderer {
    /// Produces its output immediately.
    Sync(Arc<SyncRender>),
    /// Produces its output once the returned future resolves.
    Async(Arc<AsyncRender>),
}

impl Renderer {
    pub fn sync<F>(render: F) -> Self
    where
        F: Fn(&Value) -> Result<String> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(render))
    }

    pub fn from_async<F>(render: F) -> Self
    where
        F: Fn(Value) -> BoxFuture<'static, Result<String>> + Send + Sync + 'static,
    {
        Self::Async(Arc::new(render))
    }

    /// Render with the given bindings.
    pub async fn render(&self, bindings: Value) -> Result<String> {
        match self {
            Self::Sync(render) => render(&bindings),
            Self::Async(render) => render(bindings).await,
        }
    }

    pub const fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_async() {
            "Renderer::Async"
        } else {
            "Renderer::Sync"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_render_uniform_call() {
        let sync = Renderer::sync(|v| Ok(format!("sync {}", v["n"])));
        let deferred = Renderer::from_async(|v| async move { Ok(format!("async {}", v["n"])) }.boxed());

        assert!(!sync.is_async());
        assert!(deferred.is_async());
        assert_eq!(sync.render(json!({"n": 1})).await.unwrap(), "sync 1");
        assert_eq!(deferred.render(json!({"n": 2})).await.unwrap(), "async 2");
    }

    #[test]
    fn test_engine_kind_display() {
        assert_eq!(EngineKind::Ejs.to_string(), "ejs");
        assert_eq!(
            serde_json::to_string(&EngineKind::Handlebars).unwrap(),
            "\"handlebars\""
        );
    }
}

//! Per-request resolution and rendering.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value};

use super::error::RenderError;
use super::index::SiteIndex;
use super::request::{Outcome, Request, Response};
use crate::asset::{Artifact, Payload};

/// Fallback `Cache-Control: max-age`, in seconds.
pub const DEFAULT_CACHE_SECONDS: u64 = 3600;

/// Per-request bindings callback.
pub type VarsResolver =
    Arc<dyn Fn(Arc<Artifact>, Request) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Options for [`Site::handle_request`](super::Site::handle_request).
///
/// Every field overrides the matching load-time default when set.
#[derive(Clone, Default)]
pub struct HandlerOptions {
    pub vars: Option<Value>,
    pub get_vars: Option<VarsResolver>,
    pub display_errors: Option<bool>,
    pub cache: Option<u64>,
}

impl HandlerOptions {
    /// Resolve template bindings per request, ahead of any static vars.
    pub fn with_get_vars<F, Fut>(mut self, get_vars: F) -> Self
    where
        F: Fn(Arc<Artifact>, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.get_vars = Some(Arc::new(move |artifact, request| {
            get_vars(artifact, request).boxed()
        }));
        self
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("vars", &self.vars)
            .field("get_vars", &self.get_vars.is_some())
            .field("display_errors", &self.display_errors)
            .field("cache", &self.cache)
            .finish()
    }
}

/// Resolves requests against one site. Cheap to clone.
#[derive(Clone)]
pub struct RequestHandler {
    index: Arc<SiteIndex>,
    vars: Arc<Value>,
    get_vars: Option<VarsResolver>,
    display_errors: bool,
    max_age: u64,
}

impl RequestHandler {
    pub(crate) fn new(index: Arc<SiteIndex>, options: HandlerOptions) -> Self {
        let vars = options
            .vars
            .or_else(|| index.vars.clone())
            .unwrap_or_else(|| Value::Object(Map::new()));
        let display_errors = options.display_errors.unwrap_or(index.display_errors);
        let max_age = options
            .cache
            .or(index.cache)
            .unwrap_or(DEFAULT_CACHE_SECONDS);

        Self {
            index,
            vars: Arc::new(vars),
            get_vars: options.get_vars,
            display_errors,
            max_age,
        }
    }

    /// Resolve one request.
    ///
    /// Misses and non-read-only methods answer 404 when errors are displayed
    /// and fall through with [`Outcome::Next`] otherwise.
    pub async fn handle(&self, request: &Request) -> Result<Outcome, RenderError> {
        if !request.method.is_read_only() {
            return Ok(self.miss());
        }

        let key = request.lookup_key();
        let Some(artifact) = self.index.lookup(&key) else {
            return Ok(self.miss());
        };

        let body = match &artifact.payload {
            Payload::Static(bytes) => bytes.clone(),
            Payload::Template(renderer) => {
                let bindings = self.bindings(artifact, request).await?;
                renderer
                    .render(bindings)
                    .await
                    .map_err(|source| RenderError::Template {
                        path: artifact.public_path.clone(),
                        source,
                    })?
                    .into_bytes()
            }
        };

        Ok(Outcome::Respond(Response::ok(
            artifact.content_type,
            self.max_age,
            body,
        )))
    }

    pub fn display_errors(&self) -> bool {
        self.display_errors
    }

    fn miss(&self) -> Outcome {
        if self.display_errors {
            Outcome::Respond(Response::not_found())
        } else {
            Outcome::Next
        }
    }

    /// Callback, then per-page vars, then default vars.
    async fn bindings(&self, artifact: &Arc<Artifact>, request: &Request) -> Result<Value, RenderError> {
        if let Some(get_vars) = &self.get_vars {
            return get_vars(Arc::clone(artifact), request.clone())
                .await
                .map_err(|source| RenderError::Bindings {
                    path: artifact.public_path.clone(),
                    source,
                });
        }
        if let Some(vars) = self.index.page_vars.get(&artifact.public_path) {
            return Ok(vars.clone());
        }
        Ok(self.vars.as_ref().clone())
    }
}

impl fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("artifacts", &self.index.artifacts.len())
            .field("display_errors", &self.display_errors)
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{LoadOptions, Method, RouteParams, Site, load};
    use anyhow::anyhow;
    use rustc_hash::FxHashMap;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn site(files: &[(&str, &str)], options: LoadOptions) -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let options = LoadOptions {
            minify: Some(false),
            ..options
        };
        let site = load(dir.path().to_path_buf(), options).unwrap();
        (dir, site)
    }

    fn body(outcome: &Outcome) -> String {
        String::from_utf8(outcome.response().unwrap().body.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_static_hit() {
        let (_dir, site) = site(&[("style.css", "a{}")], LoadOptions::default());
        let handler = site.handle_request(HandlerOptions::default());

        let outcome = handler.handle(&Request::get("/style.css")).await.unwrap();
        let response = outcome.response().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("Content-Type"), Some("text/css"));
        assert_eq!(response.header("Cache-Control"), Some("max-age=3600"));
        assert_eq!(response.body, b"a{}");
    }

    #[tokio::test]
    async fn test_post_never_served() {
        let (_dir, site) = site(&[("a.txt", "a")], LoadOptions::default());

        let quiet = site.handle_request(HandlerOptions::default());
        let post = Request::new(Method::Post, "/a.txt");
        assert_eq!(quiet.handle(&post).await.unwrap(), Outcome::Next);

        let loud = site.handle_request(HandlerOptions {
            display_errors: Some(true),
            ..HandlerOptions::default()
        });
        let outcome = loud.handle(&post).await.unwrap();
        assert_eq!(outcome.response().unwrap().status, 404);
        assert_eq!(body(&outcome), "404 - No such page");
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let (_dir, site) = site(&[("a.txt", "a")], LoadOptions {
            display_errors: true,
            ..LoadOptions::default()
        });

        let handler = site.handle_request(HandlerOptions::default());
        let outcome = handler.handle(&Request::get("/missing")).await.unwrap();
        assert_eq!(outcome.response().unwrap().status, 404);
        assert_eq!(
            outcome.response().unwrap().header("Content-Type"),
            Some("text/plain")
        );

        let handler = site.handle_request(HandlerOptions {
            display_errors: Some(false),
            ..HandlerOptions::default()
        });
        let outcome = handler.handle(&Request::get("/missing")).await.unwrap();
        assert_eq!(outcome, Outcome::Next);
    }

    #[tokio::test]
    async fn test_head_and_options_served() {
        let (_dir, site) = site(&[("a.txt", "a")], LoadOptions::default());
        let handler = site.handle_request(HandlerOptions::default());
        for method in [Method::Head, Method::Options] {
            let outcome = handler.handle(&Request::new(method, "/a.txt")).await.unwrap();
            assert_eq!(outcome.response().unwrap().status, 200);
        }
    }

    #[tokio::test]
    async fn test_root_template_and_params() {
        let (_dir, site) = site(
            &[
                ("index.handlebars", "<h1>{{title}}</h1>"),
                ("docs/guide.ejs", "<p><%= title %></p>"),
            ],
            LoadOptions {
                vars: Some(json!({"title": "Home"})),
                ..LoadOptions::default()
            },
        );
        let handler = site.handle_request(HandlerOptions::default());

        let outcome = handler.handle(&Request::get("/")).await.unwrap();
        assert_eq!(body(&outcome), "<h1>Home</h1>");
        assert_eq!(
            outcome.response().unwrap().header("Content-Type"),
            Some("text/html")
        );

        let request = Request::get("/unused").with_params(RouteParams {
            file: "docs".to_string(),
            rest: "/guide".to_string(),
        });
        let outcome = handler.handle(&request).await.unwrap();
        assert_eq!(body(&outcome), "<p>Home</p>");
    }

    #[tokio::test]
    async fn test_bindings_precedence() {
        let mut page_vars = FxHashMap::default();
        page_vars.insert("/about".to_string(), json!({"who": "page"}));

        let (_dir, site) = site(
            &[("about.ejs", "<%= who %>"), ("other.ejs", "<%= who %>")],
            LoadOptions {
                vars: Some(json!({"who": "index"})),
                page_vars,
                ..LoadOptions::default()
            },
        );

        let plain = site.handle_request(HandlerOptions::default());
        assert_eq!(body(&plain.handle(&Request::get("/about")).await.unwrap()), "page");
        assert_eq!(body(&plain.handle(&Request::get("/other")).await.unwrap()), "index");

        let overridden = site.handle_request(HandlerOptions {
            vars: Some(json!({"who": "handler"})),
            ..HandlerOptions::default()
        });
        assert_eq!(
            body(&overridden.handle(&Request::get("/other")).await.unwrap()),
            "handler"
        );

        let callback = site.handle_request(
            HandlerOptions::default().with_get_vars(|artifact, request| async move {
                Ok(json!({"who": format!("{} via {}", artifact.public_path, request.path)}))
            }),
        );
        assert_eq!(
            body(&callback.handle(&Request::get("/about")).await.unwrap()),
            "/about via /about"
        );
    }

    #[tokio::test]
    async fn test_render_errors_returned() {
        let (_dir, site) = site(&[("page.ejs", "<%= missing %>")], LoadOptions::default());

        let handler = site.handle_request(HandlerOptions::default());
        let err = handler.handle(&Request::get("/page")).await.unwrap_err();
        assert!(matches!(err, RenderError::Template { ref path, .. } if path == "/page"));

        let handler = site.handle_request(
            HandlerOptions::default()
                .with_get_vars(|_, _| async { Err(anyhow!("backend down")) }),
        );
        let err = handler.handle(&Request::get("/page")).await.unwrap_err();
        assert!(matches!(err, RenderError::Bindings { .. }));
    }

    #[tokio::test]
    async fn test_cache_precedence() {
        let (_dir, site) = site(&[("a.txt", "a")], LoadOptions {
            cache: Some(60),
            ..LoadOptions::default()
        });

        let index_default = site.handle_request(HandlerOptions::default());
        let outcome = index_default.handle(&Request::get("/a.txt")).await.unwrap();
        assert_eq!(outcome.response().unwrap().header("Cache-Control"), Some("max-age=60"));

        let overridden = site.handle_request(HandlerOptions {
            cache: Some(0),
            ..HandlerOptions::default()
        });
        let outcome = overridden.handle(&Request::get("/a.txt")).await.unwrap();
        assert_eq!(outcome.response().unwrap().header("Cache-Control"), Some("max-age=0"));
    }

    #[tokio::test]
    async fn test_percent_encoded_path() {
        let (_dir, site) = site(&[("my file.txt", "x")], LoadOptions::default());
        let handler = site.handle_request(HandlerOptions::default());
        let outcome = handler.handle(&Request::get("/my%20file.txt?v=2")).await.unwrap();
        assert_eq!(body(&outcome), "x");
    }
}

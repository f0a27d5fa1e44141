//! Per-file compilation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::stage::{Action, RULES, Rule};
use super::{Artifact, AssetError, AssetName, Payload, Stage};
use crate::config::ExecutionMode;
use crate::template::{EngineKind, TemplateContext};
use crate::toolchain::{StyleSyntax, Toolchain};
use crate::utils::mime::{self, types};
use crate::utils::path::{normalize_path, public_name};

/// Options for a one-off [`compile`] call.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// `None` follows [`ExecutionMode::from_env`].
    pub minify: Option<bool>,
    /// `None` uses [`Toolchain::default`].
    pub toolchain: Option<Arc<Toolchain>>,
}

/// Compile a single file.
///
/// `root` defaults to the file's own directory.
pub fn compile(
    path: &Path,
    root: Option<&Path>,
    options: &CompileOptions,
) -> Result<Artifact, AssetError> {
    let minify = options
        .minify
        .unwrap_or_else(|| ExecutionMode::from_env().minify_by_default());
    let toolchain = options.toolchain.clone().unwrap_or_default();
    Compiler::new(toolchain, minify).compile(path, root)
}

/// Compiles files with a fixed toolchain and minify setting.
#[derive(Debug, Clone)]
pub struct Compiler {
    toolchain: Arc<Toolchain>,
    minify: bool,
}

impl Compiler {
    pub fn new(toolchain: Arc<Toolchain>, minify: bool) -> Self {
        Self { toolchain, minify }
    }

    pub fn compile(&self, path: &Path, root: Option<&Path>) -> Result<Artifact, AssetError> {
        let path = normalize_path(path);
        let root = match root {
            Some(root) => normalize_path(root),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        let mut name = AssetName::parse(&public_name(&path, &root));
        let mut content = fs::read(&path).map_err(|err| AssetError::Read(path.clone(), err))?;
        let mut content_type = None;

        for rule in RULES {
            if !name.has_any(rule.markers) {
                continue;
            }
            match rule.action {
                Action::Script => {
                    let code = self
                        .toolchain
                        .script
                        .transform(&text(&content), &name.to_string())
                        .map_err(AssetError::transform(Stage::Script, &path))?;
                    content = code.into_bytes();
                    name.strip_and_append(rule.markers, rule.served);
                }
                Action::Template(kind) => {
                    return self.compile_template(kind, rule, name, &content, path, &root);
                }
                Action::Style => {
                    let syntax = if name.has("sass") {
                        StyleSyntax::Sass
                    } else {
                        StyleSyntax::Scss
                    };
                    let include_dir = path.parent().unwrap_or(&root);
                    let css = self
                        .toolchain
                        .style
                        .compile(&text(&content), syntax, include_dir)
                        .map_err(AssetError::transform(Stage::Style, &path))?;
                    content = css.into_bytes();
                    name.rewrite(rule.markers, rule.served);
                }
            }
            content_type = Some(rule.content_type);
        }

        if self.minify && name.last_marker().is_some_and(|m| m.eq_ignore_ascii_case("css")) {
            let css = self
                .toolchain
                .optimizer
                .optimize(&text(&content))
                .map_err(AssetError::transform(Stage::Optimize, &path))?;
            content = css.into_bytes();
        }

        let content_type = content_type
            .or_else(|| mime::from_extension(name.last_marker()))
            .unwrap_or(types::PLAIN);

        if self.minify {
            content = super::minify::minify(content, content_type, self.toolchain.minifier.as_ref())
                .map_err(AssetError::transform(Stage::Minify, &path))?;
        }

        Ok(Artifact {
            public_path: name.to_string(),
            content_type,
            payload: Payload::Static(content),
            engine: None,
            source_path: path,
        })
    }

    /// Template sources are minified before compilation, never after render.
    fn compile_template(
        &self,
        kind: EngineKind,
        rule: &Rule,
        mut name: AssetName,
        content: &[u8],
        path: PathBuf,
        root: &Path,
    ) -> Result<Artifact, AssetError> {
        let mut source = text(content).into_owned();
        if self.minify {
            source = self
                .toolchain
                .minifier
                .markup(&source)
                .map_err(AssetError::transform(Stage::Minify, &path))?;
        }

        name.rewrite(rule.markers, rule.served);

        let cx = TemplateContext {
            path: &path,
            root,
        };
        let renderer = self
            .toolchain
            .engine(kind)
            .compile(&source, &cx)
            .map_err(AssetError::transform(Stage::Template(kind), &path))?;

        Ok(Artifact {
            public_path: name.to_string(),
            content_type: rule.content_type,
            payload: Payload::Template(renderer),
            engine: Some(kind),
            source_path: path,
        })
    }
}

fn text(content: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::{Minifier, ScriptTransform, StyleOptimizer};
    use anyhow::Result;
    use serde_json::json;
    use tempfile::TempDir;

    /// Passes script through untouched.
    struct Identity;

    impl ScriptTransform for Identity {
        fn transform(&self, source: &str, _file_name: &str) -> Result<String> {
            Ok(source.to_string())
        }
    }

    /// Marks its input so tests can see whether it ran.
    struct Marking;

    impl StyleOptimizer for Marking {
        fn optimize(&self, css: &str) -> Result<String> {
            Ok(format!("/*optimized*/{css}"))
        }
    }

    /// Leaves every family untouched, or rejects styles.
    struct StubMinifier {
        reject_style: bool,
    }

    impl Minifier for StubMinifier {
        fn markup(&self, html: &str) -> Result<String> {
            Ok(html.to_string())
        }
        fn style(&self, css: &str) -> Result<String> {
            if self.reject_style {
                anyhow::bail!("unexpected token")
            }
            Ok(css.to_string())
        }
        fn script(&self, js: &str) -> Result<String> {
            Ok(js.to_string())
        }
    }

    fn compiler(minify: bool) -> Compiler {
        Compiler::new(Arc::new(Toolchain::default()), minify)
    }

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_static_round_trip() {
        let dir = TempDir::new().unwrap();
        let bytes = [0x89, b'P', b'N', b'G', 0, 1, 2, 0xff];
        let png = write(&dir, "img/logo.png", &bytes);
        let txt = write(&dir, "notes.txt", b"  keep   spacing \n");

        let artifact = compiler(false).compile(&png, Some(dir.path())).unwrap();
        assert_eq!(artifact.public_path, "/img/logo.png");
        assert_eq!(artifact.content_type, "image/png");
        assert_eq!(artifact.content(), Some(&bytes[..]));
        assert!(!artifact.is_template());

        let artifact = compiler(false).compile(&txt, Some(dir.path())).unwrap();
        assert_eq!(artifact.content_type, "text/plain");
        assert_eq!(artifact.content(), Some(&b"  keep   spacing \n"[..]));
    }

    #[test]
    fn test_unknown_extension_is_plain_text() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "LICENSE", b"MIT");
        let artifact = compiler(false).compile(&path, None).unwrap();
        assert_eq!(artifact.public_path, "/LICENSE");
        assert_eq!(artifact.content_type, "text/plain");
    }

    #[test]
    fn test_ejs_template() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "page.ejs", b"<p><%= name %></p>");

        let artifact = compiler(false).compile(&path, Some(dir.path())).unwrap();
        assert_eq!(artifact.public_path, "/page.html");
        assert_eq!(artifact.content_type, "text/html");
        assert_eq!(artifact.engine, Some(EngineKind::Ejs));
        assert!(artifact.is_template());
        assert!(artifact.content().is_none());
    }

    #[test]
    fn test_html_marker_not_doubled() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "about.html.handlebars", b"<p>{{x}}</p>");
        let artifact = compiler(false).compile(&path, Some(dir.path())).unwrap();
        assert_eq!(artifact.public_path, "/about.html");
        assert_eq!(artifact.engine, Some(EngineKind::Handlebars));
    }

    #[tokio::test]
    async fn test_template_render_deterministic() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "page.handlebars", b"<h1>{{title}}</h1>\n<p>static</p>");

        let artifact = compiler(false).compile(&path, None).unwrap();
        let renderer = artifact.renderer().unwrap();
        let first = renderer.render(json!({})).await.unwrap();
        let second = renderer.render(json!({})).await.unwrap();
        assert_eq!(first, "<h1></h1>\n<p>static</p>");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_template_source_minified() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "page.ejs", b"<div>\n  <p><%= a %></p>\n</div>\n");

        let artifact = compiler(true).compile(&path, None).unwrap();
        let html = artifact.renderer().unwrap().render(json!({"a": "x"})).await.unwrap();
        assert_eq!(html, "<div><p>x</p></div>");
    }

    #[test]
    fn test_jsx_lowered() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "app.jsx", b"const el = <p>hi</p>;\n");

        let artifact = compiler(false).compile(&path, None).unwrap();
        assert_eq!(artifact.public_path, "/app.js");
        assert_eq!(artifact.content_type, "application/javascript");
        let code = String::from_utf8(artifact.content().unwrap().to_vec()).unwrap();
        assert!(!code.contains("<p>"));
    }

    #[test]
    fn test_script_minify_failure_keeps_transformed() {
        let dir = TempDir::new().unwrap();
        let source = b"let = broken (;\n";
        let path = write(&dir, "broken.js", source);

        let toolchain = Toolchain::default().with_script(Identity);
        let artifact = Compiler::new(Arc::new(toolchain), true)
            .compile(&path, None)
            .unwrap();
        assert_eq!(artifact.public_path, "/broken.js");
        assert_eq!(artifact.content(), Some(&source[..]));
    }

    #[test]
    fn test_json_is_not_a_script() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "data.json", b"{ \"a\": 1 }");
        let artifact = compiler(false).compile(&path, None).unwrap();
        assert_eq!(artifact.public_path, "/data.json");
        assert_eq!(artifact.content_type, "application/json");
        assert_eq!(artifact.content(), Some(&b"{ \"a\": 1 }"[..]));
    }

    #[test]
    fn test_scss_compiled() {
        let dir = TempDir::new().unwrap();
        write(&dir, "css/_vars.scss", b"$fg: red;");
        let path = write(&dir, "css/site.scss", b"@import 'vars';\n.a { .b { color: $fg; } }");

        let artifact = compiler(false).compile(&path, Some(dir.path())).unwrap();
        assert_eq!(artifact.public_path, "/css/site.css");
        assert_eq!(artifact.content_type, "text/css");
        let css = String::from_utf8(artifact.content().unwrap().to_vec()).unwrap();
        assert!(css.contains(".a .b"));
        assert!(css.contains("red"));
    }

    #[test]
    fn test_style_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.scss", b".a { color: ");
        let err = compiler(false).compile(&path, None).unwrap_err();
        assert!(matches!(err, AssetError::Transform { stage: Stage::Style, .. }));
    }

    #[test]
    fn test_css_minified_and_prefixed() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.css", b".a {\n  user-select: none;\n}\n");
        let artifact = compiler(true).compile(&path, None).unwrap();
        let css = String::from_utf8(artifact.content().unwrap().to_vec()).unwrap();
        assert!(css.contains("-webkit-user-select:none"));
        assert!(!css.contains('\n'));
    }

    #[test]
    fn test_missing_file() {
        let err = compiler(false)
            .compile(Path::new("/definitely/not/here.txt"), None)
            .unwrap_err();
        assert!(matches!(err, AssetError::Read(..)));
    }

    #[test]
    fn test_compile_options_override() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.css", b"a {\n  color: red;\n}\n");
        let options = CompileOptions {
            minify: Some(true),
            toolchain: None,
        };
        let artifact = compile(&path, None, &options).unwrap();
        assert_eq!(artifact.content(), Some(&b"a{color:red}"[..]));
    }

    #[test]
    fn test_optimizer_runs_only_when_minifying_css() {
        let dir = TempDir::new().unwrap();
        let css = write(&dir, "a.css", b"a{color:red}");
        let txt = write(&dir, "a.txt", b"a{color:red}");
        let toolchain = Toolchain::default()
            .with_optimizer(Marking)
            .with_minifier(StubMinifier { reject_style: false });
        let toolchain = Arc::new(toolchain);

        let off = Compiler::new(Arc::clone(&toolchain), false).compile(&css, None).unwrap();
        assert_eq!(off.content(), Some(&b"a{color:red}"[..]));

        let on = Compiler::new(Arc::clone(&toolchain), true).compile(&txt, None).unwrap();
        assert_eq!(on.content(), Some(&b"a{color:red}"[..]));

        let on = Compiler::new(toolchain, true).compile(&css, None).unwrap();
        assert_eq!(on.content(), Some(&b"/*optimized*/a{color:red}"[..]));
    }

    #[test]
    fn test_optimizer_marker_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "STYLE.CSS", b"a{color:red}");
        let toolchain = Toolchain::default()
            .with_optimizer(Marking)
            .with_minifier(StubMinifier { reject_style: false });

        let artifact = Compiler::new(Arc::new(toolchain), true)
            .compile(&path, None)
            .unwrap();
        assert_eq!(artifact.public_path, "/STYLE.CSS");
        assert_eq!(artifact.content_type, "text/css");
        assert_eq!(artifact.content(), Some(&b"/*optimized*/a{color:red}"[..]));
    }

    #[test]
    fn test_style_minify_failure_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.css", b"a { color: red; }");
        let toolchain = Toolchain::default().with_minifier(StubMinifier { reject_style: true });

        let err = Compiler::new(Arc::new(toolchain), true)
            .compile(&path, None)
            .unwrap_err();
        assert!(matches!(err, AssetError::Transform { stage: Stage::Minify, .. }));
        assert!(err.to_string().contains("minify"));
    }
}

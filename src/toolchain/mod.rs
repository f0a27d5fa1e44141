//! External transform collaborators behind narrow traits.
//!
//! The compiler only ever talks to these traits. [`Toolchain::default`]
//! wires the native backends:
//!
//! | concern            | trait             | backend                         |
//! |--------------------|-------------------|---------------------------------|
//! | JSX / JS lowering  | [`ScriptTransform`] | oxc transformer               |
//! | SASS / SCSS        | [`StyleCompiler`]   | grass                         |
//! | CSS prefixing      | [`StyleOptimizer`]  | lightningcss                  |
//! | minification       | [`Minifier`]        | markup minifier, lightningcss, oxc |
//! | templates          | [`TemplateEngine`]  | EJS engine, handlebars        |

pub mod minify;
pub mod script;
pub mod style;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::template::{EjsEngine, EngineKind, HandlebarsEngine, TemplateEngine};

pub use minify::NativeMinifier;
pub use script::OxcScriptTransform;
pub use style::{GrassCompiler, LightningOptimizer, StyleSyntax};

/// Lowers modern JS / JSX into browser-ready script text.
pub trait ScriptTransform: Send + Sync {
    /// `file_name` is the public name, used for diagnostics only.
    fn transform(&self, source: &str, file_name: &str) -> Result<String>;
}

/// Compiles SASS or SCSS into CSS.
pub trait StyleCompiler: Send + Sync {
    /// `include_dir` is the directory `@use`/`@import` paths resolve against.
    fn compile(&self, source: &str, syntax: StyleSyntax, include_dir: &Path) -> Result<String>;
}

/// Post-processes CSS (vendor prefixes, compatibility rewrites).
pub trait StyleOptimizer: Send + Sync {
    fn optimize(&self, css: &str) -> Result<String>;
}

/// One text minifier per content family.
pub trait Minifier: Send + Sync {
    fn markup(&self, html: &str) -> Result<String>;
    fn style(&self, css: &str) -> Result<String>;
    fn script(&self, js: &str) -> Result<String>;
}

/// The set of collaborators a compile run uses.
#[derive(Clone)]
pub struct Toolchain {
    pub script: Arc<dyn ScriptTransform>,
    pub style: Arc<dyn StyleCompiler>,
    pub optimizer: Arc<dyn StyleOptimizer>,
    pub minifier: Arc<dyn Minifier>,
    pub ejs: Arc<dyn TemplateEngine>,
    pub handlebars: Arc<dyn TemplateEngine>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            script: Arc::new(OxcScriptTransform::default()),
            style: Arc::new(GrassCompiler),
            optimizer: Arc::new(LightningOptimizer::default()),
            minifier: Arc::new(NativeMinifier),
            ejs: Arc::new(EjsEngine),
            handlebars: Arc::new(HandlebarsEngine),
        }
    }
}

impl Toolchain {
    /// Template engine for the given kind.
    pub fn engine(&self, kind: EngineKind) -> &dyn TemplateEngine {
        match kind {
            EngineKind::Ejs => self.ejs.as_ref(),
            EngineKind::Handlebars => self.handlebars.as_ref(),
        }
    }

    pub fn with_script(mut self, script: impl ScriptTransform + 'static) -> Self {
        self.script = Arc::new(script);
        self
    }

    pub fn with_optimizer(mut self, optimizer: impl StyleOptimizer + 'static) -> Self {
        self.optimizer = Arc::new(optimizer);
        self
    }

    pub fn with_minifier(mut self, minifier: impl Minifier + 'static) -> Self {
        self.minifier = Arc::new(minifier);
        self
    }
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain").finish_non_exhaustive()
    }
}

//! Script lowering with the oxc transformer.
//!
//! Parses every script as an ES module with JSX enabled, lowers syntax to the
//! configured target and compiles JSX with the classic runtime, so element
//! calls go through a plain factory function (`React.createElement` unless a
//! pragma is configured).

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use oxc::allocator::Allocator;
use oxc::codegen::Codegen;
use oxc::diagnostics::OxcDiagnostic;
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::{JsxRuntime, TransformOptions, Transformer};

use super::ScriptTransform;

/// Default syntax target for lowered scripts.
pub const DEFAULT_TARGET: &str = "es2015";

/// oxc-backed [`ScriptTransform`].
#[derive(Debug, Clone)]
pub struct OxcScriptTransform {
    /// JSX factory for the classic runtime (`h`, `Preact.h`, ...).
    pub pragma: Option<String>,
    /// Syntax target understood by oxc (`es2015`, `es2020`, `chrome80`, ...).
    pub target: String,
}

impl Default for OxcScriptTransform {
    fn default() -> Self {
        Self {
            pragma: None,
            target: DEFAULT_TARGET.to_string(),
        }
    }
}

impl OxcScriptTransform {
    pub fn new(pragma: Option<String>, target: impl Into<String>) -> Self {
        Self {
            pragma,
            target: target.into(),
        }
    }

    fn options(&self) -> Result<TransformOptions> {
        let mut options = TransformOptions::from_target(&self.target)
            .map_err(|err| anyhow!("invalid script target `{}`: {err:?}", self.target))?;
        options.jsx.jsx_plugin = true;
        options.jsx.runtime = JsxRuntime::Classic;
        if let Some(pragma) = &self.pragma {
            options.jsx.pragma = Some(pragma.clone());
        }
        Ok(options)
    }
}

impl ScriptTransform for OxcScriptTransform {
    fn transform(&self, source: &str, file_name: &str) -> Result<String> {
        let allocator = Allocator::default();
        let source_type = SourceType::mjs().with_jsx(true);

        let ret = Parser::new(&allocator, source, source_type).parse();
        if !ret.errors.is_empty() {
            bail!("syntax error in {file_name}: {}", join_diagnostics(&ret.errors));
        }
        let mut program = ret.program;

        let scoping = SemanticBuilder::new()
            .build(&program)
            .semantic
            .into_scoping();

        let options = self.options()?;
        let ret = Transformer::new(&allocator, Path::new(file_name), &options)
            .build_with_scoping(scoping, &mut program);
        if !ret.errors.is_empty() {
            bail!("cannot lower {file_name}: {}", join_diagnostics(&ret.errors));
        }

        Ok(Codegen::new().build(&program).code)
    }
}

fn join_diagnostics(errors: &[OxcDiagnostic]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

//! Native minifiers: markup (minify-html), CSS (lightningcss), JS (oxc).

mod markup;

use anyhow::{Result, anyhow, bail};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{
    CompressOptions, CompressOptionsKeepNames, CompressOptionsUnused, Minifier as OxcMinifier,
    MinifierOptions,
};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::Minifier;

pub use markup::minify_markup;

/// Built-in [`Minifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeMinifier;

impl Minifier for NativeMinifier {
    fn markup(&self, html: &str) -> Result<String> {
        minify_markup(html, self)
    }

    fn style(&self, css: &str) -> Result<String> {
        minify_css(css)
    }

    fn script(&self, js: &str) -> Result<String> {
        minify_js(js)
    }
}

/// Minify JavaScript source code.
///
/// Sources are classic scripts: top-level declarations are globals the page
/// may call, so they keep their names and are never dropped as unused.
pub fn minify_js(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::script();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(err) = ret.errors.first() {
        bail!("cannot minify script: {err}");
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: Some(false),
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions {
            unused: CompressOptionsUnused::Keep,
            keep_names: CompressOptionsKeepNames::all_true(),
            ..CompressOptions::smallest()
        }),
    };
    let ret = OxcMinifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String> {
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|err| anyhow!("{err}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|err| anyhow!("{err}"))?;
    Ok(result.code)
}

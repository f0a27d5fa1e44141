//! Style preprocessing (grass) and post-processing (lightningcss).

use std::path::Path;

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use super::{StyleCompiler, StyleOptimizer};

/// SASS dialect of a style source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSyntax {
    /// Brace syntax (`.scss`).
    Scss,
    /// Indented syntax (`.sass`).
    Sass,
}

/// grass-backed [`StyleCompiler`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GrassCompiler;

impl StyleCompiler for GrassCompiler {
    fn compile(&self, source: &str, syntax: StyleSyntax, include_dir: &Path) -> Result<String> {
        let input_syntax = match syntax {
            StyleSyntax::Scss => grass::InputSyntax::Scss,
            StyleSyntax::Sass => grass::InputSyntax::Sass,
        };
        let options = grass::Options::default()
            .load_path(include_dir)
            .input_syntax(input_syntax);
        grass::from_string(source, &options).map_err(|err| anyhow!("{err}"))
    }
}

/// Encode a browser version the way lightningcss expects (`major << 16`).
const fn version(major: u32) -> Option<u32> {
    Some(major << 16)
}

/// lightningcss-backed [`StyleOptimizer`]: adds vendor prefixes and
/// compatibility fallbacks for `browsers`, keeping the output readable.
#[derive(Debug, Clone, Copy)]
pub struct LightningOptimizer {
    pub browsers: Browsers,
}

impl Default for LightningOptimizer {
    fn default() -> Self {
        Self {
            browsers: Browsers {
                android: version(100),
                chrome: version(87),
                edge: version(88),
                firefox: version(78),
                ios_saf: version(13),
                opera: version(73),
                safari: version(13),
                samsung: version(14),
                ..Browsers::default()
            },
        }
    }
}

impl StyleOptimizer for LightningOptimizer {
    fn optimize(&self, css: &str) -> Result<String> {
        let targets = Targets::from(self.browsers);
        let mut stylesheet =
            StyleSheet::parse(css, ParserOptions::default()).map_err(|err| anyhow!("{err}"))?;
        stylesheet
            .minify(MinifyOptions {
                targets: targets.clone(),
                ..MinifyOptions::default()
            })
            .map_err(|err| anyhow!("{err}"))?;
        let result = stylesheet
            .to_css(PrinterOptions {
                targets,
                ..PrinterOptions::default()
            })
            .map_err(|err| anyhow!("{err}"))?;
        Ok(result.code)
    }
}

//! Content-type driven minification.
//!
//! Script minification is best-effort: on failure the input is returned
//! unchanged. Markup and style failures propagate.

use anyhow::Result;

use crate::debug;
use crate::toolchain::Minifier;
use crate::utils::mime::types;

/// Minify `content` according to its content type.
pub fn minify(content: Vec<u8>, content_type: &str, minifier: &dyn Minifier) -> Result<Vec<u8>> {
    let minified = match content_type {
        types::HTML => minifier.markup(&text(&content))?,
        types::CSS => minifier.style(&text(&content))?,
        types::JAVASCRIPT => match minifier.script(&text(&content)) {
            Ok(code) => code,
            Err(err) => {
                debug!("minify"; "keeping unminified script: {err}");
                return Ok(content);
            }
        },
        _ => return Ok(content),
    };
    Ok(minified.into_bytes())
}

fn text(content: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(content)
}

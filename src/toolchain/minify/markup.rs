//! Markup minification.
//!
//! Structure (whitespace, comments, default attributes, quoting) is handled
//! by `minify-html` with template syntax preserved, so `<% %>` and `{{ }}`
//! survive pre-compilation minification. Embedded `<style>` and `<script>`
//! bodies are left untouched there and go through the toolchain's
//! [`Minifier`] afterwards:
//! - style failures propagate
//! - script failures keep the block as written

use anyhow::{Context, Result};

use crate::toolchain::Minifier;
use crate::utils::html::parse_attributes;

/// Elements whose body is not markup.
const RAW_TEXT: [&str; 2] = ["script", "style"];

/// Minify an HTML document (or template source).
pub fn minify_markup(html: &str, minifier: &dyn Minifier) -> Result<String> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = false;
    cfg.minify_js = false;
    cfg.preserve_brace_template_syntax = true;
    cfg.preserve_chevron_percent_template_syntax = true;

    let structural = minify_html::minify(html.as_bytes(), &cfg);
    let structural = String::from_utf8(structural).context("minified markup is not UTF-8")?;
    minify_embedded(&structural, minifier)
}

/// Run embedded style and script bodies through `minifier`.
fn minify_embedded(html: &str, minifier: &dyn Minifier) -> Result<String> {
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some((start, name)) = find_raw_open(&lower, pos) {
        let Some(open_end) = tag_end(html, start) else {
            break;
        };
        let close = lower[open_end..]
            .find(&format!("</{name}"))
            .map_or(html.len(), |i| open_end + i);

        let attrs = html[start + 1 + name.len()..open_end - 1].trim_end_matches('/');
        out.push_str(&html[pos..open_end]);
        out.push_str(&minify_body(name, attrs, &html[open_end..close], minifier)?);
        pos = close;
    }

    out.push_str(&html[pos..]);
    Ok(out)
}

/// Next `<script` or `<style` start tag at or after `from`.
fn find_raw_open(lower: &str, from: usize) -> Option<(usize, &'static str)> {
    let mut search = from;
    while let Some(i) = lower[search..].find('<') {
        let at = search + i;
        let rest = &lower[at + 1..];
        for name in RAW_TEXT {
            let Some(after) = rest.strip_prefix(name) else {
                continue;
            };
            if after.starts_with(|c: char| c == '>' || c == '/' || c.is_ascii_whitespace()) {
                return Some((at, name));
            }
        }
        search = at + 1;
    }
    None
}

/// Offset just past the `>` closing the tag at `start`, skipping quoted values.
fn tag_end(html: &str, start: usize) -> Option<usize> {
    let mut quote = None;
    for (i, c) in html[start..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(start + i + 1),
            (None, _) => {}
        }
    }
    None
}

fn minify_body(name: &str, attrs: &str, body: &str, minifier: &dyn Minifier) -> Result<String> {
    if body.trim().is_empty() || has_template_tags(body) {
        return Ok(body.to_string());
    }
    match name {
        "style" => minifier
            .style(body)
            .context("cannot minify embedded <style> block"),
        _ if is_javascript(attrs) => Ok(minifier
            .script(body)
            .unwrap_or_else(|_| body.to_string())),
        _ => Ok(body.to_string()),
    }
}

/// No `type`, or a JavaScript one.
fn is_javascript(attrs: &str) -> bool {
    parse_attributes(attrs)
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("type"))
        .and_then(|(_, value)| value)
        .is_none_or(|ty| {
            matches!(
                ty.trim().to_ascii_lowercase().as_str(),
                "" | "text/javascript" | "application/javascript"
            )
        })
}

fn has_template_tags(s: &str) -> bool {
    s.contains("<%") || s.contains("{{")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::NativeMinifier;
    use anyhow::bail;

    /// Minifier whose style and script passes always fail.
    struct Failing;

    impl Minifier for Failing {
        fn markup(&self, html: &str) -> Result<String> {
            minify_markup(html, self)
        }
        fn style(&self, _css: &str) -> Result<String> {
            bail!("style rejected")
        }
        fn script(&self, _js: &str) -> Result<String> {
            bail!("script rejected")
        }
    }

    fn minify(html: &str) -> String {
        minify_markup(html, &NativeMinifier).unwrap()
    }

    #[test]
    fn test_collapse_whitespace() {
        let html = "<div>\n  <p>Hello   <b>world</b></p>\n</div>\n";
        assert_eq!(minify(html), "<div><p>Hello <b>world</b></p></div>");
    }

    #[test]
    fn test_comments_removed() {
        assert_eq!(minify("<p>a<!-- note -->b</p>"), "<p>ab</p>");
    }

    #[test]
    fn test_default_script_type_dropped() {
        let out = minify(r#"<script type="text/javascript" src="a.js"></script>"#);
        assert!(!out.contains("text/javascript"));
        assert!(out.contains("a.js"));
    }

    #[test]
    fn test_preformatted_preserved() {
        let out = minify("<div>\n  <pre>  a\n    b </pre>\n</div>");
        assert!(out.contains("<pre>  a\n    b </pre>"));
    }

    #[test]
    fn test_embedded_style_minified() {
        let html = "<style>\n  body { color: red; }\n</style>";
        assert_eq!(minify(html), "<style>body{color:red}</style>");
    }

    #[test]
    fn test_top_level_functions_survive() {
        let html = "<button onclick=\"init()\">go</button><script>function init() { document.title = 'x'; }</script>";
        let out = minify(html);
        assert!(out.contains("init()"));
        assert!(out.contains("function init("));
        assert!(out.contains("document.title"));
    }

    #[test]
    fn test_embedded_script_failure_keeps_block() {
        let out = minify_markup("<script>var = ;</script>", &Failing).unwrap();
        assert_eq!(out, "<script>var = ;</script>");
    }

    #[test]
    fn test_embedded_style_failure_propagates() {
        let result = minify_markup("<style>a { color: red }</style>", &Failing);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_js_script_untouched() {
        let out = minify_markup(
            r#"<script type="application/ld+json">{ "a": 1 }</script>"#,
            &Failing,
        )
        .unwrap();
        assert!(out.contains(r#">{ "a": 1 }</script>"#));
    }

    #[test]
    fn test_template_tags_pass_through() {
        let out = minify("<p class=\"<%= cls %>\">\n  <%= name %>\n</p>");
        assert!(out.contains("<%= cls %>"));
        assert!(out.contains("<%= name %>"));

        let out = minify("<ul>\n  {{#each items}}\n    <li>{{this}}</li>\n  {{/each}}\n</ul>");
        assert!(out.contains("{{#each items}}"));
        assert!(out.contains("<li>{{this}}</li>"));
        assert!(out.contains("{{/each}}"));
    }

    #[test]
    fn test_script_with_template_tags_untouched() {
        let html = "<script>var user = <%- json %>;</script>";
        let out = minify_embedded(html, &Failing).unwrap();
        assert_eq!(out, html);
    }

    #[test]
    fn test_tag_end_skips_quoted_gt() {
        let html = r#"<script data-x="a>b">x</script>"#;
        assert_eq!(tag_end(html, 0), Some(21));
    }
}

//! Shared helpers for paths, MIME types and HTML.

pub mod html;
pub mod mime;
pub mod path;

/// Return "s" suffix for plural counts.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization (`3 assets`, `1 asset`).
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

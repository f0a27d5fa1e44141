//! Public-path rules: extension hiding, skip filter, request normalization.

use std::path::Path;

use percent_encoding::percent_decode_str;

use crate::utils::path::to_slash;

/// Serve markup at extensionless routes.
///
/// `/a/index.html` → `/a`, `/about.html` → `/about`, `/index.html` → `/`.
pub fn hide_html_extension(path: &str) -> String {
    let hidden = path
        .strip_suffix("/index.html")
        .or_else(|| path.strip_suffix(".html"))
        .unwrap_or(path);

    if hidden.is_empty() {
        "/".to_string()
    } else {
        hidden.to_string()
    }
}

/// Whether `path` contains any `skip` fragment as `/<fragment>`.
pub fn is_skipped(path: &Path, skip: &[String]) -> bool {
    if skip.is_empty() {
        return false;
    }
    let path = to_slash(path);
    skip.iter()
        .map(|fragment| fragment.trim_matches('/'))
        .filter(|fragment| !fragment.is_empty())
        .any(|fragment| path.contains(&format!("/{fragment}")))
}

/// Decode a raw request target into an index key: strip query and
/// fragment, percent-decode, ensure a leading `/`.
pub fn normalize_request_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let decoded = percent_decode_str(&raw[..end]).decode_utf8_lossy();

    if decoded.starts_with('/') {
        decoded.into_owned()
    } else {
        format!("/{decoded}")
    }
}

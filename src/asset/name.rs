//! Working public names and their extension markers.
//!
//! A name like `/blog/post.html.ejs` splits into a directory (`/blog/`), a
//! stem (`post`) and the dot-separated markers after it (`html`, `ejs`).
//! Stages test and rewrite markers; the directory and stem never change.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName {
    dir: String,
    stem: String,
    markers: Vec<String>,
}

impl AssetName {
    pub fn parse(name: &str) -> Self {
        let (dir, file) = name.rsplit_once('/').map_or(("", name), |(d, f)| (d, f));
        let dir = format!("{dir}/");

        // A leading dot belongs to the stem (`/.htaccess` has no markers).
        let split = file
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '.')
            .map(|(i, _)| i);

        match split {
            Some(i) => Self {
                dir,
                stem: file[..i].to_string(),
                markers: file[i + 1..].split('.').map(str::to_string).collect(),
            },
            None => Self {
                dir,
                stem: file.to_string(),
                markers: Vec::new(),
            },
        }
    }

    /// Whether `marker` is one of the name's extension segments.
    pub fn has(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m.eq_ignore_ascii_case(marker))
    }

    pub fn has_any(&self, markers: &[&str]) -> bool {
        markers.iter().any(|m| self.has(m))
    }

    pub fn last_marker(&self) -> Option<&str> {
        self.markers.last().map(String::as_str)
    }

    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    /// Drop every marker in `from`, then append `to` once.
    pub fn strip_and_append(&mut self, from: &[&str], to: &str) {
        self.markers
            .retain(|m| !from.iter().any(|f| m.eq_ignore_ascii_case(f)));
        if !self.has(to) {
            self.markers.push(to.to_string());
        }
    }

    /// Replace markers in `from` with `to`, in place.
    ///
    /// The first match becomes `to` unless `to` is already present, in which
    /// case every match is dropped (`page.html.ejs` → `page.html`).
    pub fn rewrite(&mut self, from: &[&str], to: &str) {
        let mut pending = !self.has(to);
        self.markers.retain_mut(|m| {
            if !from.iter().any(|f| m.eq_ignore_ascii_case(f)) {
                return true;
            }
            if pending {
                pending = false;
                *m = to.to_string();
                return true;
            }
            false
        });
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir)?;
        f.write_str(&self.stem)?;
        for marker in &self.markers {
            write!(f, ".{marker}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markers() {
        let name = AssetName::parse("/blog/post.html.ejs");
        assert!(name.has("ejs"));
        assert!(name.has("html"));
        assert!(!name.has("js"));
        assert_eq!(name.last_marker(), Some("ejs"));
        assert_eq!(name.to_string(), "/blog/post.html.ejs");
    }

    #[test]
    fn test_markers_are_segments() {
        let name = AssetName::parse("/data.json");
        assert!(!name.has("js"));
        assert!(name.has("json"));

        let dotfile = AssetName::parse("/.htaccess");
        assert_eq!(dotfile.last_marker(), None);
        assert_eq!(dotfile.to_string(), "/.htaccess");
    }

    #[test]
    fn test_strip_and_append() {
        let mut name = AssetName::parse("/app.jsx");
        name.strip_and_append(&["jsx", "js"], "js");
        assert_eq!(name.to_string(), "/app.js");

        let mut name = AssetName::parse("/vendor.min.js");
        name.strip_and_append(&["jsx", "js"], "js");
        assert_eq!(name.to_string(), "/vendor.min.js");
    }

    #[test]
    fn test_rewrite() {
        let mut name = AssetName::parse("/page.ejs");
        name.rewrite(&["ejs"], "html");
        assert_eq!(name.to_string(), "/page.html");

        let mut name = AssetName::parse("/page.html.ejs");
        name.rewrite(&["ejs"], "html");
        assert_eq!(name.to_string(), "/page.html");

        let mut name = AssetName::parse("/theme.scss");
        name.rewrite(&["sass", "scss"], "css");
        assert_eq!(name.to_string(), "/theme.css");
    }
}

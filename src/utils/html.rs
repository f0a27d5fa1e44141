//! HTML utility functions.
//!
//! - `escape()` - HTML entity escaping (templates, error page)
//! - `parse_attributes()` - attribute string parsing (markup minifier)

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&#34;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Attribute Parsing
// =============================================================================

/// Parse HTML attributes from the inside of a start tag.
///
/// Input: `class="foo" data-x='1' disabled`
/// Output: `[("class", Some("foo")), ("data-x", Some("1")), ("disabled", None)]`
pub fn parse_attributes(s: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() || c == '/' {
            continue;
        }

        let mut name = String::from(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next.is_whitespace() || next == '/' {
                break;
            }
            name.push(next);
            chars.next();
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        if chars.next_if_eq(&'=').is_none() {
            attrs.push((name, None));
            continue;
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        match chars.next_if(|c| *c == '"' || *c == '\'') {
            Some(quote) => {
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    value.push(c);
                }
            }
            None => {
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    value.push(c);
                }
            }
        }
        attrs.push((name, Some(value)));
    }

    attrs
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain() {
        assert!(matches!(escape("hello world"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("say \"hi\""), "say &#34;hi&#34;");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#"a="1" b='2 3' c=4 disabled alt="""#);
        assert_eq!(
            attrs,
            vec![
                ("a".to_string(), Some("1".to_string())),
                ("b".to_string(), Some("2 3".to_string())),
                ("c".to_string(), Some("4".to_string())),
                ("disabled".to_string(), None),
                ("alt".to_string(), Some(String::new())),
            ]
        );
    }

    #[test]
    fn test_parse_attributes_self_closing() {
        let attrs = parse_attributes(r#"src="a.png" /"#);
        assert_eq!(attrs, vec![("src".to_string(), Some("a.png".to_string()))]);
    }
}

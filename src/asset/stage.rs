//! The ordered stage table.
//!
//! Rules are evaluated top to bottom; every rule whose markers the working
//! name carries fires. Template rules end compilation.

use std::fmt;

use crate::template::EngineKind;
use crate::utils::mime::types;

/// A compilation step, used to tag transform failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Script,
    Template(EngineKind),
    Style,
    Optimize,
    Minify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script => f.write_str("script transform"),
            Self::Template(kind) => write!(f, "{kind} template compile"),
            Self::Style => f.write_str("style compile"),
            Self::Optimize => f.write_str("style optimize"),
            Self::Minify => f.write_str("minify"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Script,
    Template(EngineKind),
    Style,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub markers: &'static [&'static str],
    /// Marker the output is served under.
    pub served: &'static str,
    pub content_type: &'static str,
    pub action: Action,
}

pub const RULES: &[Rule] = &[
    Rule {
        markers: &["jsx", "js"],
        served: "js",
        content_type: types::JAVASCRIPT,
        action: Action::Script,
    },
    Rule {
        markers: &["ejs"],
        served: "html",
        content_type: types::HTML,
        action: Action::Template(EngineKind::Ejs),
    },
    Rule {
        markers: &["handlebars"],
        served: "html",
        content_type: types::HTML,
        action: Action::Template(EngineKind::Handlebars),
    },
    Rule {
        markers: &["sass", "scss"],
        served: "css",
        content_type: types::CSS,
        action: Action::Style,
    },
];

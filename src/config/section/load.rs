//! `[load]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [load]
//! source = "site"               # Directory to compile
//! root = "site"                 # Public paths are relative to this (default: source)
//! skip = ["drafts"]             # Leave out anything under /drafts
//! hide_html_extension = true    # Serve /about.html at /about
//! minify = true                 # Omit to follow KILN_ENV / NODE_ENV
//! display_errors = false        # 404 on misses instead of passing through
//! cache = 3600                  # Cache-Control max-age in seconds
//! on_conflict = "overwrite"     # overwrite | warn | error
//! jsx_pragma = "h"              # Classic-runtime JSX factory
//! script_target = "es2015"      # Script lowering target
//!
//! [load.vars]
//! title = "Home"
//!
//! [load.page_vars."/about"]
//! title = "About"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::site::{ConflictPolicy, LoadOptions};
use crate::toolchain::{OxcScriptTransform, Toolchain};
use crate::toolchain::script::DEFAULT_TARGET;

/// Load and compile settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Directory to compile (relative to the config file).
    pub source: PathBuf,

    /// Root for public paths. Defaults to `source`.
    pub root: Option<PathBuf>,

    /// Skipped path fragments.
    pub skip: Vec<String>,

    pub hide_html_extension: bool,

    /// `None` follows the execution mode.
    pub minify: Option<bool>,

    pub display_errors: bool,

    /// `Cache-Control: max-age` in seconds.
    pub cache: Option<u64>,

    pub on_conflict: ConflictPolicy,

    /// JSX factory for the classic runtime (`React.createElement` when unset).
    pub jsx_pragma: Option<String>,

    pub script_target: String,

    /// Default template bindings.
    pub vars: Option<Value>,

    /// Per-page template bindings, keyed by public path.
    pub page_vars: BTreeMap<String, Value>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            root: None,
            skip: Vec::new(),
            hide_html_extension: true,
            minify: None,
            display_errors: false,
            cache: None,
            on_conflict: ConflictPolicy::default(),
            jsx_pragma: None,
            script_target: DEFAULT_TARGET.to_string(),
            vars: None,
            page_vars: BTreeMap::new(),
        }
    }
}

impl LoadConfig {
    /// Toolchain with the configured script settings.
    pub fn toolchain(&self) -> Toolchain {
        let script = OxcScriptTransform::new(self.jsx_pragma.clone(), self.script_target.clone());
        Toolchain::default().with_script(script)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            root: self.root.clone(),
            skip: self.skip.clone(),
            hide_html_extension: self.hide_html_extension,
            minify: self.minify,
            vars: self.vars.clone(),
            page_vars: self
                .page_vars
                .iter()
                .map(|(path, vars)| (path.clone(), vars.clone()))
                .collect(),
            display_errors: self.display_errors,
            cache: self.cache,
            on_conflict: self.on_conflict,
            toolchain: Arc::new(self.toolchain()),
        }
    }
}

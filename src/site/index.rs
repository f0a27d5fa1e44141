//! Site index: every artifact of a load, keyed by public path.

use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::conflict::ConflictPolicy;
use super::handler::{HandlerOptions, RequestHandler};
use super::route::{hide_html_extension, is_skipped};
use super::source::Source;
use crate::asset::{Artifact, AssetError, Compiler};
use crate::config::ExecutionMode;
use crate::toolchain::Toolchain;
use crate::utils::plural_count;
use crate::{debug, log};

/// Options for [`load`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Root public paths are relative to. Defaults to [`Source::default_root`].
    pub root: Option<PathBuf>,
    /// Path fragments to leave out (`drafts` skips anything under `/drafts`).
    pub skip: Vec<String>,
    /// Serve `.html` at extensionless routes.
    pub hide_html_extension: bool,
    /// `None` follows [`ExecutionMode::from_env`].
    pub minify: Option<bool>,
    /// Default template bindings.
    pub vars: Option<Value>,
    /// Per-page template bindings, keyed by public path.
    pub page_vars: FxHashMap<String, Value>,
    /// Answer misses with a 404 instead of passing them on.
    pub display_errors: bool,
    /// `Cache-Control: max-age` in seconds.
    pub cache: Option<u64>,
    pub on_conflict: ConflictPolicy,
    pub toolchain: Arc<Toolchain>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            root: None,
            skip: Vec::new(),
            hide_html_extension: true,
            minify: None,
            vars: None,
            page_vars: FxHashMap::default(),
            display_errors: false,
            cache: None,
            on_conflict: ConflictPolicy::default(),
            toolchain: Arc::default(),
        }
    }
}

/// Immutable state shared by every handler of one load.
#[derive(Debug)]
pub(crate) struct SiteIndex {
    pub(crate) artifacts: FxHashMap<String, Arc<Artifact>>,
    pub(crate) vars: Option<Value>,
    pub(crate) page_vars: FxHashMap<String, Value>,
    pub(crate) display_errors: bool,
    pub(crate) cache: Option<u64>,
}

impl SiteIndex {
    /// Exact match, then the same key without a trailing `/`.
    pub(crate) fn lookup(&self, key: &str) -> Option<&Arc<Artifact>> {
        self.artifacts.get(key).or_else(|| {
            key.strip_suffix('/')
                .filter(|trimmed| !trimmed.is_empty())
                .and_then(|trimmed| self.artifacts.get(trimmed))
        })
    }
}

/// A loaded site. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Site {
    inner: Arc<SiteIndex>,
}

impl Site {
    pub fn artifacts(&self) -> &FxHashMap<String, Arc<Artifact>> {
        &self.inner.artifacts
    }

    pub fn get(&self, public_path: &str) -> Option<&Arc<Artifact>> {
        self.inner.lookup(public_path)
    }

    pub fn len(&self) -> usize {
        self.inner.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.artifacts.is_empty()
    }

    /// Create a request handler over this site.
    pub fn handle_request(&self, options: HandlerOptions) -> RequestHandler {
        RequestHandler::new(Arc::clone(&self.inner), options)
    }
}

/// Compile every file of `source` into a [`Site`].
///
/// Any compile failure aborts the load.
pub fn load(source: impl Into<Source>, options: LoadOptions) -> Result<Site, AssetError> {
    let source = source.into();
    let root = options.root.clone().or_else(|| source.default_root());
    let minify = options
        .minify
        .unwrap_or_else(|| ExecutionMode::from_env().minify_by_default());
    let compiler = Compiler::new(Arc::clone(&options.toolchain), minify);

    let mut artifacts = FxHashMap::default();
    for file in source.files()? {
        if is_skipped(&file, &options.skip) {
            debug!("load"; "skip {}", file.display());
            continue;
        }

        let mut artifact = compiler.compile(&file, root.as_deref())?;
        if options.hide_html_extension {
            artifact.public_path = hide_html_extension(&artifact.public_path);
        }
        debug!("load"; "{} -> {}", file.display(), artifact.public_path);

        insert(&mut artifacts, artifact, options.on_conflict)?;
    }

    log!("load"; "{}", plural_count(artifacts.len(), "asset"));

    Ok(Site {
        inner: Arc::new(SiteIndex {
            artifacts,
            vars: options.vars,
            page_vars: options.page_vars,
            display_errors: options.display_errors,
            cache: options.cache,
        }),
    })
}

fn insert(
    artifacts: &mut FxHashMap<String, Arc<Artifact>>,
    artifact: Artifact,
    policy: ConflictPolicy,
) -> Result<(), AssetError> {
    match artifacts.entry(artifact.public_path.clone()) {
        Entry::Vacant(entry) => {
            entry.insert(Arc::new(artifact));
        }
        Entry::Occupied(mut entry) => {
            let url = entry.key();
            let previous = &entry.get().source_path;
            match policy {
                ConflictPolicy::Overwrite => {
                    debug!("conflict"; "{url}: {} replaces {}", artifact.source_path.display(), previous.display());
                }
                ConflictPolicy::Warn => {
                    log!("conflict"; "{url}: {} replaces {}", artifact.source_path.display(), previous.display());
                }
                ConflictPolicy::Error => {
                    return Err(AssetError::Conflict {
                        url: url.clone(),
                        first: previous.clone(),
                        second: artifact.source_path,
                    });
                }
            }
            entry.insert(Arc::new(artifact));
        }
    }
    Ok(())
}

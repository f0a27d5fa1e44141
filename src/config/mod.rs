//! Configuration management for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── load       # [load]
//! │   └── serve      # [serve]
//! ├── error          # ConfigError
//! ├── mode           # ExecutionMode (KILN_ENV / NODE_ENV)
//! ├── util           # Config file discovery
//! └── mod.rs         # KilnConfig (this file)
//! ```
//!
//! The file is optional: without one, defaults apply and the current
//! directory is loaded. CLI flags override file values.

mod error;
mod mode;
pub mod section;
mod util;

pub use error::ConfigError;
pub use mode::ExecutionMode;
pub use section::{LoadConfig, ServeConfig};

use util::find_config_file;

use crate::cli::{Cli, Commands, LoadArgs};
use crate::{debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KilnConfig {
    /// Absolute path to the config file, when one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths resolve against: the config file's parent,
    /// or the working directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Load and compile settings
    pub load: LoadConfig,

    /// HTTP adapter settings
    pub serve: ServeConfig,
}

impl KilnConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file; a missing file means
    /// defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map_or_else(|| cwd.clone(), Path::to_path_buf);
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self {
                    root: cwd.clone(),
                    ..Self::default()
                }
            }
        };

        config.normalize_paths();
        config.apply_command_options(cli, &cwd);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    ///
    /// Paths given on the command line are relative to `cwd`.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        crate::logger::set_verbose(cli.verbose);

        match &cli.command {
            Commands::List { load_args, .. } => {
                self.apply_load_args(load_args, cwd);
            }
            Commands::Serve {
                load_args,
                interface,
                port,
                display_errors,
                cache,
            } => {
                self.apply_load_args(load_args, cwd);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.load.display_errors, display_errors.as_ref());
                if cache.is_some() {
                    self.load.cache = *cache;
                }
            }
        }
    }

    fn apply_load_args(&mut self, args: &LoadArgs, cwd: &Path) {
        if let Some(source) = &args.source {
            self.load.source = cwd.join(source);
        }
        if let Some(root) = &args.root {
            self.load.root = Some(cwd.join(root));
        }
        if args.minify.is_some() {
            self.load.minify = args.minify;
        }
        self.load.skip.extend(args.skip.iter().cloned());
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve file-relative paths against the config root.
    fn normalize_paths(&mut self) {
        self.load.source = self.root.join(&self.load.source);
        if let Some(root) = &self.load.root {
            self.load.root = Some(self.root.join(root));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the merged configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let load = &self.load;

        if !load.source.is_dir() {
            return Err(ConfigError::Validation(format!(
                "`load.source` `{}` is not a directory",
                load.source.display()
            )));
        }
        if load.script_target.trim().is_empty() {
            return Err(ConfigError::Validation(
                "`load.script_target` must not be empty".to_string(),
            ));
        }
        if load.skip.iter().any(|s| s.trim_matches('/').is_empty()) {
            return Err(ConfigError::Validation(
                "`load.skip` entries must not be empty".to_string(),
            ));
        }
        if let Some(key) = load.page_vars.keys().find(|key| !key.starts_with('/')) {
            return Err(ConfigError::Validation(format!(
                "`load.page_vars` key `{key}` must be a public path starting with `/`"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> KilnConfig {
    let (parsed, ignored) = KilnConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

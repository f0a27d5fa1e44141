//! Logging utilities with colored module prefixes.
//!
//! ```ignore
//! log!("load"; "compiled {} assets", count);
//! debug!("compile"; "{} -> {}", source.display(), public_path);
//! ```
//!
//! Output goes to stderr so that machine-readable command output on stdout
//! (e.g. `kiln list --json`) stays clean.

use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macros
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut out = stderr().lock();
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Apply color to a module prefix based on module type.
///
/// Honors `--color` overrides and stderr TTY detection.
fn colorize_prefix(module: &str) -> String {
    let style = match module.to_ascii_lowercase().as_str() {
        "serve" => Style::new().bright_blue(),
        "load" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        "warning" | "conflict" => Style::new().bright_magenta(),
        _ => Style::new().bright_yellow(),
    }
    .bold();
    format!("[{module}]")
        .if_supports_color(Stream::Stderr, |prefix| prefix.style(style))
        .to_string()
}

//! What to do when two files claim the same public path.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Later file wins silently (logged with `--verbose`).
    #[default]
    Overwrite,
    /// Later file wins, with a warning.
    Warn,
    /// Abort the load.
    Error,
}

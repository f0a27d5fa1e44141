//! Compilation and load errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::Stage;

/// Failure to compile one file, or to build a site index.
///
/// There is no partial recovery: any of these aborts the whole load.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot read `{}`", .0.display())]
    Read(PathBuf, #[source] io::Error),

    #[error("cannot enumerate `{}`", .0.display())]
    Walk(PathBuf, #[source] io::Error),

    #[error("{stage} failed for `{}`", path.display())]
    Transform {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("public path `{url}` is produced by both `{}` and `{}`", first.display(), second.display())]
    Conflict {
        url: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl AssetError {
    pub(crate) fn transform(stage: Stage, path: impl Into<PathBuf>) -> impl FnOnce(anyhow::Error) -> Self {
        let path = path.into();
        move |source| Self::Transform {
            stage,
            path,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::error::Error as _;

    #[test]
    fn test_transform_display_and_source() {
        let err = AssetError::transform(Stage::Style, "/site/a.scss")(anyhow!("expected \"}}\""));
        assert_eq!(err.to_string(), "style compile failed for `/site/a.scss`");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_conflict_display() {
        let err = AssetError::Conflict {
            url: "/a".to_string(),
            first: PathBuf::from("/site/a.html"),
            second: PathBuf::from("/site/a/index.html"),
        };
        let display = err.to_string();
        assert!(display.contains("`/a`"));
        assert!(display.contains("a/index.html"));
    }
}

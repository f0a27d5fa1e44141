//! What a site is loaded from.

use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::asset::AssetError;

/// An explicit, ordered file list or a directory to enumerate.
#[derive(Debug, Clone)]
pub enum Source {
    Files(Vec<PathBuf>),
    Dir(PathBuf),
}

impl Source {
    /// Root public paths are computed against when none is given:
    /// the directory itself, or the first file's directory.
    pub fn default_root(&self) -> Option<PathBuf> {
        match self {
            Self::Dir(dir) => Some(dir.clone()),
            Self::Files(files) => files
                .first()
                .and_then(|file| file.parent())
                .map(Path::to_path_buf),
        }
    }

    /// Regular files, in load order.
    ///
    /// Directory listings are sorted by name so loads are reproducible.
    pub fn files(&self) -> Result<Vec<PathBuf>, AssetError> {
        match self {
            Self::Files(files) => Ok(files.iter().filter(|f| !f.is_dir()).cloned().collect()),
            Self::Dir(dir) => walk(dir),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(dir: PathBuf) -> Self {
        Self::Dir(dir)
    }
}

impl From<Vec<PathBuf>> for Source {
    fn from(files: Vec<PathBuf>) -> Self {
        Self::Files(files)
    }
}

fn walk(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    if !dir.is_dir() {
        let err = io::Error::new(io::ErrorKind::NotFound, "not a directory");
        return Err(AssetError::Walk(dir.to_path_buf(), err));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort(true).skip_hidden(false) {
        let entry = entry.map_err(|err| AssetError::Walk(dir.to_path_buf(), io::Error::other(err)))?;
        let file_type = entry.file_type();
        let path = entry.path();
        if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            files.push(path);
        }
    }
    Ok(files)
}

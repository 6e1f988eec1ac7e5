mod history;

use crate::Store;
use std::path::{Path, PathBuf};

/// A temporary directory tree with a default store
pub(crate) struct Fixture {
    tmp: tempfile::TempDir,
    pub store: Store,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            tmp: tempfile::tempdir().unwrap(),
            store: Store::default(),
        }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Create (if needed) and return a location below the root
    pub fn location(&self, relative: &str) -> PathBuf {
        let path = self.tmp.path().join(relative);
        std::fs::create_dir_all(&path).unwrap();
        path
    }
}

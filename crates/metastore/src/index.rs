//! Case-insensitive, suffix-agnostic name registry for one container.
//!
//! Entry names are the case-preserved names of the entry directories; the
//! index only reads directory names and never opens sibling entries.

use crate::error::{Error, IoContext, Result};
use crate::path::{EXT, fold_name, validate_name};
use diagnostics::log_error;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Listing {
    Entry(String),
    Foreign(String),
}

/// Name index over the entries stored directly in `dir`
#[derive(Debug, Clone)]
pub struct NameIndex {
    dir: PathBuf,
}

impl NameIndex {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn listing(&self) -> Result<Vec<Listing>> {
        let read = match std::fs::read_dir(&self.dir) {
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(&self.dir, e)),
        };

        let mut listing = Vec::new();
        for dirent in read {
            let dirent = dirent.at(&self.dir)?;
            let name = dirent.file_name().to_string_lossy().to_string();
            if name.starts_with(EXT) {
                // Records, locks and temporaries
                continue;
            }
            let file_type = dirent.file_type().at(dirent.path())?;
            if file_type.is_dir() {
                listing.push(Listing::Entry(name));
            } else {
                listing.push(Listing::Foreign(name));
            }
        }
        Ok(listing)
    }

    /// Entry names, sorted so listings are deterministic
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .listing()?
            .into_iter()
            .filter_map(|l| match l {
                Listing::Entry(name) => Some(name),
                Listing::Foreign(_) => None,
            })
            .collect();
        names.sort();
        Ok(names)
    }

    /// Every stored name matching `name` case-insensitively.
    ///
    /// More than one result means the index is corrupt.
    pub fn matches(&self, name: &str) -> Result<Vec<String>> {
        let folded = fold_name(name);
        Ok(self
            .names()?
            .into_iter()
            .filter(|stored| fold_name(stored) == folded)
            .collect())
    }

    /// Stored name of the entry called `name`, if any.
    pub fn resolve(&self, name: &str) -> Result<Option<String>> {
        let mut found = self.matches(name)?;
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            _ => {
                let container = self.dir.display().to_string();
                log_error!("Corrupt index in {container}: {count} entries named {name}", container: container, count: found.len(), name: name);
                Err(Error::corrupt_index(&self.dir, found))
            }
        }
    }

    /// Like [`Self::resolve`], failing with `NotFound`.
    pub fn require(&self, name: &str) -> Result<String> {
        self.resolve(name)?
            .ok_or_else(|| Error::not_found(self.dir.join(name)))
    }

    /// Whether an entry or a foreign file answers to `name`
    pub fn is_taken(&self, name: &str) -> Result<bool> {
        let folded = fold_name(name);
        Ok(self.listing()?.into_iter().any(|l| match l {
            Listing::Entry(n) | Listing::Foreign(n) => fold_name(&n) == folded,
        }))
    }

    /// Create a new entry directory for `name`.
    ///
    /// Fails with `NameConflict` when anything in the container already
    /// answers to that name, entry or not.
    pub fn register(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        if self.is_taken(name)? {
            return Err(Error::name_conflict(self.dir.join(name)));
        }

        let path = self.dir.join(name);
        std::fs::create_dir_all(&path).at(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_container_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let index = NameIndex::new(tmp.path().join(".meta"));
        assert!(index.names().unwrap().is_empty());
        assert_eq!(index.resolve("age").unwrap(), None);
        assert!(index.require("age").unwrap_err().is_not_found());
    }

    #[test]
    fn test_register_and_resolve_any_case() {
        let tmp = tempfile::tempdir().unwrap();
        let index = NameIndex::new(tmp.path());
        let _ = index.register("MyNote").unwrap();

        assert_eq!(index.resolve("mynote").unwrap().as_deref(), Some("MyNote"));
        assert_eq!(index.resolve("MYNOTE").unwrap().as_deref(), Some("MyNote"));
        assert!(matches!(index.register("mynote"), Err(Error::NameConflict(_))));
    }

    #[test]
    fn test_hidden_files_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".record"), b"{}").unwrap();
        std::fs::create_dir(tmp.path().join(".tmp123")).unwrap();
        let index = NameIndex::new(tmp.path());
        assert!(index.names().unwrap().is_empty());
    }

    #[test]
    fn test_foreign_file_conflicts() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("notes"), b"plain file").unwrap();
        let index = NameIndex::new(tmp.path());
        assert_eq!(index.resolve("notes").unwrap(), None);
        assert!(index.is_taken("NOTES").unwrap());
        assert!(!index.is_taken("other").unwrap());
        assert!(matches!(index.register("Notes"), Err(Error::NameConflict(_))));
    }

    #[test]
    fn test_duplicate_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("age")).unwrap();
        std::fs::create_dir(tmp.path().join("AGE")).unwrap();
        let index = NameIndex::new(tmp.path());
        let err = index.resolve("Age").unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(index.matches("age").unwrap().len(), 2);
    }
}

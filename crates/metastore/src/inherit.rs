//! Resolution through the ancestor chain of a location.
//!
//! The walk is an iterator over ancestor locations, closest first, so the
//! depth bound is a `take` and laziness is an early return.

use crate::error::{Error, Result};
use crate::history::TypedValue;
use crate::entry::{EntryStore, Match};
use crate::path::{MetaPath, fold_name};
use diagnostics::log_debug;
use std::collections::btree_map::{BTreeMap, Entry};
use std::path::{Path, PathBuf};

/// Ancestor locations of a location, closest first, excluding itself
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<PathBuf>,
}

impl Ancestors {
    pub fn new<P: AsRef<Path>>(location: P) -> Self {
        Self {
            next: location.as_ref().parent().map(Path::to_path_buf),
        }
    }
}

impl Iterator for Ancestors {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let current = self.next.take()?;
        self.next = current.parent().map(Path::to_path_buf);
        Some(current)
    }
}

/// Outcome of a pull
#[derive(Debug, Clone, PartialEq)]
pub struct Pulled {
    pub value: TypedValue,
    /// Location the value was read from
    pub source: PathBuf,
    /// Further ancestors within the depth bound that define the entry and
    /// are shadowed by `source`; left empty by lazy pulls
    pub overridden: Vec<PathBuf>,
}

impl Pulled {
    /// True when the value came from an ancestor rather than `location`
    #[must_use]
    pub fn is_inherited(&self, location: &Path) -> bool {
        self.source != location
    }
}

/// Convert a signed depth to a number of ancestor levels.
///
/// Zero and negative depths consult the location only.
#[must_use]
pub fn levels(depth: i64) -> usize {
    usize::try_from(depth).unwrap_or(0)
}

pub struct InheritanceResolver<'a> {
    store: &'a EntryStore,
}

impl<'a> InheritanceResolver<'a> {
    pub fn new(store: &'a EntryStore) -> Self {
        Self { store }
    }

    /// Read `metapath` at `location`, or at the closest of up to `levels`
    /// ancestors when the location has no value for it.
    ///
    /// Only a miss moves the walk upwards; a type mismatch at the closest
    /// definition is returned as is.
    pub fn pull(&self, location: &Path, metapath: &MetaPath, levels: usize, lazy: bool) -> Result<Pulled> {
        let mut chain =
            std::iter::once(location.to_path_buf()).chain(Ancestors::new(location).take(levels));

        while let Some(candidate) = chain.next() {
            if !self.store.has_container(&candidate)? {
                continue;
            }
            match self.store.read(&candidate, metapath, None) {
                Ok(value) => {
                    let shown = candidate.display().to_string();
                    log_debug!("Pulled {metapath} from {shown}", metapath: metapath.join(), shown: shown);
                    let overridden = if lazy {
                        Vec::new()
                    } else {
                        self.shadowed(chain.by_ref(), metapath)?
                    };
                    return Ok(Pulled {
                        value,
                        source: candidate,
                        overridden,
                    });
                }
                Err(e) if e.is_not_found() => {
                    let shown = candidate.display().to_string();
                    log_debug!("No {metapath} at {shown}", metapath: metapath.join(), shown: shown);
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::not_found(
            location.join(self.store.container()).join(metapath.to_relative_path()),
        ))
    }

    fn shadowed<I>(&self, rest: I, metapath: &MetaPath) -> Result<Vec<PathBuf>>
    where
        I: Iterator<Item = PathBuf>,
    {
        let mut shadowed = Vec::new();
        for candidate in rest {
            if !self.store.has_container(&candidate)? {
                continue;
            }
            match self.store.read(&candidate, metapath, None) {
                Ok(_) => shadowed.push(candidate),
                Err(e) if e.is_not_found() => {}
                Err(Error::TypeMismatch { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(shadowed)
    }

    /// Valued children of `metapath`, merged over `location` and up to
    /// `levels` ancestors.
    ///
    /// Each child name takes its closest definition; further definitions
    /// are listed as overridden. Sorted by name, keyed by the stored name
    /// of the closest definition.
    pub fn merge_children(&self, location: &Path, metapath: &MetaPath, levels: usize) -> Result<Vec<(String, Pulled)>> {
        let bare = metapath.with_suffix(None);
        let chain = std::iter::once(location.to_path_buf()).chain(Ancestors::new(location).take(levels));

        let mut merged: BTreeMap<String, (String, Pulled)> = BTreeMap::new();
        for candidate in chain {
            if !self.store.has_container(&candidate)? {
                continue;
            }
            let parent = match self.store.locate(&candidate, &bare, Match::Name) {
                Ok(parent) => parent,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            };
            for child in self.store.children_of(&parent)? {
                let Some(value) = self.store.load_record(&child.path)?.and_then(|r| r.live) else {
                    continue;
                };
                match merged.entry(fold_name(child.name())) {
                    Entry::Occupied(mut slot) => slot.get_mut().1.overridden.push(candidate.clone()),
                    Entry::Vacant(slot) => {
                        _ = slot.insert((
                            child.name().to_string(),
                            Pulled {
                                value,
                                source: candidate.clone(),
                                overridden: Vec::new(),
                            },
                        ));
                    }
                }
            }
        }

        let shown = location.display().to_string();
        log_debug!("Merged {count} children of {metapath} at {shown}", count: merged.len(), metapath: bare.join(), shown: shown);
        Ok(merged.into_values().collect())
    }

    /// Locations from `location` upwards that hold a container
    pub fn locations(&self, location: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for candidate in std::iter::once(location.to_path_buf()).chain(Ancestors::new(location)) {
            if self.store.has_container(&candidate)? {
                found.push(candidate);
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use crate::value::Value;

    #[test]
    fn test_ancestors_closest_first() {
        let chain: Vec<PathBuf> = Ancestors::new("/a/b/c").collect();
        assert_eq!(
            chain,
            vec![PathBuf::from("/a/b"), PathBuf::from("/a"), PathBuf::from("/")]
        );
        assert_eq!(Ancestors::new("/").count(), 0);
    }

    #[test]
    fn test_levels() {
        assert_eq!(levels(-3), 0);
        assert_eq!(levels(0), 0);
        assert_eq!(levels(2), 2);
    }

    #[test]
    fn test_pull_walks_up() {
        let tmp = tempfile::tempdir().unwrap();
        let store = EntryStore::new(".meta", TypeRegistry::new());
        let level1 = tmp.path().to_path_buf();
        let level2 = level1.join("level2");
        let level3 = level2.join("level3");
        std::fs::create_dir_all(&level3).unwrap();

        let street = MetaPath::split("address/street", store.registry()).unwrap();
        let _ = store
            .write(&level1, &street, Value::from("Code Street 5"), None)
            .unwrap();

        let resolver = InheritanceResolver::new(&store);
        assert!(resolver.pull(&level3, &street, 1, false).unwrap_err().is_not_found());

        let pulled = resolver.pull(&level3, &street, 2, false).unwrap();
        assert_eq!(pulled.source, level1);
        assert!(pulled.is_inherited(&level3));
        assert_eq!(pulled.value.value, Value::from("Code Street 5"));
    }

    #[test]
    fn test_merge_children_closest_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let store = EntryStore::new(".meta", TypeRegistry::new());
        let level1 = tmp.path().to_path_buf();
        let level2 = level1.join("level2");
        let level3 = level2.join("level3");
        std::fs::create_dir_all(&level3).unwrap();

        let write = |location: &Path, metapath: &str, value: &str| {
            let metapath = MetaPath::split(metapath, store.registry()).unwrap();
            let _ = store.write(location, &metapath, Value::from(value), None).unwrap();
        };
        write(&level1, "address/street", "Code Street 5");
        write(&level1, "address/city", "London");
        write(&level2, "Address/City", "Birmingham");
        write(&level2, "address/postcode", "B1");

        let address = MetaPath::split("address", store.registry()).unwrap();
        let resolver = InheritanceResolver::new(&store);
        let merged = resolver.merge_children(&level3, &address, usize::MAX).unwrap();

        let names: Vec<&str> = merged.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["City", "postcode", "street"]);
        let (_, city) = &merged[0];
        assert_eq!(city.value.value, Value::from("Birmingham"));
        assert_eq!(city.source, level2);
        assert_eq!(city.overridden, vec![level1.clone()]);
        let (_, street) = &merged[2];
        assert_eq!(street.source, level1);

        // One level up reaches level2 only
        let merged = resolver.merge_children(&level3, &address, 1).unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_locations() {
        let tmp = tempfile::tempdir().unwrap();
        let store = EntryStore::new(".meta", TypeRegistry::new());
        let child = tmp.path().join("child");
        std::fs::create_dir_all(&child).unwrap();
        let name = MetaPath::split("x", store.registry()).unwrap();
        let _ = store.write(tmp.path(), &name, Value::Int(1), None).unwrap();
        let _ = store.write(&child, &name, Value::Int(2), None).unwrap();

        let resolver = InheritanceResolver::new(&store);
        let found = resolver.locations(&child).unwrap();
        assert_eq!(&found[..2], &[child.clone(), tmp.path().to_path_buf()]);
    }
}

//! The facade every other subsystem calls.
//!
//! Methods take metapath strings, parse them with the store's type
//! registry and hand the parsed form to the entry store and the
//! inheritance resolver.

use crate::config::StoreConfig;
use crate::entry::{EntryKind, EntryRef, EntryStore, Match};
use crate::error::Result;
use crate::history::{HistoryRecord, TypedValue};
use crate::index::NameIndex;
use crate::inherit::{InheritanceResolver, Pulled, levels};
use crate::path::{MetaPath, split_location};
use crate::registry::TypeRegistry;
use crate::value::Value;
use diagnostics::log_info;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Store {
    entries: EntryStore,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            entries: EntryStore::new(crate::config::DEFAULT_CONTAINER, TypeRegistry::new()),
        }
    }
}

impl Store {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            entries: EntryStore::new(config.container.clone(), config.registry()?),
        })
    }

    #[must_use]
    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        self.entries.registry()
    }

    fn parse(&self, metapath: &str) -> Result<MetaPath> {
        MetaPath::split(metapath, self.registry())
    }

    fn resolver(&self) -> InheritanceResolver<'_> {
        InheritanceResolver::new(&self.entries)
    }

    /// Live value at `metapath`; `suffix` (or the metapath's suffix) must
    /// match the stored suffix exactly.
    pub fn read<P: AsRef<Path>>(&self, location: P, metapath: &str, suffix: Option<&str>) -> Result<TypedValue> {
        self.entries
            .read(location.as_ref(), &self.parse(metapath)?, suffix)
    }

    /// Stored names of an entry's children
    pub fn read_children<P: AsRef<Path>>(&self, location: P, metapath: &str) -> Result<Vec<String>> {
        let entry = self
            .entries
            .locate(location.as_ref(), &self.parse(metapath)?, Match::Typed)?;
        Ok(self
            .entries
            .children_of(&entry)?
            .iter()
            .map(EntryRef::stored_name)
            .collect())
    }

    pub fn write<P, V>(&self, location: P, metapath: &str, value: V, suffix: Option<&str>) -> Result<EntryRef>
    where
        P: AsRef<Path>,
        V: Into<Value>,
    {
        self.entries
            .write(location.as_ref(), &self.parse(metapath)?, value.into(), suffix)
    }

    /// Read locally, falling back to up to `depth` ancestor locations.
    ///
    /// `depth <= 0` is local only. A lazy pull returns as soon as a value
    /// is found and does not report shadowed ancestors.
    pub fn pull<P: AsRef<Path>>(&self, location: P, metapath: &str, depth: i64, lazy: bool) -> Result<Pulled> {
        self.resolver()
            .pull(location.as_ref(), &self.parse(metapath)?, levels(depth), lazy)
    }

    /// Pull with no bound on the number of ancestors.
    pub fn inherit<P: AsRef<Path>>(&self, location: P, metapath: &str) -> Result<Pulled> {
        self.resolver()
            .pull(location.as_ref(), &self.parse(metapath)?, usize::MAX, false)
    }

    /// Valued children of `metapath` merged over every ancestor, each
    /// taken from its closest definition.
    pub fn inherit_children<P: AsRef<Path>>(&self, location: P, metapath: &str) -> Result<Vec<(String, Pulled)>> {
        self.resolver()
            .merge_children(location.as_ref(), &self.parse(metapath)?, usize::MAX)
    }

    /// Stored name of the entry answering to `name`, whatever its suffix.
    ///
    /// An existence query: suffixes on `name` and `_suffix` do not narrow
    /// the match.
    pub fn find<P: AsRef<Path>>(&self, location: P, name: &str, _suffix: Option<&str>) -> Result<Option<String>> {
        let found = self
            .entries
            .resolve(location.as_ref(), &self.parse(name)?)?;
        Ok(found.map(|entry| entry.metapath.join()))
    }

    /// Every top-level stored name at `location` answering to `name`.
    ///
    /// More than one result means the location's index is corrupt.
    pub fn find_all<P: AsRef<Path>>(&self, location: P, name: &str) -> Result<Vec<String>> {
        let location = location.as_ref();
        let bare = self.parse(name)?;
        let index = NameIndex::new(self.entries.container_dir(location)?);
        let mut found = Vec::new();
        for stored in index.matches(bare.name())? {
            let dir = index.dir().join(&stored);
            found.push(match self.entries.stored_suffix(&dir)? {
                Some(suffix) => format!("{}.{}", stored, suffix),
                None => stored,
            });
        }
        Ok(found)
    }

    /// Resolve an absolute host path running through a container.
    pub fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Option<EntryRef>> {
        let Some((location, metapath)) = split_location(path, self.entries.container()) else {
            return Ok(None);
        };
        if metapath.is_empty() {
            return Ok(None);
        }
        self.entries.resolve(&location, &self.parse(&metapath)?)
    }

    /// Stored names of the entries directly at `location`
    pub fn ls<P: AsRef<Path>>(&self, location: P) -> Result<Vec<String>> {
        Ok(self
            .entries
            .children(location.as_ref())?
            .iter()
            .map(EntryRef::stored_name)
            .collect())
    }

    /// Resolved child entries of the entry at `metapath`, suffixes ignored
    pub fn ls_entry<P: AsRef<Path>>(&self, location: P, metapath: &str) -> Result<Vec<EntryRef>> {
        let entry = self
            .entries
            .locate(location.as_ref(), &self.parse(metapath)?, Match::Name)?;
        self.entries.children_of(&entry)
    }

    pub fn kind<P: AsRef<Path>>(&self, location: P, metapath: &str) -> Result<EntryKind> {
        let entry = self
            .entries
            .locate(location.as_ref(), &self.parse(metapath)?, Match::Typed)?;
        self.entries.kind(&entry)
    }

    /// Drop the live value into history.
    pub fn clear<P: AsRef<Path>>(&self, location: P, metapath: &str) -> Result<()> {
        self.entries.clear(location.as_ref(), &self.parse(metapath)?)
    }

    /// Take the entry, its children and its history out of the store.
    ///
    /// Unless `permanent`, the entry goes to the trash and stays
    /// recoverable until another entry of the same name is removed.
    pub fn remove<P: AsRef<Path>>(&self, location: P, metapath: &str, permanent: bool) -> Result<()> {
        self.entries
            .remove(location.as_ref(), &self.parse(metapath)?, permanent)
    }

    /// Bring a trashed entry back.
    pub fn recover<P: AsRef<Path>>(&self, location: P, metapath: &str) -> Result<EntryRef> {
        self.entries
            .recover(location.as_ref(), &self.parse(metapath)?)
    }

    pub fn purge_history<P: AsRef<Path>>(&self, location: P, metapath: &str) -> Result<()> {
        self.entries
            .purge_history(location.as_ref(), &self.parse(metapath)?)
    }

    /// History of an entry, oldest first
    pub fn history<P: AsRef<Path>>(&self, location: P, metapath: &str) -> Result<Vec<HistoryRecord>> {
        let entry = self
            .entries
            .locate(location.as_ref(), &self.parse(metapath)?, Match::Name)?;
        Ok(self.entries.history(&entry)?.records().to_vec())
    }

    /// Value and suffix recorded at `ordinal`, without changing anything.
    pub fn restore<P: AsRef<Path>>(&self, location: P, metapath: &str, ordinal: usize) -> Result<TypedValue> {
        let entry = self
            .entries
            .locate(location.as_ref(), &self.parse(metapath)?, Match::Name)?;
        self.entries.restore(&entry, ordinal)
    }

    /// Write the value recorded at `ordinal` back, under its original suffix.
    pub fn revert<P: AsRef<Path>>(&self, location: P, metapath: &str, ordinal: usize) -> Result<EntryRef> {
        let location = location.as_ref();
        let parsed = self.parse(metapath)?;
        let entry = self.entries.locate(location, &parsed, Match::Name)?;
        let restored = self.entries.restore(&entry, ordinal)?;

        let shown = entry.to_string();
        log_info!("Reverting {shown} to version {ordinal}", shown: shown, ordinal: ordinal);
        self.entries.write(
            location,
            &parsed.with_suffix(None),
            restored.value,
            Some(&restored.suffix),
        )
    }

    /// `location` and its ancestors that hold metadata, closest first
    pub fn locations<P: AsRef<Path>>(&self, location: P) -> Result<Vec<PathBuf>> {
        self.resolver().locations(location.as_ref())
    }
}

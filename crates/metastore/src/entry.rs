//! Durable entries.
//!
//! Layout below a location `L`:
//!
//! ```text
//! L/.meta/                  container
//! L/.meta/age/              entry directory, case-preserved bare name
//! L/.meta/age/.record       {live, history} as JSON
//! L/.meta/age/.lock         write lock
//! L/.meta/address/street/   child entry
//! L/.meta/.trash/old/       removed entry, recoverable
//! ```
//!
//! The suffix is kept in the record rather than in the directory name, so
//! replacing a value, changing its type and appending the superseded value
//! to history is one atomic rename of `.record`.

use crate::error::{Error, IoContext, Result};
use crate::history::{HistoryLog, TypedValue, now_micros};
use crate::index::NameIndex;
use crate::lock::EntryLock;
use crate::path::{MetaPath, Segment};
use crate::registry::{TypeRegistry, fold_token};
use crate::value::{Value, ValueKind};
use diagnostics::{log_debug, log_info};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

pub const RECORD_FILE: &str = ".record";

/// Removed entries, kept beside the entries they were removed from
pub const TRASH_DIR: &str = ".trash";

fn trash_dir(entry_dir: &Path) -> Result<PathBuf> {
    entry_dir
        .parent()
        .map(|parent| parent.join(TRASH_DIR))
        .ok_or_else(|| Error::not_found(entry_dir))
}

/// Persisted state of one entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub live: Option<TypedValue>,
    #[serde(default)]
    pub history: HistoryLog,
}

/// What an entry currently holds
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    /// Children only, no live value
    Container,
    /// A live value and no children
    Leaf(TypedValue),
    /// A live value and children
    Branch(TypedValue),
}

/// A resolved entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    /// Location owning the top-level entry of the path
    pub location: PathBuf,
    /// Stored names and stored suffixes, root to leaf
    pub metapath: MetaPath,
    /// Entry directory on disk
    pub path: PathBuf,
}

impl EntryKind {
    #[must_use]
    pub fn value(&self) -> Option<&TypedValue> {
        match self {
            EntryKind::Container => None,
            EntryKind::Leaf(v) | EntryKind::Branch(v) => Some(v),
        }
    }
}

impl EntryRef {
    /// Stored name including the stored suffix, e.g. `age.int`
    #[must_use]
    pub fn stored_name(&self) -> String {
        self.metapath.leaf().to_string()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.metapath.name()
    }

    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.metapath.suffix()
    }
}

impl std::fmt::Display for EntryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.location.display(), self.metapath)
    }
}

/// How a typed request constrains resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Names only; requested suffixes are ignored
    Name,
    /// Requested suffixes must equal the stored ones
    Typed,
}

#[derive(Debug, Clone)]
pub struct EntryStore {
    container: String,
    registry: TypeRegistry,
}

impl EntryStore {
    pub fn new<S: Into<String>>(container: S, registry: TypeRegistry) -> Self {
        Self {
            container: container.into(),
            registry,
        }
    }

    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Container directory of a location
    pub fn container_dir(&self, location: &Path) -> Result<PathBuf> {
        // Ancestors are taken lexically, so `..` would walk sideways
        let normalized = location
            .components()
            .all(|c| !matches!(c, Component::CurDir | Component::ParentDir));
        if !location.is_absolute() || !normalized {
            return Err(Error::relative_location(location));
        }
        Ok(location.join(&self.container))
    }

    /// Whether a location holds any metadata
    pub fn has_container(&self, location: &Path) -> Result<bool> {
        Ok(self.container_dir(location)?.is_dir())
    }

    pub fn load_record(&self, entry_dir: &Path) -> Result<Option<EntryRecord>> {
        let path = entry_dir.join(RECORD_FILE);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(&path, e)),
        }
    }

    /// Replace the record through a temporary file and a rename.
    fn save_record(&self, entry_dir: &Path, record: &EntryRecord) -> Result<()> {
        let target = entry_dir.join(RECORD_FILE);
        let mut tmp = tempfile::NamedTempFile::new_in(entry_dir).at(entry_dir)?;
        serde_json::to_writer_pretty(&mut tmp, record)?;
        tmp.flush().at(tmp.path())?;
        tmp.as_file().sync_all().at(tmp.path())?;
        _ = tmp.persist(&target).map_err(|e| Error::io(&target, e.error))?;
        Ok(())
    }

    /// Live suffix of the entry in `entry_dir`, if it holds a value
    pub fn stored_suffix(&self, entry_dir: &Path) -> Result<Option<String>> {
        Ok(self
            .load_record(entry_dir)?
            .and_then(|r| r.live)
            .map(|live| live.suffix))
    }

    /// Resolve `metapath` below `location`.
    ///
    /// Every segment is found case-insensitively by name. With
    /// [`Match::Typed`], a segment carrying a suffix must also match the
    /// suffix the entry is stored under.
    pub fn locate(&self, location: &Path, metapath: &MetaPath, mode: Match) -> Result<EntryRef> {
        let mut dir = self.container_dir(location)?;
        let mut resolved = Vec::with_capacity(metapath.segments().len());

        for segment in metapath.segments() {
            let stored = NameIndex::new(&dir).require(&segment.name)?;
            dir = dir.join(&stored);
            let suffix = self.stored_suffix(&dir)?;

            if mode == Match::Typed {
                if let Some(wanted) = &segment.suffix {
                    if suffix.as_deref() != Some(wanted.as_str()) {
                        return Err(Error::type_mismatch(
                            &dir,
                            wanted,
                            suffix.as_deref().unwrap_or("none"),
                        ));
                    }
                }
            }
            resolved.push(Segment {
                name: stored,
                suffix,
            });
        }

        Ok(EntryRef {
            location: location.to_path_buf(),
            metapath: MetaPath::from_segments(resolved)?,
            path: dir,
        })
    }

    /// Name-only resolution that reports a miss as `None`.
    pub fn resolve(&self, location: &Path, metapath: &MetaPath) -> Result<Option<EntryRef>> {
        match self.locate(location, metapath, Match::Name) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Read the live value at `metapath`, local to `location`.
    ///
    /// `suffix`, or else the metapath's own suffix, must equal the stored
    /// suffix exactly.
    pub fn read(&self, location: &Path, metapath: &MetaPath, suffix: Option<&str>) -> Result<TypedValue> {
        if let Some(suffix) = suffix {
            _ = self.registry.require(suffix)?;
        }
        let wanted = suffix.or(metapath.suffix()).map(fold_token);
        let entry = self.locate(location, &metapath.with_suffix(None), Match::Typed)?;

        let live = self
            .load_record(&entry.path)?
            .and_then(|r| r.live)
            .ok_or_else(|| Error::not_found(&entry.path))?;

        if let Some(wanted) = wanted {
            if live.suffix != wanted {
                return Err(Error::type_mismatch(&entry.path, &wanted, &live.suffix));
            }
        }
        Ok(live)
    }

    /// Find or create the entry directory for each segment.
    ///
    /// Also reports whether the addressed entry itself was created.
    fn ensure(&self, location: &Path, metapath: &MetaPath) -> Result<(EntryRef, bool)> {
        let mut dir = self.container_dir(location)?;
        std::fs::create_dir_all(&dir).at(&dir)?;

        let mut created = false;
        let mut resolved = Vec::with_capacity(metapath.segments().len());
        for segment in metapath.segments() {
            let index = NameIndex::new(&dir);
            let stored = match index.resolve(&segment.name)? {
                Some(stored) => {
                    created = false;
                    stored
                }
                None => {
                    _ = index.register(&segment.name)?;
                    created = true;
                    segment.name.clone()
                }
            };
            dir = dir.join(&stored);
            let suffix = if created { None } else { self.stored_suffix(&dir)? };
            resolved.push(Segment {
                name: stored,
                suffix,
            });
        }

        let entry = EntryRef {
            location: location.to_path_buf(),
            metapath: MetaPath::from_segments(resolved)?,
            path: dir,
        };
        Ok((entry, created))
    }

    /// Write `value` at `metapath`, creating missing entries on the way.
    ///
    /// The effective suffix is `suffix`, else the metapath's suffix, else
    /// one inferred from the value (preferring the stored suffix). The
    /// value and an explicit suffix are checked before anything is created.
    ///
    /// Every write onto an existing entry appends its prior state to
    /// history, whatever its type. An entry without a live value (cleared,
    /// or a container so far) is recorded as a `null` value.
    pub fn write(
        &self,
        location: &Path,
        metapath: &MetaPath,
        value: Value,
        suffix: Option<&str>,
    ) -> Result<EntryRef> {
        let target = self.container_dir(location)?.join(metapath.to_relative_path());
        if !value.is_finite() {
            return Err(Error::invalid_value(&target, "floats must be finite"));
        }

        let explicit = match suffix.or(metapath.suffix()) {
            Some(token) => {
                let kind = self.registry.require(token)?;
                let token = fold_token(token);
                if !value.is_null() && value.kind() != kind {
                    return Err(Error::type_mismatch(&target, token, value.kind().as_str()));
                }
                Some((token, kind))
            }
            None => None,
        };

        let (mut entry, created) = self.ensure(location, &metapath.with_suffix(None))?;
        let _lock = EntryLock::acquire(&entry.path)?;
        let mut record = self.load_record(&entry.path)?.unwrap_or_default();

        let (suffix, value) = match explicit {
            Some((token, kind)) if value.is_null() => (token, kind.default_value()),
            Some((token, _)) => (token, value),
            None => {
                let hint = record.live.as_ref().map(|l| l.suffix.as_str());
                (self.registry.infer_suffix(&value, hint), value)
            }
        };

        match record.live.take() {
            Some(previous) => {
                if previous.suffix != suffix {
                    let shown = entry.path.display().to_string();
                    log_debug!("Type change at {shown}: {from} -> {to}", shown: shown, from: previous.suffix.as_str(), to: suffix.as_str());
                }
                record.history.append(previous, now_micros());
            }
            None if !created => {
                let empty = TypedValue::new(self.registry.suffix_for(ValueKind::Null), Value::Null);
                record.history.append(empty, now_micros());
            }
            None => {}
        }
        record.live = Some(TypedValue::new(suffix.clone(), value));
        self.save_record(&entry.path, &record)?;

        entry.metapath = entry.metapath.with_suffix(Some(&suffix));
        let stored = entry.to_string();
        log_info!("Wrote {stored} (history {depth})", stored: stored, depth: record.history.len());
        Ok(entry)
    }

    /// Apply `op` to the record of an existing entry under its lock.
    fn update<F>(&self, entry: &EntryRef, op: F) -> Result<()>
    where
        F: FnOnce(&mut EntryRecord) -> bool,
    {
        let _lock = EntryLock::acquire(&entry.path)?;
        let Some(mut record) = self.load_record(&entry.path)? else {
            return Ok(());
        };
        if op(&mut record) {
            self.save_record(&entry.path, &record)?;
        }
        Ok(())
    }

    /// Remove the live value, moving it into history.
    pub fn clear(&self, location: &Path, metapath: &MetaPath) -> Result<()> {
        let entry = self.locate(location, metapath, Match::Typed)?;
        self.update(&entry, |record| match record.live.take() {
            Some(previous) => {
                record.history.append(previous, now_micros());
                true
            }
            None => false,
        })?;
        let shown = entry.to_string();
        log_info!("Cleared {shown}", shown: shown);
        Ok(())
    }

    /// Take the entry, its children and its history out of the store.
    ///
    /// Unless `permanent`, the entry directory moves to the `.trash`
    /// directory beside it, replacing any earlier trashed entry of the
    /// same name, and can be brought back with [`Self::recover`].
    pub fn remove(&self, location: &Path, metapath: &MetaPath, permanent: bool) -> Result<()> {
        let entry = self.locate(location, metapath, Match::Typed)?;
        let shown = entry.to_string();
        if permanent {
            std::fs::remove_dir_all(&entry.path).at(&entry.path)?;
            log_info!("Removed {shown}", shown: shown);
            return Ok(());
        }

        let trash = trash_dir(&entry.path)?;
        std::fs::create_dir_all(&trash).at(&trash)?;
        for stale in NameIndex::new(&trash).matches(entry.name())? {
            let stale = trash.join(stale);
            std::fs::remove_dir_all(&stale).at(&stale)?;
        }
        let target = trash.join(entry.name());
        std::fs::rename(&entry.path, &target).at(&entry.path)?;
        log_info!("Moved {shown} to trash", shown: shown);
        Ok(())
    }

    /// Move a trashed entry back to where it was removed from.
    ///
    /// Fails with `NameConflict` when the name was taken again meanwhile.
    pub fn recover(&self, location: &Path, metapath: &MetaPath) -> Result<EntryRef> {
        let bare = metapath.with_suffix(None);
        let parent = match bare.parents() {
            [] => self.container_dir(location)?,
            parents => {
                let parent = MetaPath::from_segments(parents.to_vec())?;
                self.locate(location, &parent, Match::Name)?.path
            }
        };

        let trash = parent.join(TRASH_DIR);
        let stored = NameIndex::new(&trash).require(bare.name())?;
        let index = NameIndex::new(&parent);
        if index.is_taken(&stored)? {
            return Err(Error::name_conflict(parent.join(&stored)));
        }
        let target = parent.join(&stored);
        std::fs::rename(trash.join(&stored), &target).at(&target)?;

        let entry = self.locate(location, &bare, Match::Name)?;
        let shown = entry.to_string();
        log_info!("Recovered {shown}", shown: shown);
        Ok(entry)
    }

    /// Empty the entry's history, keeping its live value.
    pub fn purge_history(&self, location: &Path, metapath: &MetaPath) -> Result<()> {
        let entry = self.locate(location, metapath, Match::Name)?;
        self.update(&entry, |record| {
            let had = !record.history.is_empty();
            record.history.purge();
            had
        })?;
        let shown = entry.to_string();
        log_info!("Purged history of {shown}", shown: shown);
        Ok(())
    }

    pub fn history(&self, entry: &EntryRef) -> Result<HistoryLog> {
        Ok(self
            .load_record(&entry.path)?
            .map(|r| r.history)
            .unwrap_or_default())
    }

    /// The (value, suffix) recorded at `ordinal`; nothing is mutated.
    pub fn restore(&self, entry: &EntryRef, ordinal: usize) -> Result<TypedValue> {
        Ok(self.history(entry)?.at(ordinal)?.typed())
    }

    pub fn kind(&self, entry: &EntryRef) -> Result<EntryKind> {
        let live = self.load_record(&entry.path)?.and_then(|r| r.live);
        let has_children = !NameIndex::new(&entry.path).names()?.is_empty();
        Ok(match (live, has_children) {
            (None, _) => EntryKind::Container,
            (Some(v), false) => EntryKind::Leaf(v),
            (Some(v), true) => EntryKind::Branch(v),
        })
    }

    fn children_in(&self, location: &Path, prefix: &[Segment], dir: &Path) -> Result<Vec<EntryRef>> {
        NameIndex::new(dir)
            .names()?
            .into_iter()
            .map(|name| {
                let path = dir.join(&name);
                let suffix = self.stored_suffix(&path)?;
                let mut segments = prefix.to_vec();
                segments.push(Segment { name, suffix });
                Ok(EntryRef {
                    location: location.to_path_buf(),
                    metapath: MetaPath::from_segments(segments)?,
                    path,
                })
            })
            .collect()
    }

    /// Top-level entries of a location, sorted by stored name
    pub fn children(&self, location: &Path) -> Result<Vec<EntryRef>> {
        let dir = self.container_dir(location)?;
        self.children_in(location, &[], &dir)
    }

    /// Child entries of an entry
    pub fn children_of(&self, entry: &EntryRef) -> Result<Vec<EntryRef>> {
        self.children_in(&entry.location, entry.metapath.segments(), &entry.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, EntryStore) {
        let tmp = tempfile::tempdir().unwrap();
        (tmp, EntryStore::new(".meta", TypeRegistry::new()))
    }

    fn mp(store: &EntryStore, s: &str) -> MetaPath {
        MetaPath::split(s, store.registry()).unwrap()
    }

    #[test]
    fn test_write_creates_layout() {
        let (tmp, store) = setup();
        let entry = store
            .write(tmp.path(), &mp(&store, "address/street"), Value::from("Code Street 5"), None)
            .unwrap();

        assert_eq!(entry.path, tmp.path().join(".meta/address/street"));
        assert!(entry.path.join(RECORD_FILE).is_file());
        assert_eq!(entry.stored_name(), "street.string");
        // Intermediate entry is a valueless container
        assert!(!tmp.path().join(".meta/address").join(RECORD_FILE).exists());
    }

    #[test]
    fn test_same_type_write_appends_history() {
        let (tmp, store) = setup();
        let path = mp(&store, "count");
        let _ = store.write(tmp.path(), &path, Value::Int(1), None).unwrap();
        let entry = store.write(tmp.path(), &path, Value::Int(2), None).unwrap();

        let history = store.history(&entry).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.at(0).unwrap().value, Value::Int(1));
        assert_eq!(store.read(tmp.path(), &path, None).unwrap().value, Value::Int(2));
    }

    #[test]
    fn test_explicit_suffix_checks_value_kind() {
        let (tmp, store) = setup();
        let err = store
            .write(tmp.path(), &mp(&store, "age.int"), Value::from("old"), None)
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));

        let err = store
            .write(tmp.path(), &mp(&store, "age"), Value::Int(1), Some("decimal"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownType(_)));
    }

    #[test]
    fn test_null_with_suffix_stores_default() {
        let (tmp, store) = setup();
        let _ = store
            .write(tmp.path(), &mp(&store, "tags.list"), Value::Null, None)
            .unwrap();
        let live = store.read(tmp.path(), &mp(&store, "tags"), None).unwrap();
        assert_eq!(live, TypedValue::new("list", Value::List(vec![])));
    }

    #[test]
    fn test_alias_suffix_preserved_on_rewrite() {
        let (tmp, store) = setup();
        let _ = store
            .write(tmp.path(), &mp(&store, "notes.text"), Value::from("a"), None)
            .unwrap();
        let entry = store
            .write(tmp.path(), &mp(&store, "notes"), Value::from("b"), None)
            .unwrap();
        assert_eq!(entry.stored_name(), "notes.text");
    }

    #[test]
    fn test_read_requires_value() {
        let (tmp, store) = setup();
        let _ = store
            .write(tmp.path(), &mp(&store, "group/child"), Value::Int(1), None)
            .unwrap();
        let err = store.read(tmp.path(), &mp(&store, "group"), None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_clear_keeps_history() {
        let (tmp, store) = setup();
        let path = mp(&store, "flag");
        let entry = store.write(tmp.path(), &path, Value::Bool(true), None).unwrap();
        store.clear(tmp.path(), &path).unwrap();

        assert!(store.read(tmp.path(), &path, None).unwrap_err().is_not_found());
        let restored = store.restore(&entry, 0).unwrap();
        assert_eq!(restored, TypedValue::new("bool", Value::Bool(true)));

        // Entry still exists, so the name stays taken
        assert!(store.resolve(tmp.path(), &path).unwrap().is_some());
    }

    #[test]
    fn test_kind_variants() {
        let (tmp, store) = setup();
        let _ = store
            .write(tmp.path(), &mp(&store, "a/b"), Value::Int(1), None)
            .unwrap();
        let a = store.locate(tmp.path(), &mp(&store, "a"), Match::Name).unwrap();
        let b = store.locate(tmp.path(), &mp(&store, "a/b"), Match::Name).unwrap();
        assert_eq!(store.kind(&a).unwrap(), EntryKind::Container);
        assert!(matches!(store.kind(&b).unwrap(), EntryKind::Leaf(_)));

        let _ = store.write(tmp.path(), &mp(&store, "a"), Value::from("x"), None).unwrap();
        let kind = store.kind(&a).unwrap();
        assert!(matches!(kind, EntryKind::Branch(_)));
        assert_eq!(kind.value().unwrap().suffix, "string");
    }

    #[test]
    fn test_children_sorted_with_suffixes() {
        let (tmp, store) = setup();
        for (name, value) in [("b", Value::Int(2)), ("a", Value::from("x")), ("c", Value::Bool(false))] {
            let _ = store.write(tmp.path(), &mp(&store, name), value, None).unwrap();
        }
        let names: Vec<String> = store
            .children(tmp.path())
            .unwrap()
            .iter()
            .map(EntryRef::stored_name)
            .collect();
        assert_eq!(names, vec!["a.string", "b.int", "c.bool"]);
    }

    #[test]
    fn test_relative_location_rejected() {
        let (_tmp, store) = setup();
        let err = store
            .write(Path::new("relative/dir"), &mp(&store, "x"), Value::Int(1), None)
            .unwrap_err();
        assert!(matches!(err, Error::RelativeLocation(_)));
    }

    #[test]
    fn test_remove_and_purge() {
        let (tmp, store) = setup();
        let path = mp(&store, "gone");
        let _ = store.write(tmp.path(), &path, Value::Int(1), None).unwrap();
        let entry = store.write(tmp.path(), &path, Value::Int(2), None).unwrap();

        store.purge_history(tmp.path(), &path).unwrap();
        assert!(store.history(&entry).unwrap().is_empty());
        assert_eq!(store.read(tmp.path(), &path, None).unwrap().value, Value::Int(2));

        store.remove(tmp.path(), &path, true).unwrap();
        assert!(store.resolve(tmp.path(), &path).unwrap().is_none());
        assert!(!entry.path.exists());
        assert!(store.recover(tmp.path(), &path).unwrap_err().is_not_found());
    }

    #[test]
    fn test_trash_keeps_latest_copy() {
        let (tmp, store) = setup();
        let _ = store.write(tmp.path(), &mp(&store, "draft"), Value::Int(1), None).unwrap();
        store.remove(tmp.path(), &mp(&store, "draft"), false).unwrap();
        let _ = store.write(tmp.path(), &mp(&store, "DRAFT"), Value::Int(2), None).unwrap();
        store.remove(tmp.path(), &mp(&store, "draft"), false).unwrap();

        let trash = tmp.path().join(".meta").join(TRASH_DIR);
        assert_eq!(NameIndex::new(&trash).names().unwrap(), vec!["DRAFT"]);

        let entry = store.recover(tmp.path(), &mp(&store, "draft")).unwrap();
        assert_eq!(entry.stored_name(), "DRAFT.int");
        assert!(NameIndex::new(&trash).names().unwrap().is_empty());
    }

    #[test]
    fn test_recover_refuses_taken_name() {
        let (tmp, store) = setup();
        let path = mp(&store, "group/member");
        let _ = store.write(tmp.path(), &path, Value::Int(1), None).unwrap();
        store.remove(tmp.path(), &path, false).unwrap();
        assert!(tmp.path().join(".meta/group").join(TRASH_DIR).join("member").is_dir());

        let _ = store.write(tmp.path(), &path, Value::Int(2), None).unwrap();
        let err = store.recover(tmp.path(), &path).unwrap_err();
        assert!(matches!(err, Error::NameConflict(_)));
    }

    #[test]
    fn test_write_reports_intermediate_suffixes() {
        let (tmp, store) = setup();
        let _ = store.write(tmp.path(), &mp(&store, "group"), Value::from("g"), None).unwrap();
        let entry = store
            .write(tmp.path(), &mp(&store, "group/member"), Value::Int(1), None)
            .unwrap();
        assert_eq!(entry.metapath.join(), "group.string/member.int");

        // Created intermediates hold no value yet
        let entry = store
            .write(tmp.path(), &mp(&store, "new/member"), Value::Int(1), None)
            .unwrap();
        assert_eq!(entry.metapath.join(), "new/member.int");
    }

    #[test]
    fn test_rejected_write_leaves_no_entry() {
        let (tmp, store) = setup();
        let _ = store
            .write(tmp.path(), &mp(&store, "nested/age.int"), Value::from("old"), None)
            .unwrap_err();
        let _ = store
            .write(tmp.path(), &mp(&store, "ratio"), Value::Float(f64::NAN), None)
            .unwrap_err();
        assert!(store.children(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_non_normalized_location_rejected() {
        let (tmp, store) = setup();
        let sideways = tmp.path().join("a/b/../c");
        let err = store
            .write(&sideways, &mp(&store, "x"), Value::Int(1), None)
            .unwrap_err();
        assert!(matches!(err, Error::RelativeLocation(_)));
        assert!(!tmp.path().join("a").exists());
    }
}

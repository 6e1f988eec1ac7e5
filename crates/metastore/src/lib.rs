//! Hierarchical, filesystem-backed metadata store.
//!
//! Every directory ("location") may carry typed metadata entries in a
//! hidden container directory. Names are unique per location regardless of
//! case or suffix, superseded values are kept in an append-only history,
//! and reads may fall back to ancestor locations.

pub mod config;
pub mod entry;
pub mod error;
pub mod history;
pub mod index;
pub mod inherit;
mod lock;
pub mod path;
pub mod registry;
pub mod store;
pub mod value;

pub use config::{CONFIG_ENV, DEFAULT_CONTAINER, StoreConfig};
pub use entry::{EntryKind, EntryRecord, EntryRef, EntryStore, Match};
pub use error::{Error, Result};
pub use history::{HistoryLog, HistoryRecord, TypedValue};
pub use index::NameIndex;
pub use inherit::{Ancestors, InheritanceResolver, Pulled};
pub use path::{MetaPath, Segment};
pub use registry::TypeRegistry;
pub use store::Store;
pub use value::{Value, ValueKind};

#[cfg(test)]
mod tests;

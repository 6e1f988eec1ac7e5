use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use metastore::{HistoryRecord, Pulled, Store, StoreConfig, TypedValue, Value, ValueKind};

/// Global options shared by every command
#[derive(Debug, Clone, Default)]
pub struct MetaContext {
    /// Location commands operate on; the current directory when unset
    pub root: Option<PathBuf>,
    /// YAML configuration file; `METASTORE_CONFIG` when unset
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

impl MetaContext {
    #[must_use]
    pub fn new(root: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        Self {
            root,
            config,
            verbose: false,
        }
    }

    pub fn store_config(&self) -> Result<StoreConfig> {
        let config = match &self.config {
            Some(path) => StoreConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => StoreConfig::from_env().context("Failed to load config from environment")?,
        };
        Ok(config)
    }

    pub fn open_store(&self) -> Result<Store> {
        Ok(Store::new(&self.store_config()?)?)
    }

    /// The canonical location commands operate on
    pub fn location(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let location = match &self.root {
            Some(root) => absolute(&cwd, root),
            None => cwd,
        };
        if !location.is_dir() {
            return Err(anyhow!("Location {} is not a directory", location.display()));
        }
        // Ancestors are walked lexically; resolve `..` and symlinks first
        std::fs::canonicalize(&location)
            .with_context(|| format!("Failed to resolve location {}", location.display()))
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Parse a command-line value as JSON, falling back to a plain string.
#[must_use]
pub fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::String(raw.to_string()),
    }
}

/// Parse a command-line value for an entry of `kind`.
///
/// A string-typed entry takes the raw text as is, so `90210` stays a
/// string; anything else goes through [`parse_value`].
#[must_use]
pub fn parse_value_as(raw: &str, kind: Option<ValueKind>) -> Value {
    match kind {
        Some(ValueKind::String) => Value::String(raw.to_string()),
        _ => parse_value(raw),
    }
}

/// `value  (suffix)`
#[must_use]
pub fn format_typed(typed: &TypedValue) -> String {
    format!("{}\t({})", typed.value, typed.suffix)
}

#[must_use]
pub fn format_pulled(pulled: &Pulled, location: &Path, verbose: bool) -> String {
    let mut line = format_typed(&pulled.value);
    if pulled.is_inherited(location) {
        line.push_str(&format!("\tfrom {}", pulled.source.display()));
    }
    if verbose {
        for shadowed in &pulled.overridden {
            line.push_str(&format!("\n  overrides {}", shadowed.display()));
        }
    }
    line
}

/// `ordinal  time  value  (suffix)`
#[must_use]
pub fn format_history(ordinal: usize, record: &HistoryRecord) -> String {
    let when = record
        .time()
        .map_or_else(|| record.timestamp.to_string(), |t| t.to_rfc3339());
    format!("{}\t{}\t{}", ordinal, when, format_typed(&record.typed()))
}

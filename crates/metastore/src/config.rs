use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::value::ValueKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable naming a YAML configuration file
pub const CONFIG_ENV: &str = "METASTORE_CONFIG";

/// Default name of the hidden directory holding a location's entries
pub const DEFAULT_CONTAINER: &str = ".meta";

/// Store configuration
///
/// ```yaml
/// container: .meta
/// types:
///   md: string
///   date: string
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub container: String,
    /// Extra suffix tokens and the built-in kind each one names
    pub types: BTreeMap<String, ValueKind>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            types: BTreeMap::new(),
        }
    }
}

impl StoreConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(text).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&text)
    }

    /// Load the file named by `METASTORE_CONFIG`, or use defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        // The container must be hidden from the name index
        if !self.container.starts_with('.')
            || self.container.len() < 2
            || self.container == ".."
            || self.container.contains(['/', '\\'])
        {
            return Err(Error::config(format!(
                "container '{}' must be a single hidden directory name",
                self.container
            )));
        }
        Ok(())
    }

    /// Built-in tokens extended with the configured ones
    pub fn registry(&self) -> Result<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        for (token, kind) in &self.types {
            registry.register(token, *kind)?;
        }
        Ok(registry)
    }
}

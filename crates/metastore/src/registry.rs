//! Suffix tokens and the value kinds they name.
//!
//! Every kind has one canonical token (the first registered for it);
//! aliases such as `text` for strings are accepted on input and preserved
//! once stored.

use crate::error::{Error, Result};
use crate::value::{Value, ValueKind};
use std::collections::BTreeMap;

const BUILTIN: &[(&str, ValueKind)] = &[
    ("null", ValueKind::Null),
    ("bool", ValueKind::Bool),
    ("int", ValueKind::Int),
    ("float", ValueKind::Float),
    ("string", ValueKind::String),
    ("text", ValueKind::String),
    ("list", ValueKind::List),
    ("tuple", ValueKind::List),
    ("dict", ValueKind::Dict),
    ("bytes", ValueKind::Bytes),
];

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    tokens: BTreeMap<String, ValueKind>,
    canonical: BTreeMap<ValueKind, String>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = Self {
            tokens: BTreeMap::new(),
            canonical: BTreeMap::new(),
        };
        for (token, kind) in BUILTIN {
            _ = registry.tokens.insert((*token).to_string(), *kind);
            _ = registry
                .canonical
                .entry(*kind)
                .or_insert_with(|| (*token).to_string());
        }
        registry
    }
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional token for `kind`.
    ///
    /// Registering a known token again with the same kind is a no-op;
    /// with a different kind it is an error.
    pub fn register(&mut self, token: &str, kind: ValueKind) -> Result<()> {
        if token.is_empty() || token.contains(['.', '/', '\\']) {
            return Err(Error::invalid_name(token));
        }
        let token = fold_token(token);
        match self.tokens.get(&token) {
            Some(existing) if *existing == kind => Ok(()),
            Some(existing) => Err(Error::config(format!(
                "suffix '{}' already names {}, cannot name {}",
                token, existing, kind
            ))),
            None => {
                _ = self.tokens.insert(token, kind);
                Ok(())
            }
        }
    }

    /// Canonical token for a kind
    #[must_use]
    pub fn suffix_for(&self, kind: ValueKind) -> &str {
        self.canonical
            .get(&kind)
            .map_or_else(|| kind.as_str(), String::as_str)
    }

    /// Kind named by a token, if the token is registered
    #[must_use]
    pub fn type_for_suffix(&self, token: &str) -> Option<ValueKind> {
        self.tokens.get(&fold_token(token)).copied()
    }

    #[must_use]
    pub fn is_suffix(&self, token: &str) -> bool {
        self.type_for_suffix(token).is_some()
    }

    /// Like [`Self::type_for_suffix`], failing with `UnknownType`.
    pub fn require(&self, token: &str) -> Result<ValueKind> {
        self.type_for_suffix(token)
            .ok_or_else(|| Error::unknown_type(token))
    }

    /// Suffix for a value written without an explicit one.
    ///
    /// `hint`, typically the suffix the entry is already stored under,
    /// wins when it names the value's kind.
    #[must_use]
    pub fn infer_suffix(&self, value: &Value, hint: Option<&str>) -> String {
        let kind = value.kind();
        match hint {
            Some(hint) if self.type_for_suffix(hint) == Some(kind) => hint.to_string(),
            _ => self.suffix_for(kind).to_string(),
        }
    }

    /// All registered tokens in sorted order
    pub fn tokens(&self) -> impl Iterator<Item = (&str, ValueKind)> {
        self.tokens.iter().map(|(t, k)| (t.as_str(), *k))
    }
}

/// Suffix tokens are matched and stored lower-cased.
#[must_use]
pub fn fold_token(token: &str) -> String {
    token.to_lowercase()
}

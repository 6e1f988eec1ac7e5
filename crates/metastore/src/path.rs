//! Metapath parsing and serialization.
//!
//! A metapath addresses an entry relative to a location:
//! `segment/segment/name.suffix`. A trailing `.token` is a suffix only when
//! the type registry knows the token; otherwise the dot belongs to the name.
//! Suffixes are kept on every segment they appear on.

use crate::error::{Error, Result};
use crate::registry::{TypeRegistry, fold_token};
use std::path::{Component, Path, PathBuf};

pub const SEPARATOR: char = '/';
pub const EXT: char = '.';

/// One parsed metapath segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub suffix: Option<String>,
}

/// A parsed metapath; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaPath {
    segments: Vec<Segment>,
}

impl Segment {
    /// Parse a single segment, detecting a registered suffix.
    pub fn parse(raw: &str, registry: &TypeRegistry) -> Result<Self> {
        validate_name(raw)?;
        let segment = match raw.rsplit_once(EXT) {
            Some((name, token)) if !name.is_empty() && registry.is_suffix(token) => Segment {
                name: name.to_string(),
                suffix: Some(fold_token(token)),
            },
            _ => Segment {
                name: raw.to_string(),
                suffix: None,
            },
        };
        Ok(segment)
    }

    #[must_use]
    pub fn bare(name: &str) -> Self {
        Segment {
            name: name.to_string(),
            suffix: None,
        }
    }

    /// Lower-cased name used for every comparison
    #[must_use]
    pub fn folded(&self) -> String {
        fold_name(&self.name)
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.suffix {
            Some(suffix) => write!(f, "{}{}{}", self.name, EXT, suffix),
            None => write!(f, "{}", self.name),
        }
    }
}

impl MetaPath {
    /// Split a metapath string into its segments.
    pub fn split(metapath: &str, registry: &TypeRegistry) -> Result<Self> {
        let segments = normalize(metapath)?
            .iter()
            .map(|raw| Segment::parse(raw, registry))
            .collect::<Result<Vec<_>>>()?;
        Self::from_segments(segments)
    }

    pub fn from_segments(segments: Vec<Segment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::empty_path());
        }
        Ok(Self { segments })
    }

    /// Segments leading to the entry, without the entry itself
    #[must_use]
    pub fn parents(&self) -> &[Segment] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The addressed entry
    #[must_use]
    pub fn leaf(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.leaf().name
    }

    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.leaf().suffix.as_deref()
    }

    /// Same path with the leaf suffix replaced (or removed)
    #[must_use]
    pub fn with_suffix(&self, suffix: Option<&str>) -> Self {
        let mut segments = self.segments.clone();
        let last = segments.len() - 1;
        segments[last].suffix = suffix.map(str::to_string);
        Self { segments }
    }

    /// Join back into metapath syntax.
    #[must_use]
    pub fn join(&self) -> String {
        join(&self.segments)
    }

    /// Relative host path of the entry directory below a container
    #[must_use]
    pub fn to_relative_path(&self) -> PathBuf {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }
}

impl std::fmt::Display for MetaPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.join())
    }
}

/// Join segments into metapath syntax.
#[must_use]
pub fn join(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// Lower-case a name for case-insensitive comparison
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Reject names that can never be stored as an entry.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with(EXT) || name.contains(['\0', '/', '\\']) {
        return Err(Error::invalid_name(name));
    }
    Ok(())
}

/// Conform a metapath to single forward slashes, resolving `.` and `..`.
pub fn normalize(metapath: &str) -> Result<Vec<String>> {
    let unified = metapath.replace('\\', "/");
    let mut parts: Vec<String> = Vec::new();
    for part in unified.split(SEPARATOR) {
        match part {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return Err(Error::invalid_name(metapath));
                }
            }
            other => parts.push(other.to_string()),
        }
    }
    Ok(parts)
}

/// Split a host path that runs through a container into
/// `(location, metapath)`.
///
/// The last component equal to `container` separates the two; a path that
/// names the container itself yields an empty metapath.
#[must_use]
pub fn split_location<P: AsRef<Path>>(path: P, container: &str) -> Option<(PathBuf, String)> {
    let components: Vec<Component<'_>> = path.as_ref().components().collect();
    let at = components
        .iter()
        .rposition(|c| matches!(c, Component::Normal(n) if *n == container))?;
    let location: PathBuf = components[..at].iter().collect();
    let metapath = components[at + 1..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/");
    Some((location, metapath))
}

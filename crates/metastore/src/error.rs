use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving, reading or mutating entries
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No entry (or ancestor entry) matches the request
    #[error("Entry not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A write collides with something that is not an entry of the same name
    #[error("Name conflict: {}", .0.display())]
    NameConflict(PathBuf),

    /// Suffix token not registered with the type registry
    #[error("Unknown type suffix: {0}")]
    UnknownType(String),

    /// A typed request disagrees with the concrete stored type
    #[error("Type mismatch at {}: expected {expected}, found {found}", .path.display())]
    TypeMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// History lookup beyond the end of the log
    #[error("History version {ordinal} out of range (log holds {len})")]
    OutOfRange { ordinal: usize, len: usize },

    /// Two entries share one case-insensitive, suffix-agnostic name
    #[error("Corrupt index in {}: {names:?} resolve to the same name", .container.display())]
    CorruptIndex {
        container: PathBuf,
        names: Vec<String>,
    },

    /// Metapath segment that can never name an entry
    #[error("Invalid entry name: {0}")]
    InvalidName(String),

    /// Value that cannot be stored, such as a NaN float
    #[error("Invalid value for {}: {reason}", .path.display())]
    InvalidValue { path: PathBuf, reason: String },

    #[error("Metapath is empty")]
    EmptyPath,

    /// Locations are host directories given as absolute paths without
    /// `.` or `..` components
    #[error("Location must be an absolute, normalized path: {}", .0.display())]
    RelativeLocation(PathBuf),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn not_found<P: AsRef<Path>>(path: P) -> Self {
        Error::NotFound(path.as_ref().to_path_buf())
    }

    pub fn name_conflict<P: AsRef<Path>>(path: P) -> Self {
        Error::NameConflict(path.as_ref().to_path_buf())
    }

    pub fn unknown_type<S: AsRef<str>>(token: S) -> Self {
        Error::UnknownType(token.as_ref().into())
    }

    pub fn type_mismatch<P: AsRef<Path>, E: AsRef<str>, F: AsRef<str>>(
        path: P,
        expected: E,
        found: F,
    ) -> Self {
        Error::TypeMismatch {
            path: path.as_ref().to_path_buf(),
            expected: expected.as_ref().into(),
            found: found.as_ref().into(),
        }
    }

    pub fn out_of_range(ordinal: usize, len: usize) -> Self {
        Error::OutOfRange { ordinal, len }
    }

    pub fn corrupt_index<P: AsRef<Path>>(container: P, names: Vec<String>) -> Self {
        Error::CorruptIndex {
            container: container.as_ref().to_path_buf(),
            names,
        }
    }

    pub fn invalid_name<S: AsRef<str>>(name: S) -> Self {
        Error::InvalidName(name.as_ref().into())
    }

    pub fn invalid_value<P: AsRef<Path>, S: AsRef<str>>(path: P, reason: S) -> Self {
        Error::InvalidValue {
            path: path.as_ref().to_path_buf(),
            reason: reason.as_ref().into(),
        }
    }

    pub fn empty_path() -> Self {
        Error::EmptyPath
    }

    pub fn relative_location<P: AsRef<Path>>(path: P) -> Self {
        Error::RelativeLocation(path.as_ref().to_path_buf())
    }

    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn config<S: AsRef<str>>(msg: S) -> Self {
        Error::Config(msg.as_ref().into())
    }

    /// A corrupt index requires external repair and is never retried.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::CorruptIndex { .. })
    }

    /// True for the resolution failures that mean "nothing matched".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Attach a path to `std::io` failures.
pub(crate) trait IoContext<T> {
    fn at<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|e| Error::io(path, e))
    }
}

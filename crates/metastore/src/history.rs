use crate::error::{Error, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A value together with the suffix it was stored under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    pub suffix: String,
    pub value: Value,
}

/// Immutable snapshot of a superseded value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub suffix: String,
    pub value: Value,
    /// Microseconds since the Unix epoch
    pub timestamp: i64,
}

/// Append-only log of an entry's prior states, oldest first.
///
/// Records are never edited or removed one at a time; [`HistoryLog::purge`]
/// is the only way to shrink the log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl TypedValue {
    pub fn new<S: Into<String>>(suffix: S, value: Value) -> Self {
        Self {
            suffix: suffix.into(),
            value,
        }
    }
}

impl std::fmt::Display for TypedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl HistoryRecord {
    #[must_use]
    pub fn typed(&self) -> TypedValue {
        TypedValue::new(self.suffix.clone(), self.value.clone())
    }

    #[must_use]
    pub fn time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_micros(self.timestamp)
    }
}

impl HistoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, superseded: TypedValue, timestamp: i64) {
        self.records.push(HistoryRecord {
            suffix: superseded.suffix,
            value: superseded.value,
            timestamp,
        });
    }

    /// Record at `ordinal`, counting from the oldest.
    pub fn at(&self, ordinal: usize) -> Result<&HistoryRecord> {
        self.records
            .get(ordinal)
            .ok_or_else(|| Error::out_of_range(ordinal, self.records.len()))
    }

    #[must_use]
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Drop every record.
    pub fn purge(&mut self) {
        self.records.clear();
    }
}

/// Current time in the resolution history records use
#[must_use]
pub fn now_micros() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

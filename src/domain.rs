use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashError;

/// Archive collection code, e.g. `TCGA-BRCA`. Codes are ASCII identifiers
/// with optional dash-separated segments; anything else is rejected up front
/// so it never reaches a request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(String);

impl CollectionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionId {
    type Err = DashError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let is_valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.');
        if !is_valid {
            return Err(DashError::InvalidCollectionId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// One catalog entry: the archive code plus the human-readable label,
/// which falls back to the raw code when the label table has no mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub id: CollectionId,
    pub display_label: String,
}

/// One imaging series as returned by the series endpoint. Lives only for
/// the duration of a fetch-aggregate-render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRecord {
    pub modality: String,
    pub series_date: Option<String>,
}

impl SeriesRecord {
    /// First four bytes of the series date as a year. `None` when the date
    /// is absent, too short, or the cut would land inside a multi-byte
    /// character; dates arrive unvalidated off the wire.
    pub fn year(&self) -> Option<&str> {
        self.series_date.as_deref().and_then(|date| date.get(..4))
    }
}

/// Series records fetched for one cycle, keyed by collection in the order
/// the effective selection listed them.
pub type SeriesBatch = Vec<(CollectionId, Vec<SeriesRecord>)>;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::types::{Coordinate, TextVersion};

// Serializable, comparable, explicit defaults.
// Changing any field changes the corpus version.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CorpusBuildConfig {
    pub version: String,
    pub hash_algorithm: String,
}

impl CorpusBuildConfig {
    pub fn v0() -> Self {
        Self {
            version: "1".into(),
            hash_algorithm: "sha256".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManifestEntry {
    pub coordinate: Coordinate,
    pub version: TextVersion,
    pub file: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CorpusManifest {
    pub corpus_version: String,
    pub build_config: CorpusBuildConfig,
    pub created_at: DateTime<Utc>, // informational only
    pub entry_count: usize,
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CorpusIndex {
    entries: BTreeMap<Coordinate, String>,
}

impl CorpusIndex {
    pub fn new(entries: BTreeMap<Coordinate, String>) -> Self {
        Self { entries }
    }

    pub fn file_for(&self, coordinate: &Coordinate) -> Option<&str> {
        self.entries.get(coordinate).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

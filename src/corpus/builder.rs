use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::corpus::corpus::TextCorpus;
use crate::corpus::entry::TextEntry;
use crate::corpus::versioning::{CorpusBuildConfig, CorpusIndex, CorpusManifest, ManifestEntry};

#[derive(Debug, Error)]
pub enum CorpusBuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),
    #[error("Duplicate coordinate: {0}")]
    DuplicateCoordinate(String),
}

/// Writes a corpus directory:
///
/// ```text
/// <output>/manifest.json
/// <output>/index.json
/// <output>/texts/<parent>-<child>.json
/// ```
///
/// Single-threaded and non-reentrant.
pub struct CorpusBuilder {
    config: CorpusBuildConfig,
}

impl CorpusBuilder {
    pub fn new(config: CorpusBuildConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        entries: Vec<TextEntry>,
        output_dir: &Path,
    ) -> Result<TextCorpus, CorpusBuildError> {
        if output_dir.exists() {
            return Err(CorpusBuildError::OutputExists(output_dir.to_path_buf()));
        }

        let mut sorted = entries;
        sorted.sort_by(|a, b| a.coordinate.cmp(&b.coordinate));

        // Duplicates are adjacent after the sort
        for pair in sorted.windows(2) {
            if pair[0].coordinate == pair[1].coordinate {
                return Err(CorpusBuildError::DuplicateCoordinate(pair[0].coordinate.key()));
            }
        }

        let mut placed = Vec::with_capacity(sorted.len());
        let mut index_entries = BTreeMap::new();

        // corpus_version = sha256(config_json + "coordinate:version" for each entry, sorted)
        let mut version_hasher = Sha256::new();
        version_hasher.update(serde_json::to_vec(&self.config)?);

        for entry in &sorted {
            let line = format!("{}:{}", entry.coordinate.key(), entry.version.as_str());
            version_hasher.update(line.as_bytes());

            let file = format!(
                "texts/{}-{}.json",
                entry.coordinate.parent(),
                entry.coordinate.child()
            );
            index_entries.insert(entry.coordinate, file.clone());
            placed.push((
                entry,
                ManifestEntry {
                    coordinate: entry.coordinate,
                    version: entry.version.clone(),
                    file,
                },
            ));
        }

        let corpus_version = format!("sha256:{}", hex::encode(version_hasher.finalize()));

        let manifest = CorpusManifest {
            corpus_version: corpus_version.clone(),
            build_config: self.config.clone(),
            created_at: Utc::now(),
            entry_count: sorted.len(),
            entries: placed.iter().map(|(_, m)| m.clone()).collect(),
        };
        let index = CorpusIndex::new(index_entries);

        // Build next to the target, then rename into place.
        let temp_dir = output_dir.with_extension(format!("tmp.{}", &corpus_version[7..19]));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir)?;
        }
        fs::create_dir_all(temp_dir.join("texts"))?;

        for (entry, manifest_entry) in &placed {
            let f = fs::File::create(temp_dir.join(&manifest_entry.file))?;
            serde_json::to_writer(&f, entry)?;
            f.sync_all()?;
        }

        let f_idx = fs::File::create(temp_dir.join("index.json"))?;
        serde_json::to_writer_pretty(&f_idx, &index)?;
        f_idx.sync_all()?;

        let f_man = fs::File::create(temp_dir.join("manifest.json"))?;
        serde_json::to_writer_pretty(&f_man, &manifest)?;
        f_man.sync_all()?;

        fs::rename(&temp_dir, output_dir)?;

        info!(
            corpus_version = %manifest.corpus_version,
            entries = manifest.entry_count,
            "built text corpus at {}",
            output_dir.display()
        );

        let texts = sorted
            .into_iter()
            .map(|entry| (entry.coordinate, entry.content))
            .collect();

        Ok(TextCorpus::from_parts(output_dir.to_path_buf(), manifest, texts))
    }
}

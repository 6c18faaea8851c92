// Read-only at runtime: no mutation, no update methods.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::corpus::entry::TextEntry;
use crate::corpus::versioning::CorpusManifest;
use crate::text::TextStore;
use crate::types::{Coordinate, TextVersion};
use crate::upstream::UpstreamError;

#[derive(Debug)]
pub struct TextCorpus {
    pub root: PathBuf,
    pub manifest: CorpusManifest,
    texts: BTreeMap<Coordinate, String>,
}

impl TextCorpus {
    pub(crate) fn from_parts(
        root: PathBuf,
        manifest: CorpusManifest,
        texts: BTreeMap<Coordinate, String>,
    ) -> Self {
        Self {
            root,
            manifest,
            texts,
        }
    }

    /// Open a built corpus, loading and verifying every entry it lists.
    pub fn open(root: &Path) -> Result<Self, Error> {
        let f = fs::File::open(root.join("manifest.json"))?;
        let manifest: CorpusManifest =
            serde_json::from_reader(f).map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

        let texts = load_entries(root, &manifest)?
            .into_iter()
            .map(|entry| (entry.coordinate, entry.content))
            .collect();

        Ok(Self::from_parts(root.to_path_buf(), manifest, texts))
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

fn load_entries(root: &Path, manifest: &CorpusManifest) -> Result<Vec<TextEntry>, Error> {
    let mut loaded = Vec::with_capacity(manifest.entries.len());
    for listed in &manifest.entries {
        let f = fs::File::open(root.join(&listed.file))?;
        let entry: TextEntry =
            serde_json::from_reader(f).map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

        if entry.coordinate != listed.coordinate {
            return Err(Error::new(ErrorKind::InvalidData, "Text coordinate mismatch"));
        }

        // Recompute from content rather than trusting the stored version
        let expected = TextVersion::from_content(entry.content.as_bytes());
        if expected != listed.version {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "Text version mismatch for {}: manifest says {}, content hashes to {}",
                    listed.coordinate,
                    listed.version.as_str(),
                    expected.as_str(),
                ),
            ));
        }
        loaded.push(entry);
    }
    Ok(loaded)
}

#[async_trait]
impl TextStore for TextCorpus {
    async fn get_text(&self, coordinate: &Coordinate) -> Result<Option<String>, UpstreamError> {
        Ok(self.texts.get(coordinate).cloned())
    }
}

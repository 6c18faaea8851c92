use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::{PayloadError, TextPayload};
use crate::types::{Coordinate, TextVersion};

#[derive(Debug, Error)]
pub enum TextEntryError {
    #[error("Text must be valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("Text at {coordinate} is unusable: {source}")]
    InvalidPayload {
        coordinate: Coordinate,
        #[source]
        source: PayloadError,
    },
}

/// One stored text of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntry {
    pub coordinate: Coordinate,
    pub version: TextVersion,
    pub content: String,
}

impl TextEntry {
    /// Ingest raw bytes into a TextEntry.
    ///
    /// The content must be UTF-8 and parse as a [`TextPayload`]; the version
    /// is the hash of the content exactly as given, with no newline or
    /// whitespace normalization.
    pub fn ingest(coordinate: Coordinate, raw_content: Vec<u8>) -> Result<Self, TextEntryError> {
        let content = String::from_utf8(raw_content)?;

        TextPayload::parse(&content)
            .map_err(|source| TextEntryError::InvalidPayload { coordinate, source })?;

        let version = TextVersion::from_content(content.as_bytes());

        Ok(TextEntry {
            coordinate,
            version,
            content,
        })
    }
}

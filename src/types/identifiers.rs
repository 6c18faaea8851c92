use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content hash version of a stored text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextVersion(String);

impl TextVersion {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        TextVersion(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity of a reading.
///
/// Hashes the question, the origin of the hexagram (input numbers or cast
/// lines), the output language and the creation instant, so two requests
/// with identical numbers still get distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingId(String);

impl ReadingId {
    pub fn derive(question: &str, origin: &str, language: &str, created_at: DateTime<Utc>) -> Self {
        let mut hasher = Sha256::new();
        for part in [
            question,
            origin,
            language,
            &created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(b"\n");
        }

        ReadingId(format!("sha256:{}", hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

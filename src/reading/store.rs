use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::assembler::HexagramRef;
use super::reading::Reading;
use crate::types::ReadingId;
use crate::upstream::UpstreamError;

/// History row: enough to list past readings without loading them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSummary {
    pub id: ReadingId,
    pub question: String,
    pub hexagram: HexagramRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resulting: Option<HexagramRef>,
    pub created_at: DateTime<Utc>,
    pub clarified: bool,
}

impl ReadingSummary {
    pub fn of(reading: &Reading) -> Self {
        ReadingSummary {
            id: reading.id().clone(),
            question: reading.question().to_string(),
            hexagram: reading.prediction().hexagram.clone(),
            resulting: reading.resulting().map(HexagramRef::of),
            created_at: reading.created_at(),
            clarified: reading.clarification().is_clarified(),
        }
    }
}

/// Persistence boundary for completed readings.
///
/// `save_reading` stores the whole reading or nothing; saving an existing
/// id replaces it.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn save_reading(&self, reading: &Reading) -> Result<(), UpstreamError>;

    async fn load_reading(&self, id: &ReadingId) -> Result<Option<Reading>, UpstreamError>;

    /// Oldest first.
    async fn list_readings(&self) -> Result<Vec<ReadingSummary>, UpstreamError>;
}

#[derive(Debug, Default)]
pub struct MemoryReadingStore {
    readings: RwLock<BTreeMap<ReadingId, Reading>>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn save_reading(&self, reading: &Reading) -> Result<(), UpstreamError> {
        self.readings
            .write()
            .await
            .insert(reading.id().clone(), reading.clone());
        Ok(())
    }

    async fn load_reading(&self, id: &ReadingId) -> Result<Option<Reading>, UpstreamError> {
        Ok(self.readings.read().await.get(id).cloned())
    }

    async fn list_readings(&self) -> Result<Vec<ReadingSummary>, UpstreamError> {
        let mut summaries: Vec<ReadingSummary> =
            self.readings.read().await.values().map(ReadingSummary::of).collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }
}

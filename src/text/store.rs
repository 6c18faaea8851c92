use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::types::Coordinate;
use crate::upstream::UpstreamError;

/// Lookup boundary of the text store.
///
/// Returns the raw stored text for a coordinate, or `None` when nothing is
/// stored there. Errors are reserved for faults of the store itself.
#[async_trait]
pub trait TextStore: Send + Sync {
    async fn get_text(&self, coordinate: &Coordinate) -> Result<Option<String>, UpstreamError>;
}

#[async_trait]
impl<T: TextStore + ?Sized> TextStore for Arc<T> {
    async fn get_text(&self, coordinate: &Coordinate) -> Result<Option<String>, UpstreamError> {
        (**self).get_text(coordinate).await
    }
}

/// Text store held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTextStore {
    entries: BTreeMap<Coordinate, String>,
}

impl MemoryTextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coordinate: Coordinate, text: impl Into<String>) {
        self.entries.insert(coordinate, text.into());
    }

    pub fn with(mut self, coordinate: Coordinate, text: impl Into<String>) -> Self {
        self.insert(coordinate, text);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl TextStore for MemoryTextStore {
    async fn get_text(&self, coordinate: &Coordinate) -> Result<Option<String>, UpstreamError> {
        Ok(self.entries.get(coordinate).cloned())
    }
}

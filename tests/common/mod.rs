#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use oracle_core::generation::{GenerationRequest, Generator};
use oracle_core::text::{MemoryTextStore, TextStore};
use oracle_core::types::Coordinate;
use oracle_core::upstream::UpstreamError;

/// Replays canned completions in order and records every request.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, UpstreamError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, completion: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(completion.into()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(UpstreamError::generation(message)));
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, UpstreamError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamError::generation("no scripted reply left")))
    }
}

/// Never answers in time.
pub struct SlowGenerator(pub Duration);

#[async_trait]
impl Generator for SlowGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, UpstreamError> {
        tokio::time::sleep(self.0).await;
        Ok(completion_for_bi())
    }
}

/// Wraps a store and counts lookups.
pub struct CountingStore<S> {
    pub inner: S,
    pub lookups: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: TextStore> TextStore for CountingStore<S> {
    async fn get_text(&self, coordinate: &Coordinate) -> Result<Option<String>, UpstreamError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_text(coordinate).await
    }
}

pub fn coord(parent: i64, child: i64) -> Coordinate {
    Coordinate::new(parent, child).unwrap()
}

/// Texts for the (7, 3, 5) reading: hexagram 22 with its fifth line, and 37.
pub fn bi_store() -> MemoryTextStore {
    MemoryTextStore::new()
        .with(coord(22, 0), "Bi / Grace\nGrace has success. In small matters it is favorable to undertake something.")
        .with(coord(22, 5), "Six in the fifth place\nGrace in hills and gardens. The roll of silk is meager and small.")
        .with(
            coord(37, 0),
            r#"{"title": "Jia Ren / The Family", "body": "The perseverance of the woman furthers.", "image": "37/0/hexagram.jpg"}"#,
        )
}

pub fn completion_for_bi() -> String {
    r#"```json
{
  "summary": "Form matters less than substance right now.",
  "interpretation": "Grace adorns but does not decide; keep the question modest.",
  "line_notes": [
    { "position": 5, "note": "A small, sincere gift outweighs display." }
  ],
  "resulting_interpretation": "The situation settles into the order of a household.",
  "advice": "Simplify, and tend to the people closest to you."
}
```"#
        .to_string()
}

pub fn static_completion() -> String {
    r#"{
  "summary": "Strength is available.",
  "interpretation": "Creative force, persistently applied.",
  "advice": "Keep going."
}"#
    .to_string()
}

pub fn creative_store() -> MemoryTextStore {
    MemoryTextStore::new().with(coord(1, 0), "Qian / The Creative\nThe Creative works sublime success.")
}

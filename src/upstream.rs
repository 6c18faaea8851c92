use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The external collaborator an [`UpstreamError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    TextStore,
    Generation,
    ReadingStore,
}

impl Boundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Boundary::TextStore => "text_store",
            Boundary::Generation => "generation",
            Boundary::ReadingStore => "reading_store",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fault reported by a text store, generator or reading store.
#[derive(Debug, Error)]
#[error("[{boundary}] {message}")]
pub struct UpstreamError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub boundary: Boundary,
    pub message: String,
}

impl UpstreamError {
    pub fn new(boundary: Boundary, message: impl Into<String>) -> Self {
        Self {
            boundary,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn text_store(message: impl Into<String>) -> Self {
        Self::new(Boundary::TextStore, message)
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(Boundary::Generation, message)
    }

    pub fn reading_store(message: impl Into<String>) -> Self {
        Self::new(Boundary::ReadingStore, message)
    }

    pub fn timed_out(boundary: Boundary, after: Duration) -> Self {
        Self::new(boundary, format!("timed out after {} ms", after.as_millis()))
    }
}

/// Await an upstream call, turning an elapsed deadline into an
/// [`UpstreamError`] for that boundary. `None` waits indefinitely.
pub(crate) async fn bounded<T, F>(
    boundary: Boundary,
    timeout: Option<Duration>,
    call: F,
) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| UpstreamError::timed_out(boundary, limit))?,
        None => call.await,
    }
}

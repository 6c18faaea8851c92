use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, warn};

use super::payload::TextPayload;
use super::store::TextStore;
use crate::error::{OracleError, Result};
use crate::hexagram::Hexagram;
use crate::types::Coordinate;
use crate::upstream::{bounded, Boundary, UpstreamError};

/// Coordinates a reading needs, split by whether their absence is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPlan {
    /// Hexagram-level texts of the primary and (if any) resulting hexagram.
    pub required: Vec<Coordinate>,
    /// One line text per changing line of the primary hexagram.
    pub optional: Vec<Coordinate>,
}

impl TextPlan {
    pub fn for_hexagram(primary: &Hexagram) -> Result<Self> {
        let mut required = vec![Coordinate::hexagram(primary.number())?];
        if let Some(resulting) = primary.resulting() {
            required.push(Coordinate::hexagram(resulting.number())?);
        }

        let optional = primary
            .changing_positions()
            .into_iter()
            .map(|position| Coordinate::line(primary.number(), position))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(TextPlan { required, optional })
    }
}

/// Adapter from coordinates to parsed text payloads.
///
/// Performs no caching; every call goes to the store.
pub struct TextResolver<'a, S: ?Sized> {
    store: &'a S,
    timeout: Option<Duration>,
}

impl<'a, S> TextResolver<'a, S>
where
    S: TextStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve a raw `(parent, child)` pair. The pair is validated before
    /// the store is touched.
    pub async fn resolve_at(&self, parent: i64, child: i64) -> Result<Option<TextPayload>> {
        let coordinate = Coordinate::new(parent, child)?;
        self.resolve(&coordinate).await
    }

    /// `Ok(None)` when nothing is stored at the coordinate.
    pub async fn resolve(&self, coordinate: &Coordinate) -> Result<Option<TextPayload>> {
        let raw = bounded(
            Boundary::TextStore,
            self.timeout,
            self.store.get_text(coordinate),
        )
        .await?;

        let Some(raw) = raw else {
            debug!(%coordinate, "no stored text");
            return Ok(None);
        };

        let payload = TextPayload::parse(&raw).map_err(|e| {
            UpstreamError::text_store(format!("corrupt text payload at {coordinate}")).with_source(e)
        })?;
        Ok(Some(payload))
    }

    /// Like [`resolve`](Self::resolve) but a missing text is an error.
    pub async fn resolve_required(&self, coordinate: &Coordinate) -> Result<TextPayload> {
        self.resolve(coordinate)
            .await?
            .ok_or(OracleError::TextNotFound(*coordinate))
    }

    /// Resolve everything a reading needs, in plan order. Missing optional
    /// texts are left out of the map.
    pub async fn resolve_plan(&self, plan: &TextPlan) -> Result<BTreeMap<Coordinate, TextPayload>> {
        let mut texts = BTreeMap::new();

        for coordinate in &plan.required {
            let payload = self.resolve_required(coordinate).await?;
            texts.insert(*coordinate, payload);
        }

        for coordinate in &plan.optional {
            match self.resolve(coordinate).await? {
                Some(payload) => {
                    texts.insert(*coordinate, payload);
                }
                None => warn!(%coordinate, "line text unavailable"),
            }
        }

        Ok(texts)
    }
}

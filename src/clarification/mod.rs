//! Follow-up questions anchored to an existing reading.
//!
//! A reading is either `NoClarification` or `Clarified`. Asking again
//! replaces the stored exchange rather than growing a thread.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{OracleError, Result};
use crate::generation::{clarification_request, Generator};
use crate::reading::Reading;
use crate::types::ReadingId;
use crate::upstream::{bounded, Boundary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationExchange {
    pub reading_id: ReadingId,
    pub question: String,
    pub answer: String,
    pub clarified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClarificationState {
    #[default]
    NoClarification,
    Clarified(ClarificationExchange),
}

impl ClarificationState {
    pub fn is_clarified(&self) -> bool {
        matches!(self, ClarificationState::Clarified(_))
    }

    pub fn exchange(&self) -> Option<&ClarificationExchange> {
        match self {
            ClarificationState::Clarified(exchange) => Some(exchange),
            ClarificationState::NoClarification => None,
        }
    }
}

pub struct ClarificationHandler<'a, G: ?Sized> {
    generator: &'a G,
    timeout: Option<Duration>,
}

impl<'a, G> ClarificationHandler<'a, G>
where
    G: Generator + ?Sized,
{
    pub fn new(generator: &'a G) -> Self {
        Self {
            generator,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ask `question` about `reading` and store the answer on it.
    ///
    /// The reading's existing prediction is sent as context; its hexagrams
    /// are not derived again. On failure the reading is left untouched.
    pub async fn clarify(
        &self,
        reading: Option<&mut Reading>,
        question: &str,
    ) -> Result<ClarificationExchange> {
        let reading = reading.ok_or(OracleError::NoPriorReading)?;

        let request = clarification_request(reading, question);
        let answer = bounded(
            Boundary::Generation,
            self.timeout,
            self.generator.generate(&request),
        )
        .await?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(OracleError::malformed("clarification answer is empty"));
        }

        let exchange = ClarificationExchange {
            reading_id: reading.id().clone(),
            question: question.to_string(),
            answer: answer.to_string(),
            clarified_at: Utc::now(),
        };

        let replaced = reading.clarification().is_clarified();
        reading.attach_clarification(exchange.clone());
        info!(reading = %reading.id().as_str(), replaced, "clarification stored");

        Ok(exchange)
    }
}

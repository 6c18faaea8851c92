use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::prediction::Prediction;
use crate::clarification::{ClarificationExchange, ClarificationState};
use crate::derivation::{derive, Derivation, InputNumbers};
use crate::hexagram::Hexagram;
use crate::text::TextPayload;
use crate::types::{Coordinate, ReadingId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadingRecordError {
    #[error("Stored resulting hexagram does not follow from primary hexagram {primary}")]
    ResultingMismatch { primary: u8 },
    #[error("Stored prediction is for hexagram {stored} but the primary hexagram is {derived}")]
    PredictionMismatch { stored: u8, derived: u8 },
}

/// A completed reading.
///
/// Built once, after the prediction has been validated. The only change
/// allowed afterwards is attaching (or replacing) the clarification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReadingRecord")]
pub struct Reading {
    id: ReadingId,
    question: String,
    /// Absent for readings cast from explicit line values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inputs: Option<InputNumbers>,
    language: String,
    primary: Hexagram,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resulting: Option<Hexagram>,
    texts: BTreeMap<Coordinate, TextPayload>,
    prediction: Prediction,
    created_at: DateTime<Utc>,
    #[serde(default)]
    clarification: ClarificationState,
}

impl Reading {
    pub(crate) fn new(
        question: String,
        inputs: Option<InputNumbers>,
        language: String,
        primary: Hexagram,
        texts: BTreeMap<Coordinate, TextPayload>,
        prediction: Prediction,
    ) -> Self {
        let created_at = Utc::now();
        let origin = match inputs {
            Some(n) => format!("numbers:{},{},{}", n.first, n.second, n.third),
            None => {
                let magnitudes: Vec<String> = primary
                    .values()
                    .iter()
                    .map(|v| v.magnitude().to_string())
                    .collect();
                format!("lines:{}", magnitudes.join(","))
            }
        };

        Reading {
            id: ReadingId::derive(&question, &origin, &language, created_at),
            question,
            inputs,
            language,
            resulting: primary.resulting(),
            primary,
            texts,
            prediction,
            created_at,
            clarification: ClarificationState::NoClarification,
        }
    }

    pub fn id(&self) -> &ReadingId {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn inputs(&self) -> Option<InputNumbers> {
        self.inputs
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn primary(&self) -> &Hexagram {
        &self.primary
    }

    pub fn resulting(&self) -> Option<&Hexagram> {
        self.resulting.as_ref()
    }

    pub fn texts(&self) -> &BTreeMap<Coordinate, TextPayload> {
        &self.texts
    }

    pub fn prediction(&self) -> &Prediction {
        &self.prediction
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn clarification(&self) -> &ClarificationState {
        &self.clarification
    }

    /// Derive again from the stored numbers. `None` for cast readings.
    pub fn rederive(&self) -> Option<Derivation> {
        self.inputs.map(derive)
    }

    /// Whether re-deriving from the stored numbers reproduces the stored
    /// primary hexagram. Cast readings trivially reproduce.
    pub fn is_reproducible(&self) -> bool {
        match self.rederive() {
            Some(derivation) => derivation.hexagram() == self.primary,
            None => true,
        }
    }

    /// Replaces any earlier exchange.
    pub(crate) fn attach_clarification(&mut self, exchange: ClarificationExchange) {
        self.clarification = ClarificationState::Clarified(exchange);
    }
}

// Loaded shape of a reading. The hexagrams are re-checked against each other
// and against the prediction before a `Reading` is handed out.
#[derive(Deserialize)]
struct ReadingRecord {
    id: ReadingId,
    question: String,
    #[serde(default)]
    inputs: Option<InputNumbers>,
    language: String,
    primary: Hexagram,
    #[serde(default)]
    resulting: Option<Hexagram>,
    texts: BTreeMap<Coordinate, TextPayload>,
    prediction: Prediction,
    created_at: DateTime<Utc>,
    #[serde(default)]
    clarification: ClarificationState,
}

impl TryFrom<ReadingRecord> for Reading {
    type Error = ReadingRecordError;

    fn try_from(record: ReadingRecord) -> Result<Self, Self::Error> {
        let primary = record.primary.number();
        if record.prediction.hexagram.number != primary {
            return Err(ReadingRecordError::PredictionMismatch {
                stored: record.prediction.hexagram.number,
                derived: primary,
            });
        }

        let expected = record.primary.resulting();
        let predicted = record.prediction.resulting.as_ref().map(|r| r.hexagram.number);
        if record.resulting != expected || predicted != expected.map(|h| h.number()) {
            return Err(ReadingRecordError::ResultingMismatch { primary });
        }

        Ok(Reading {
            id: record.id,
            question: record.question,
            inputs: record.inputs,
            language: record.language,
            primary: record.primary,
            resulting: record.resulting,
            texts: record.texts,
            prediction: record.prediction,
            created_at: record.created_at,
            clarification: record.clarification,
        })
    }
}

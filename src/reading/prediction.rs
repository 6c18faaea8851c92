use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::assembler::{HexagramRef, LineText, ReadingContext};
use crate::error::{OracleError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineReading {
    pub position: u8,
    pub text: LineText,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultingReading {
    pub hexagram: HexagramRef,
    pub text: String,
    pub interpretation: String,
}

/// The structured prediction returned for a reading.
///
/// Identifiers and canonical texts come from the [`ReadingContext`]; only
/// the interpretive prose comes from the model. `resulting` is absent
/// (the key is omitted) when no line changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub hexagram: HexagramRef,
    pub summary: String,
    pub interpretation: String,
    pub changing_lines: Vec<LineReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resulting: Option<ResultingReading>,
    pub advice: String,
}

impl Prediction {
    pub fn has_resulting(&self) -> bool {
        self.resulting.is_some()
    }
}

// What the model is asked to produce. Everything is optional here so the
// absence of a field is reported as a schema failure, not a JSON failure.
#[derive(Debug, Deserialize)]
struct GeneratedFields {
    summary: Option<String>,
    interpretation: Option<String>,
    #[serde(default)]
    line_notes: Vec<GeneratedLineNote>,
    resulting_interpretation: Option<String>,
    advice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeneratedLineNote {
    position: i64,
    note: Option<String>,
}

/// Map a free-text completion onto the prediction schema.
///
/// Fails with `MalformedGeneration` unless the completion carries a JSON
/// object with non-empty `summary`, `interpretation` and `advice`, exactly
/// one note per changing line, and `resulting_interpretation` exactly when
/// the context has a resulting hexagram.
pub fn validate_generation(context: &ReadingContext, completion: &str) -> Result<Prediction> {
    let json = extract_json_object(completion)
        .ok_or_else(|| reject("completion contains no JSON object"))?;
    let fields: GeneratedFields = serde_json::from_str(json)
        .map_err(|e| reject(format!("completion JSON does not parse: {e}")))?;

    let summary = required(fields.summary, "summary")?;
    let interpretation = required(fields.interpretation, "interpretation")?;
    let advice = required(fields.advice, "advice")?;

    let mut notes = BTreeMap::new();
    for generated in fields.line_notes {
        let position = context
            .changing_positions()
            .find(|&p| i64::from(p) == generated.position)
            .ok_or_else(|| reject(format!("note for line {} which is not changing", generated.position)))?;
        let note = required(generated.note, "line_notes.note")?;
        if notes.insert(position, note).is_some() {
            return Err(reject(format!("duplicate note for line {position}")));
        }
    }

    let mut changing_lines = Vec::with_capacity(context.changing_lines.len());
    for line in &context.changing_lines {
        let note = notes
            .remove(&line.position)
            .ok_or_else(|| reject(format!("missing note for changing line {}", line.position)))?;
        changing_lines.push(LineReading {
            position: line.position,
            text: line.text.clone(),
            note,
        });
    }

    let resulting = match (&context.resulting, fields.resulting_interpretation) {
        (Some(resulting), interpretation) => Some(ResultingReading {
            hexagram: resulting.hexagram.clone(),
            text: resulting.text.clone(),
            interpretation: required(interpretation, "resulting_interpretation")?,
        }),
        (None, Some(text)) if !text.trim().is_empty() => {
            return Err(reject("resulting_interpretation given for a static hexagram"));
        }
        (None, _) => None,
    };

    Ok(Prediction {
        hexagram: context.primary.hexagram.clone(),
        summary,
        interpretation,
        changing_lines,
        resulting,
        advice,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| reject(format!("missing required field `{field}`")))
}

fn reject(message: impl Into<String>) -> OracleError {
    let message = message.into();
    warn!(%message, "rejecting generation");
    OracleError::malformed(message)
}

/// The outermost `{ ... }` span of `text`, which tolerates code fences and
/// prose around the object.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

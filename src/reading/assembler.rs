use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{OracleError, Result};
use crate::hexagram::{Hexagram, LineValue};
use crate::text::TextPayload;
use crate::types::Coordinate;

/// Number and names of a hexagram as they appear in outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramRef {
    pub number: u8,
    pub name: String,
    pub title: String,
}

impl HexagramRef {
    pub fn of(hexagram: &Hexagram) -> Self {
        let info = hexagram.info();
        HexagramRef {
            number: info.number,
            name: info.name.to_string(),
            title: info.title.to_string(),
        }
    }
}

/// Text of a changing line, or the marker that the store had none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum LineText {
    Available(String),
    Unavailable,
}

impl LineText {
    pub fn is_available(&self) -> bool {
        matches!(self, LineText::Available(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LineText::Available(text) => Some(text),
            LineText::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramContext {
    pub hexagram: HexagramRef,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangingLineContext {
    pub position: u8,
    pub value: LineValue,
    pub text: LineText,
}

/// Everything the generation step is told about a reading.
///
/// `resulting` is omitted entirely (not null) for a static hexagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingContext {
    pub question: String,
    pub language: String,
    pub primary: HexagramContext,
    pub changing_lines: Vec<ChangingLineContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resulting: Option<HexagramContext>,
}

impl ReadingContext {
    pub fn changing_positions(&self) -> impl Iterator<Item = u8> + '_ {
        self.changing_lines.iter().map(|line| line.position)
    }
}

/// Build the context for `primary` from resolved texts.
///
/// Hexagram-level texts must be present. A missing line text becomes
/// [`LineText::Unavailable`].
pub fn assemble_context(
    question: &str,
    language: &str,
    primary: &Hexagram,
    texts: &BTreeMap<Coordinate, TextPayload>,
) -> Result<ReadingContext> {
    let primary_context = hexagram_context(primary, texts)?;

    let mut changing_lines = Vec::new();
    for line in primary.lines().filter(|line| line.changing()) {
        let coordinate = Coordinate::line(primary.number(), line.position)?;
        let text = match texts.get(&coordinate) {
            Some(payload) => LineText::Available(payload.render()),
            None => {
                warn!(%coordinate, "assembling reading without line text");
                LineText::Unavailable
            }
        };

        changing_lines.push(ChangingLineContext {
            position: line.position,
            value: line.value,
            text,
        });
    }

    let resulting = primary
        .resulting()
        .map(|resulting| hexagram_context(&resulting, texts))
        .transpose()?;

    Ok(ReadingContext {
        question: question.to_string(),
        language: language.to_string(),
        primary: primary_context,
        changing_lines,
        resulting,
    })
}

fn hexagram_context(
    hexagram: &Hexagram,
    texts: &BTreeMap<Coordinate, TextPayload>,
) -> Result<HexagramContext> {
    let coordinate = Coordinate::hexagram(hexagram.number())?;
    let payload = texts
        .get(&coordinate)
        .ok_or(OracleError::TextNotFound(coordinate))?;

    Ok(HexagramContext {
        hexagram: HexagramRef::of(hexagram),
        text: payload.render(),
        image: payload.image.clone(),
    })
}

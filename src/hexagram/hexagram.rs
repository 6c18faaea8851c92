use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::line::{Line, LineValue, Polarity};
use super::names::{table_info, HexagramInfo};
use super::trigram::{king_wen_number, trigrams_for, Trigram};
use crate::types::LINE_COUNT;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexagramError {
    #[error("A hexagram needs exactly 6 lines, got {0}")]
    WrongLineCount(usize),
    #[error("Line {position} has unrecognized magnitude {value}; expected 6, 7, 8 or 9")]
    UnknownMagnitude { position: usize, value: i64 },
    #[error("Unrecognized line magnitude {0}; expected 6, 7, 8 or 9")]
    UnrecognizedMagnitude(i64),
    #[error("Hexagram number {0} is outside 1..=64")]
    NumberOutOfRange(i64),
    #[error("Stored hexagram number {stored} does not match its lines (which give {derived})")]
    NumberMismatch { stored: u8, derived: u8 },
}

/// Six lines, bottom to top.
///
/// Never mutated after construction: changing the moving lines produces a
/// new value through [`Hexagram::resulting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "HexagramRecord", into = "HexagramRecord")]
pub struct Hexagram {
    lines: [LineValue; 6],
}

impl Hexagram {
    /// Build a hexagram from six line magnitudes (6, 7, 8 or 9), bottom to top.
    pub fn from_lines(values: &[i64]) -> Result<Self, HexagramError> {
        if values.len() != usize::from(LINE_COUNT) {
            return Err(HexagramError::WrongLineCount(values.len()));
        }

        let mut lines = [LineValue::YoungYang; 6];
        for (idx, &value) in values.iter().enumerate() {
            lines[idx] = LineValue::from_magnitude(value).ok_or(HexagramError::UnknownMagnitude {
                position: idx + 1,
                value,
            })?;
        }

        Ok(Hexagram { lines })
    }

    pub fn from_values(lines: [LineValue; 6]) -> Self {
        Hexagram { lines }
    }

    /// The stable hexagram with the given King Wen number.
    pub fn from_number(number: u8) -> Result<Self, HexagramError> {
        let (upper, lower) =
            trigrams_for(number).ok_or(HexagramError::NumberOutOfRange(i64::from(number)))?;
        Ok(Self::from_trigrams(upper, lower, None))
    }

    /// Stack two trigrams, optionally marking one position (1..=6) as changing.
    pub(crate) fn from_trigrams(upper: Trigram, lower: Trigram, moving: Option<u8>) -> Self {
        let mut lines = [LineValue::YoungYang; 6];
        let polarities = lower.lines().into_iter().chain(upper.lines());
        for (idx, polarity) in polarities.enumerate() {
            let changing = moving == Some(idx as u8 + 1);
            lines[idx] = LineValue::from_polarity(polarity, changing);
        }
        Hexagram { lines }
    }

    pub fn values(&self) -> [LineValue; 6] {
        self.lines
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.lines.iter().enumerate().map(|(idx, &value)| Line {
            position: idx as u8 + 1,
            value,
        })
    }

    /// The line at `position` (1..=6).
    pub fn line(&self, position: u8) -> Option<Line> {
        let idx = usize::from(position).checked_sub(1)?;
        self.lines.get(idx).map(|&value| Line { position, value })
    }

    pub fn lower_trigram(&self) -> Trigram {
        Trigram::from_lines(self.polarities(0))
    }

    pub fn upper_trigram(&self) -> Trigram {
        Trigram::from_lines(self.polarities(3))
    }

    /// King Wen number, 1..=64.
    pub fn number(&self) -> u8 {
        king_wen_number(self.upper_trigram(), self.lower_trigram())
    }

    pub fn info(&self) -> HexagramInfo {
        table_info(self.number())
    }

    /// 1-indexed positions of the changing lines.
    pub fn changing_positions(&self) -> BTreeSet<u8> {
        self.lines()
            .filter(|line| line.changing())
            .map(|line| line.position)
            .collect()
    }

    pub fn has_changing_lines(&self) -> bool {
        self.lines.iter().any(|line| line.is_changing())
    }

    /// The hexagram obtained by flipping every changing line into its stable
    /// opposite. `None` when nothing changes.
    pub fn resulting(&self) -> Option<Hexagram> {
        if !self.has_changing_lines() {
            return None;
        }
        Some(Hexagram {
            lines: self.lines.map(LineValue::settled),
        })
    }

    fn polarities(&self, offset: usize) -> [Polarity; 3] {
        [
            self.lines[offset].polarity(),
            self.lines[offset + 1].polarity(),
            self.lines[offset + 2].polarity(),
        ]
    }
}

/// Persisted shape: the derived number next to the magnitudes so stored
/// readings stay legible. The number is checked on the way back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HexagramRecord {
    number: u8,
    lines: Vec<u8>,
}

impl From<Hexagram> for HexagramRecord {
    fn from(value: Hexagram) -> Self {
        HexagramRecord {
            number: value.number(),
            lines: value.lines.iter().map(|line| line.magnitude()).collect(),
        }
    }
}

impl TryFrom<HexagramRecord> for Hexagram {
    type Error = HexagramError;

    fn try_from(record: HexagramRecord) -> Result<Self, Self::Error> {
        let values: Vec<i64> = record.lines.iter().map(|&v| i64::from(v)).collect();
        let hexagram = Hexagram::from_lines(&values)?;

        let derived = hexagram.number();
        if derived != record.number {
            return Err(HexagramError::NumberMismatch {
                stored: record.number,
                derived,
            });
        }
        Ok(hexagram)
    }
}

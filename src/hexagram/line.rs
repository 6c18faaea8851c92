use serde::{Deserialize, Serialize};

use super::hexagram::HexagramError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Yin,
    Yang,
}

impl Polarity {
    pub fn is_yang(self) -> bool {
        self == Polarity::Yang
    }

    pub fn flipped(self) -> Self {
        match self {
            Polarity::Yin => Polarity::Yang,
            Polarity::Yang => Polarity::Yin,
        }
    }
}

/// One of the four traditional line magnitudes.
///
/// Odd magnitudes are yang, even are yin; the "old" magnitudes 6 and 9 are
/// changing. Polarity and the changing flag are both derived from the
/// magnitude and cannot be set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LineValue {
    OldYin = 6,
    YoungYang = 7,
    YoungYin = 8,
    OldYang = 9,
}

impl LineValue {
    pub const ALL: [LineValue; 4] = [
        LineValue::OldYin,
        LineValue::YoungYang,
        LineValue::YoungYin,
        LineValue::OldYang,
    ];

    pub fn from_magnitude(magnitude: i64) -> Option<Self> {
        match magnitude {
            6 => Some(LineValue::OldYin),
            7 => Some(LineValue::YoungYang),
            8 => Some(LineValue::YoungYin),
            9 => Some(LineValue::OldYang),
            _ => None,
        }
    }

    pub fn from_polarity(polarity: Polarity, changing: bool) -> Self {
        match (polarity, changing) {
            (Polarity::Yin, true) => LineValue::OldYin,
            (Polarity::Yang, false) => LineValue::YoungYang,
            (Polarity::Yin, false) => LineValue::YoungYin,
            (Polarity::Yang, true) => LineValue::OldYang,
        }
    }

    pub fn magnitude(self) -> u8 {
        self as u8
    }

    pub fn polarity(self) -> Polarity {
        if self.magnitude() % 2 == 1 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub fn is_changing(self) -> bool {
        matches!(self, LineValue::OldYin | LineValue::OldYang)
    }

    /// The stable value this line becomes once it has changed.
    /// Stable lines are returned unchanged.
    pub fn settled(self) -> Self {
        match self {
            LineValue::OldYin => LineValue::YoungYang,
            LineValue::OldYang => LineValue::YoungYin,
            stable => stable,
        }
    }
}

impl TryFrom<u8> for LineValue {
    type Error = HexagramError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LineValue::from_magnitude(i64::from(value))
            .ok_or(HexagramError::UnrecognizedMagnitude(i64::from(value)))
    }
}

impl From<LineValue> for u8 {
    fn from(value: LineValue) -> Self {
        value.magnitude()
    }
}

/// A line at its position (1..=6, bottom to top) within a hexagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub position: u8,
    pub value: LineValue,
}

impl Line {
    pub fn polarity(&self) -> Polarity {
        self.value.polarity()
    }

    pub fn changing(&self) -> bool {
        self.value.is_changing()
    }
}

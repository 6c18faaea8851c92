//! Three numbers to a hexagram.
//!
//! The rule is plum-blossom number divination:
//!
//! - `first.rem_euclid(8)` picks the **upper** trigram and
//!   `second.rem_euclid(8)` the **lower** one, counting in Earlier Heaven
//!   order (1 Qian, 2 Dui, 3 Li, 4 Zhen, 5 Xun, 6 Kan, 7 Gen, 0 Kun).
//! - `third.rem_euclid(7)` picks the moving line: `0` leaves the figure
//!   static, `1..=6` marks that position as changing.
//!
//! Positions 1-3 carry the lower trigram's lines bottom to top, positions
//! 4-6 the upper trigram's. A position's magnitude is 7 or 8 by polarity, or
//! 9 or 6 when it is the moving position. The rule is total over `i64`
//! and reaches all four magnitudes.

use serde::{Deserialize, Serialize};

use crate::hexagram::{Hexagram, LineValue, Trigram};

pub const TRIGRAM_MODULUS: i64 = 8;
pub const MOVING_LINE_MODULUS: i64 = 7;

/// The three user-supplied numbers, stored verbatim so a reading can be
/// re-derived from them alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputNumbers {
    pub first: i64,
    pub second: i64,
    pub third: i64,
}

impl InputNumbers {
    pub fn new(first: i64, second: i64, third: i64) -> Self {
        Self {
            first,
            second,
            third,
        }
    }
}

/// Outcome of [`derive`]: the normalized choices and the resulting lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub inputs: InputNumbers,
    pub upper: Trigram,
    pub lower: Trigram,
    /// Position (1..=6) of the moving line, if any.
    pub moving_line: Option<u8>,
    pub lines: [LineValue; 6],
}

impl Derivation {
    pub fn hexagram(&self) -> Hexagram {
        Hexagram::from_values(self.lines)
    }
}

pub fn derive(inputs: InputNumbers) -> Derivation {
    let upper = Trigram::from_earlier_heaven(inputs.first.rem_euclid(TRIGRAM_MODULUS) as u8);
    let lower = Trigram::from_earlier_heaven(inputs.second.rem_euclid(TRIGRAM_MODULUS) as u8);
    let moving_line = match inputs.third.rem_euclid(MOVING_LINE_MODULUS) as u8 {
        0 => None,
        position => Some(position),
    };

    let lines = Hexagram::from_trigrams(upper, lower, moving_line).values();

    Derivation {
        inputs,
        upper,
        lower,
        moving_line,
        lines,
    }
}

/// Shorthand for `derive(InputNumbers::new(first, second, third)).lines`.
pub fn derive_lines(first: i64, second: i64, third: i64) -> [LineValue; 6] {
    derive(InputNumbers::new(first, second, third)).lines
}

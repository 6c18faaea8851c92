use serde::{Deserialize, Serialize};

use super::line::Polarity;

/// The eight trigrams, declared in Earlier Heaven order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigram {
    Qian,
    Dui,
    Li,
    Zhen,
    Xun,
    Kan,
    Gen,
    Kun,
}

// King Wen number of the hexagram with upper trigram `row` and lower trigram
// `column`, both indexed in Earlier Heaven order.
const KING_WEN: [[u8; 8]; 8] = [
    //  Qian Dui  Li   Zhen Xun  Kan  Gen  Kun
    [1, 10, 13, 25, 44, 6, 33, 12],  // Qian
    [43, 58, 49, 17, 28, 47, 31, 45], // Dui
    [14, 38, 30, 21, 50, 64, 56, 35], // Li
    [34, 54, 55, 51, 32, 40, 62, 16], // Zhen
    [9, 61, 37, 42, 57, 59, 53, 20],  // Xun
    [5, 60, 63, 3, 48, 29, 39, 8],    // Kan
    [26, 41, 22, 27, 18, 4, 52, 23],  // Gen
    [11, 19, 36, 24, 46, 7, 15, 2],   // Kun
];

impl Trigram {
    pub const EARLIER_HEAVEN: [Trigram; 8] = [
        Trigram::Qian,
        Trigram::Dui,
        Trigram::Li,
        Trigram::Zhen,
        Trigram::Xun,
        Trigram::Kan,
        Trigram::Gen,
        Trigram::Kun,
    ];

    /// Trigram for an Earlier Heaven residue modulo 8: `1..=7` in order,
    /// `0` standing in for 8 (Kun).
    pub fn from_earlier_heaven(residue: u8) -> Self {
        match residue % 8 {
            0 => Trigram::Kun,
            n => Self::EARLIER_HEAVEN[usize::from(n - 1)],
        }
    }

    /// Earlier Heaven number, `1..=8`.
    pub fn earlier_heaven_number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Line polarities, bottom to top.
    pub fn lines(self) -> [Polarity; 3] {
        use Polarity::{Yang, Yin};
        match self {
            Trigram::Qian => [Yang, Yang, Yang],
            Trigram::Dui => [Yang, Yang, Yin],
            Trigram::Li => [Yang, Yin, Yang],
            Trigram::Zhen => [Yang, Yin, Yin],
            Trigram::Xun => [Yin, Yang, Yang],
            Trigram::Kan => [Yin, Yang, Yin],
            Trigram::Gen => [Yin, Yin, Yang],
            Trigram::Kun => [Yin, Yin, Yin],
        }
    }

    pub fn from_lines(lines: [Polarity; 3]) -> Self {
        use Polarity::{Yang, Yin};
        match lines {
            [Yang, Yang, Yang] => Trigram::Qian,
            [Yang, Yang, Yin] => Trigram::Dui,
            [Yang, Yin, Yang] => Trigram::Li,
            [Yang, Yin, Yin] => Trigram::Zhen,
            [Yin, Yang, Yang] => Trigram::Xun,
            [Yin, Yang, Yin] => Trigram::Kan,
            [Yin, Yin, Yang] => Trigram::Gen,
            [Yin, Yin, Yin] => Trigram::Kun,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Trigram::Qian => "Qian",
            Trigram::Dui => "Dui",
            Trigram::Li => "Li",
            Trigram::Zhen => "Zhen",
            Trigram::Xun => "Xun",
            Trigram::Kan => "Kan",
            Trigram::Gen => "Gen",
            Trigram::Kun => "Kun",
        }
    }

    /// The natural image traditionally attached to the trigram.
    pub fn image(self) -> &'static str {
        match self {
            Trigram::Qian => "heaven",
            Trigram::Dui => "lake",
            Trigram::Li => "fire",
            Trigram::Zhen => "thunder",
            Trigram::Xun => "wind",
            Trigram::Kan => "water",
            Trigram::Gen => "mountain",
            Trigram::Kun => "earth",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// King Wen number (1..=64) of the hexagram built from two trigrams.
pub fn king_wen_number(upper: Trigram, lower: Trigram) -> u8 {
    KING_WEN[upper.index()][lower.index()]
}

/// Inverse of [`king_wen_number`]: the `(upper, lower)` trigrams of a
/// hexagram number, or `None` outside 1..=64.
pub fn trigrams_for(number: u8) -> Option<(Trigram, Trigram)> {
    Trigram::EARLIER_HEAVEN.iter().find_map(|&upper| {
        Trigram::EARLIER_HEAVEN
            .iter()
            .find(|&&lower| king_wen_number(upper, lower) == number)
            .map(|&lower| (upper, lower))
    })
}

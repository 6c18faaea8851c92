use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of hexagrams in the canonical sequence.
pub const HEXAGRAM_COUNT: u8 = 64;

/// Number of lines in a hexagram.
pub const LINE_COUNT: u8 = 6;

/// Address of a stored text: a hexagram (`parent`) and optionally one of its
/// lines (`child`).
///
/// `child == 0` addresses the hexagram-level text, `1..=6` a line counted
/// bottom to top. The canonical key form is `"{parent}/{child}"`, which is
/// also how a coordinate serializes (including as a JSON map key).
///
/// Ordering is by parent, then child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    parent: u8,
    child: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("Parent coordinate {0} is outside 1..=64")]
    ParentOutOfRange(i64),
    #[error("Child coordinate {0} is outside 0..=6")]
    ChildOutOfRange(i64),
    #[error("Malformed coordinate key: {0:?}")]
    MalformedKey(String),
}

impl Coordinate {
    pub fn new(parent: i64, child: i64) -> Result<Self, CoordinateError> {
        if !(1..=i64::from(HEXAGRAM_COUNT)).contains(&parent) {
            return Err(CoordinateError::ParentOutOfRange(parent));
        }
        if !(0..=i64::from(LINE_COUNT)).contains(&child) {
            return Err(CoordinateError::ChildOutOfRange(child));
        }

        Ok(Coordinate {
            parent: parent as u8,
            child: child as u8,
        })
    }

    /// The hexagram-level coordinate (`child == 0`).
    pub fn hexagram(number: u8) -> Result<Self, CoordinateError> {
        Self::new(i64::from(number), 0)
    }

    /// The coordinate of one line of a hexagram, `position` in `1..=6`.
    pub fn line(number: u8, position: u8) -> Result<Self, CoordinateError> {
        if position == 0 {
            return Err(CoordinateError::ChildOutOfRange(0));
        }
        Self::new(i64::from(number), i64::from(position))
    }

    pub fn parent(&self) -> u8 {
        self.parent
    }

    pub fn child(&self) -> u8 {
        self.child
    }

    pub fn is_hexagram_level(&self) -> bool {
        self.child == 0
    }

    pub fn line_position(&self) -> Option<u8> {
        (self.child != 0).then_some(self.child)
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.parent, self.child)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoordinateError::MalformedKey(s.to_string());

        let (parent, child) = s.split_once('/').ok_or_else(malformed)?;
        let parent: i64 = parent.trim().parse().map_err(|_| malformed())?;
        let child: i64 = child.trim().parse().map_err(|_| malformed())?;

        Coordinate::new(parent, child)
    }
}

impl TryFrom<String> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Coordinate> for String {
    fn from(value: Coordinate) -> Self {
        value.key()
    }
}

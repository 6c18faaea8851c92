pub mod coordinate;
pub mod identifiers;

pub use coordinate::{Coordinate, CoordinateError, HEXAGRAM_COUNT, LINE_COUNT};
pub use identifiers::{ReadingId, TextVersion};

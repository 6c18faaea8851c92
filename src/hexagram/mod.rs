pub mod hexagram;
pub mod line;
pub mod names;
pub mod trigram;

pub use hexagram::{Hexagram, HexagramError};
pub use line::{Line, LineValue, Polarity};
pub use names::{hexagram_info, HexagramInfo};
pub use trigram::{king_wen_number, trigrams_for, Trigram};

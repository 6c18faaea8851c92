pub mod assembler;
pub mod prediction;
pub mod reading;
pub mod store;

pub use assembler::{
    assemble_context, ChangingLineContext, HexagramContext, HexagramRef, LineText, ReadingContext,
};
pub use prediction::{validate_generation, LineReading, Prediction, ResultingReading};
pub use reading::{Reading, ReadingRecordError};
pub use store::{MemoryReadingStore, ReadingStore, ReadingSummary};

pub mod payload;
pub mod resolver;
pub mod store;

pub use payload::{PayloadError, TextPayload};
pub use resolver::{TextPlan, TextResolver};
pub use store::{MemoryTextStore, TextStore};

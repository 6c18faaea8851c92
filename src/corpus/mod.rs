pub mod builder;
pub mod corpus;
pub mod entry;
pub mod versioning;

pub use builder::{CorpusBuildError, CorpusBuilder};
pub use corpus::TextCorpus;
pub use entry::{TextEntry, TextEntryError};
pub use versioning::{CorpusBuildConfig, CorpusIndex, CorpusManifest, ManifestEntry};

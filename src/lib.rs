//! Deterministic I Ching reading derivation and structured prediction.
//!
//! `oracle-core` maps three integers to a primary hexagram and its changing
//! lines, resolves the canonical texts for every coordinate involved,
//! assembles a fixed output schema for a language model to fill in, and
//! validates the completion against it. Follow-up questions are answered
//! against the stored reading without deriving it again.
//!
//! Derivation is a pure function: the same three numbers always give the
//! same hexagram, across runs and processes. The text store, the model and
//! reading persistence sit behind async traits.

pub mod clarification;
pub mod config;
pub mod corpus;
pub mod derivation;
pub mod error;
pub mod generation;
pub mod hexagram;
pub mod oracle;
pub mod quota;
pub mod reading;
pub mod text;
pub mod types;
pub mod upstream;

pub use error::{ErrorKind, OracleError, Result};
pub use oracle::{ConsultRequest, Oracle};

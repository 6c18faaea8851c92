//! Error kinds surfaced by the reading pipeline.

use std::fmt;

use thiserror::Error;

use crate::hexagram::HexagramError;
use crate::types::{Coordinate, CoordinateError};
use crate::upstream::UpstreamError;

/// Stable, machine-readable classification of an [`OracleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCoordinate,
    InvalidHexagramData,
    /// Hexagram-level text is missing from the store (a data defect).
    TextNotFound,
    /// Model output did not fit the prediction schema (worth a retry).
    MalformedGeneration,
    NoPriorReading,
    UpstreamFailure,
    UnsupportedLanguage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCoordinate => "invalid_coordinate",
            ErrorKind::InvalidHexagramData => "invalid_hexagram_data",
            ErrorKind::TextNotFound => "text_not_found",
            ErrorKind::MalformedGeneration => "malformed_generation",
            ErrorKind::NoPriorReading => "no_prior_reading",
            ErrorKind::UpstreamFailure => "upstream_failure",
            ErrorKind::UnsupportedLanguage => "unsupported_language",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),

    #[error("Invalid hexagram data: {0}")]
    InvalidHexagramData(#[from] HexagramError),

    #[error("No text stored for coordinate {0}")]
    TextNotFound(Coordinate),

    #[error("Malformed generation: {0}")]
    MalformedGeneration(String),

    #[error("Clarification requested without a prior reading")]
    NoPriorReading,

    #[error("Upstream failure: {0}")]
    UpstreamFailure(#[from] UpstreamError),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl OracleError {
    pub fn malformed(message: impl Into<String>) -> Self {
        OracleError::MalformedGeneration(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            OracleError::InvalidCoordinate(_) => ErrorKind::InvalidCoordinate,
            OracleError::InvalidHexagramData(_) => ErrorKind::InvalidHexagramData,
            OracleError::TextNotFound(_) => ErrorKind::TextNotFound,
            OracleError::MalformedGeneration(_) => ErrorKind::MalformedGeneration,
            OracleError::NoPriorReading => ErrorKind::NoPriorReading,
            OracleError::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
            OracleError::UnsupportedLanguage(_) => ErrorKind::UnsupportedLanguage,
        }
    }
}

pub type Result<T> = std::result::Result<T, OracleError>;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{OracleError, Result};

// Serializable
// Comparable
// Explicit defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    pub free_plan_quota: u32,
    pub premium_plan_quota: u32,
    /// Free users at or below this many remaining readings get a warning.
    pub low_quota_threshold: u32,
}

impl QuotaConfig {
    pub fn v0() -> Self {
        Self {
            free_plan_quota: 10,
            premium_plan_quota: 50,
            low_quota_threshold: 3,
        }
    }

    /// `v0()` overridden by `FREE_PLAN_QUOTA`, `PREMIUM_PLAN_QUOTA` and
    /// `LOW_QUOTA_THRESHOLD`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable source.
    /// Unparsable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::v0();
        let read = |key: &str, default: u32| match lookup(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(key, value = %raw, default, "ignoring unparsable quota setting");
                default
            }),
        };

        Self {
            free_plan_quota: read("FREE_PLAN_QUOTA", defaults.free_plan_quota),
            premium_plan_quota: read("PREMIUM_PLAN_QUOTA", defaults.premium_plan_quota),
            low_quota_threshold: read("LOW_QUOTA_THRESHOLD", defaults.low_quota_threshold),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self::v0()
    }
}

/// Settings handed to the [`Oracle`](crate::oracle::Oracle) explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    pub languages: Vec<String>,
    pub default_language: String,
    #[serde(default)]
    pub quotas: QuotaConfig,
    #[serde(default)]
    pub text_store_timeout_ms: Option<u64>,
    #[serde(default)]
    pub generation_timeout_ms: Option<u64>,
}

impl OracleConfig {
    pub fn v0() -> Self {
        Self {
            languages: vec!["English".into(), "Chinese".into()],
            default_language: "English".into(),
            quotas: QuotaConfig::v0(),
            text_store_timeout_ms: None,
            generation_timeout_ms: None,
        }
    }

    /// The configured spelling of `requested` (matched case-insensitively),
    /// or the default language when nothing was requested.
    pub fn resolve_language(&self, requested: Option<&str>) -> Result<String> {
        let requested = match requested.map(str::trim) {
            None | Some("") => return Ok(self.default_language.clone()),
            Some(language) => language,
        };

        self.languages
            .iter()
            .find(|known| known.eq_ignore_ascii_case(requested))
            .cloned()
            .ok_or_else(|| OracleError::UnsupportedLanguage(requested.to_string()))
    }

    pub fn text_store_timeout(&self) -> Option<Duration> {
        self.text_store_timeout_ms.map(Duration::from_millis)
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self::v0()
    }
}

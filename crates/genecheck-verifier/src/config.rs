//! Verifier configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default maximum rounds per claim
pub const DEFAULT_MAX_ROUNDS: u32 = 20;

/// Default per-claim wall-clock timeout in milliseconds
pub const DEFAULT_PER_CLAIM_TIMEOUT_MS: u64 = 30_000;

/// Knobs for the verification loop and the batch runner
///
/// # Examples
///
/// ```
/// use genecheck_verifier::VerifierConfig;
///
/// let config = VerifierConfig::default();
/// assert_eq!(config.max_rounds, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Hard cap on reasoning rounds per claim
    pub max_rounds: u32,
    /// Wall-clock budget per claim, in milliseconds
    pub per_claim_timeout_ms: u64,
    /// Maximum claims verified concurrently
    pub concurrency_cap: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            per_claim_timeout_ms: DEFAULT_PER_CLAIM_TIMEOUT_MS,
            concurrency_cap: parallelism * 2,
        }
    }
}

impl VerifierConfig {
    /// Per-claim timeout as a [`Duration`]
    pub fn per_claim_timeout(&self) -> Duration {
        Duration::from_millis(self.per_claim_timeout_ms)
    }

    /// Validate the configuration, returning a description of the first
    /// problem found
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".to_string());
        }
        if self.per_claim_timeout_ms == 0 {
            return Err("per_claim_timeout_ms must be positive".to_string());
        }
        if self.concurrency_cap == 0 {
            return Err("concurrency_cap must be at least 1".to_string());
        }
        Ok(())
    }

    /// Parse from a TOML document
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Render as a TOML document
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerifierConfig::default();
        assert_eq!(config.max_rounds, 20);
        assert_eq!(config.per_claim_timeout(), Duration::from_secs(30));
        assert!(config.concurrency_cap >= 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_rounds() {
        let config = VerifierConfig {
            max_rounds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let config = VerifierConfig {
            concurrency_cap: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = VerifierConfig {
            max_rounds: 10,
            per_claim_timeout_ms: 5_000,
            concurrency_cap: 8,
        };
        let rendered = config.to_toml().unwrap();
        let parsed = VerifierConfig::from_toml(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = VerifierConfig::from_toml("max_rounds = 5").unwrap();
        assert_eq!(parsed.max_rounds, 5);
        assert_eq!(parsed.per_claim_timeout_ms, DEFAULT_PER_CLAIM_TIMEOUT_MS);
    }
}

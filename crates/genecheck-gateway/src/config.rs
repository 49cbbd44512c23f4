//! Configuration for the gateway

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Token-bucket settings for one upstream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Maximum tokens the bucket can hold
    pub capacity: u32,

    /// Tokens restored per second
    pub refill_per_sec: f64,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            refill_per_sec: 2.0,
        }
    }
}

/// Configuration for the AdapterGateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Deadline for one adapter call (seconds)
    pub adapter_timeout_secs: u64,

    /// Cache entry lifetime (seconds)
    pub cache_ttl_secs: u64,

    /// Consecutive failures before an upstream's circuit opens
    pub circuit_threshold: u32,

    /// How long an open circuit stays open before a trial call (seconds)
    pub circuit_cooldown_secs: u64,

    /// Upper bound on waiting for a rate-limit token (milliseconds)
    pub rate_wait_ms: u64,

    /// Base delay for the single retry after a failed adapter call
    /// (milliseconds); the retry waits `retry_backoff_base_ms`
    pub retry_backoff_base_ms: u64,

    /// Bucket settings applied to upstreams without an explicit override
    pub default_bucket: BucketConfig,

    /// Per-upstream bucket overrides; adapters differ in tolerated rate
    pub upstream_buckets: BTreeMap<String, BucketConfig>,
}

impl GatewayConfig {
    /// Get the adapter timeout as a Duration
    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_secs(self.adapter_timeout_secs)
    }

    /// Get the cache TTL as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Get the circuit cooldown as a Duration
    pub fn circuit_cooldown(&self) -> Duration {
        Duration::from_secs(self.circuit_cooldown_secs)
    }

    /// Get the rate-limit wait bound as a Duration
    pub fn rate_wait(&self) -> Duration {
        Duration::from_millis(self.rate_wait_ms)
    }

    /// Get the retry backoff base as a Duration
    pub fn retry_backoff_base(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_base_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.adapter_timeout_secs == 0 {
            return Err("adapter_timeout_secs must be greater than 0".to_string());
        }
        if self.cache_ttl_secs == 0 {
            return Err("cache_ttl_secs must be greater than 0".to_string());
        }
        if self.circuit_threshold == 0 {
            return Err("circuit_threshold must be greater than 0".to_string());
        }
        if self.default_bucket.capacity == 0 {
            return Err("default_bucket.capacity must be greater than 0".to_string());
        }
        if self.default_bucket.refill_per_sec <= 0.0 {
            return Err("default_bucket.refill_per_sec must be positive".to_string());
        }
        for (name, bucket) in &self.upstream_buckets {
            if bucket.capacity == 0 || bucket.refill_per_sec <= 0.0 {
                return Err(format!("bucket for upstream '{}' is invalid", name));
            }
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    /// Defaults: 15s adapter timeout, 1h cache TTL, circuit threshold 5 with
    /// 30s cooldown, 5s token wait bound, 500ms retry backoff base
    fn default() -> Self {
        Self {
            adapter_timeout_secs: 15,
            cache_ttl_secs: 3600,
            circuit_threshold: 5,
            circuit_cooldown_secs: 30,
            rate_wait_ms: 5_000,
            retry_backoff_base_ms: 500,
            default_bucket: BucketConfig::default(),
            upstream_buckets: BTreeMap::new(),
        }
    }
}

impl GatewayConfig {
    /// Conservative preset: slower retries, tighter buckets, longer cooldown
    pub fn conservative() -> Self {
        Self {
            adapter_timeout_secs: 10,
            circuit_cooldown_secs: 60,
            rate_wait_ms: 2_000,
            retry_backoff_base_ms: 1_000,
            default_bucket: BucketConfig {
                capacity: 2,
                refill_per_sec: 0.5,
            },
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Bucket settings for the named upstream
    pub fn bucket_for(&self, upstream: &str) -> BucketConfig {
        self.upstream_buckets
            .get(upstream)
            .copied()
            .unwrap_or(self.default_bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.adapter_timeout(), Duration::from_secs(15));
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.circuit_threshold, 5);
    }

    #[test]
    fn test_conservative_config_is_valid() {
        let config = GatewayConfig::conservative();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = GatewayConfig::default();
        config.adapter_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_upstream_bucket() {
        let mut config = GatewayConfig::default();
        config.upstream_buckets.insert(
            "pubmed".to_string(),
            BucketConfig {
                capacity: 0,
                refill_per_sec: 1.0,
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bucket_for_override() {
        let mut config = GatewayConfig::default();
        config.upstream_buckets.insert(
            "pubmed".to_string(),
            BucketConfig {
                capacity: 1,
                refill_per_sec: 0.3,
            },
        );

        assert_eq!(config.bucket_for("pubmed").capacity, 1);
        assert_eq!(
            config.bucket_for("string-db").capacity,
            config.default_bucket.capacity
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GatewayConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = GatewayConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.adapter_timeout_secs, parsed.adapter_timeout_secs);
        assert_eq!(config.circuit_threshold, parsed.circuit_threshold);
        assert_eq!(config.default_bucket, parsed.default_bucket);
    }
}

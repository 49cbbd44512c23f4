//! The AdapterGateway: single entry point for knowledge-source calls

use crate::breaker::CircuitBreaker;
use crate::cache::{cache_key, TtlCache};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::ratelimit::RateLimiter;
use crate::registry::ToolRegistry;
use genecheck_domain::ToolSpec;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Wraps cache, rate limiter, circuit breaker, and tool registry behind one
/// `invoke` call used by the verification orchestrator
///
/// The gateway is shared across all concurrently verified claims; its parts
/// are internally synchronized.
pub struct AdapterGateway {
    registry: Arc<ToolRegistry>,
    cache: TtlCache,
    limiter: RateLimiter,
    breaker: CircuitBreaker,
    config: GatewayConfig,
}

impl AdapterGateway {
    /// Create a gateway over the given registry and configuration
    pub fn new(registry: Arc<ToolRegistry>, config: GatewayConfig) -> Self {
        let cache = TtlCache::new(config.cache_ttl());
        let breaker = CircuitBreaker::new(config.circuit_threshold, config.circuit_cooldown());
        let buckets = {
            let config = config.clone();
            move |upstream: &str| config.bucket_for(upstream)
        };
        let limiter = RateLimiter::new(buckets, config.rate_wait());

        Self {
            registry,
            cache,
            limiter,
            breaker,
            config,
        }
    }

    /// Tool descriptors for advertisement to the reasoning model
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.registry.specs()
    }

    /// Invoke the named tool with the given arguments
    ///
    /// Sequence: resolve + validate, cache lookup, circuit check, token
    /// acquisition, adapter call under the configured timeout. Success
    /// populates the cache and the breaker; failure is reported to the
    /// breaker and retried once with exponential backoff before surfacing.
    pub async fn invoke(
        &self,
        tool_name: &str,
        args: &Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        let (upstream, adapter, _) = self.registry.resolve(tool_name)?;
        let upstream = upstream.to_string();
        self.registry.validate_args(tool_name, args)?;

        let key = cache_key(tool_name, args);
        if let Some(cached) = self.cache.get(&key) {
            debug!("cache hit for '{}'", tool_name);
            return Ok(cached);
        }

        self.breaker.check(&upstream)?;
        self.limiter.acquire(&upstream).await?;

        let mut last_error = None;
        for attempt in 0..2u32 {
            if attempt > 0 {
                // Single retry with exponential backoff from the base delay
                let delay = self.config.retry_backoff_base() * 2u32.pow(attempt - 1);
                tokio::time::sleep(delay).await;
            }

            match timeout(self.config.adapter_timeout(), adapter.fetch(args)).await {
                Ok(Ok(value)) => {
                    self.cache.insert(key, value.clone());
                    self.breaker.record_success(&upstream);
                    debug!("'{}' succeeded on attempt {}", tool_name, attempt + 1);
                    return Ok(value);
                }
                Ok(Err(e)) => {
                    warn!(
                        "'{}' failed on attempt {}: {}",
                        tool_name,
                        attempt + 1,
                        e
                    );
                    self.breaker.record_failure(&upstream);
                    last_error = Some(GatewayError::Upstream(e.to_string()));
                }
                Err(_) => {
                    warn!(
                        "'{}' timed out on attempt {} after {:?}",
                        tool_name,
                        attempt + 1,
                        self.config.adapter_timeout()
                    );
                    self.breaker.record_failure(&upstream);
                    last_error = Some(GatewayError::UpstreamTimeout(upstream.clone()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GatewayError::Upstream("no attempt made".to_string())))
    }

    /// Observable circuit state for an upstream, for health reporting
    pub fn circuit_state(&self, upstream: &str) -> crate::breaker::CircuitState {
        self.breaker.state(upstream)
    }

    /// Remove expired cache entries; returns how many were evicted
    pub fn sweep_cache(&self) -> usize {
        self.cache.sweep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaker::CircuitState;
    use crate::config::BucketConfig;
    use async_trait::async_trait;
    use genecheck_domain::traits::{AdapterError, KnowledgeAdapter};
    use genecheck_domain::{ParamType, ParameterSchema};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Adapter returning scripted results, then repeating the last behavior
    struct ScriptedAdapter {
        script: Mutex<VecDeque<Result<Value, AdapterError>>>,
        fallback: Result<Value, AdapterError>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl ScriptedAdapter {
        fn ok(value: Value) -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                fallback: Ok(value),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn failing(detail: &str) -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                fallback: Err(AdapterError::new(detail)),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn slow(value: Value, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::ok(value)
            }
        }

        fn push(&self, result: Result<Value, AdapterError>) {
            self.script.lock().unwrap().push_back(result);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl KnowledgeAdapter for ScriptedAdapter {
        async fn fetch(&self, _query: &Map<String, Value>) -> Result<Value, AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let scripted = self.script.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| self.fallback.clone())
        }
    }

    fn pathway_spec() -> ToolSpec {
        ToolSpec::new(
            "get_pathway_for_gene_set",
            "Fetch enriched pathways for a comma-separated gene set",
            ParameterSchema::new()
                .property("genes", ParamType::String)
                .require("genes"),
        )
    }

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            adapter_timeout_secs: 1,
            cache_ttl_secs: 60,
            circuit_threshold: 2,
            circuit_cooldown_secs: 60,
            rate_wait_ms: 50,
            retry_backoff_base_ms: 1,
            default_bucket: BucketConfig {
                capacity: 100,
                refill_per_sec: 100.0,
            },
            upstream_buckets: Default::default(),
        }
    }

    fn gateway_with(adapter: Arc<ScriptedAdapter>, config: GatewayConfig) -> AdapterGateway {
        let mut registry = ToolRegistry::new();
        registry
            .register(pathway_spec(), "enrichr", adapter)
            .unwrap();
        AdapterGateway::new(Arc::new(registry), config)
    }

    fn genes_args() -> Map<String, Value> {
        json!({"genes": "ERBB2,EGFR"}).as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let adapter = Arc::new(ScriptedAdapter::ok(json!({"pathway": "MAPK signaling"})));
        let gateway = gateway_with(Arc::clone(&adapter), test_config());

        let result = gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await
            .unwrap();
        assert_eq!(result["pathway"], "MAPK signaling");
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_suppresses_second_call() {
        let adapter = Arc::new(ScriptedAdapter::ok(json!({"pathway": "MAPK signaling"})));
        let gateway = gateway_with(Arc::clone(&adapter), test_config());

        gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await
            .unwrap();
        gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await
            .unwrap();

        assert_eq!(adapter.calls(), 1, "second call must be served from cache");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let adapter = Arc::new(ScriptedAdapter::ok(json!(null)));
        let gateway = gateway_with(adapter, test_config());

        let result = gateway.invoke("get_nothing", &genes_args()).await;
        assert!(matches!(result, Err(GatewayError::UnknownTool(_))));
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let adapter = Arc::new(ScriptedAdapter::ok(json!(null)));
        let gateway = gateway_with(Arc::clone(&adapter), test_config());

        let args = json!({"genes": 42}).as_object().unwrap().clone();
        let result = gateway.invoke("get_pathway_for_gene_set", &args).await;
        assert!(matches!(result, Err(GatewayError::InvalidArguments(_))));
        assert_eq!(adapter.calls(), 0, "invalid args must not reach the adapter");
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let adapter = Arc::new(ScriptedAdapter::ok(json!({"ok": true})));
        adapter.push(Err(AdapterError::new("HTTP 503")));
        let gateway = gateway_with(Arc::clone(&adapter), test_config());

        let result = gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await
            .unwrap();
        assert_eq!(result["ok"], true);
        assert_eq!(adapter.calls(), 2, "one failure, one retry");
    }

    #[tokio::test]
    async fn test_persistent_failure_surfaces_upstream_error() {
        let adapter = Arc::new(ScriptedAdapter::failing("HTTP 503"));
        let gateway = gateway_with(Arc::clone(&adapter), test_config());

        let result = gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await;
        assert!(matches!(result, Err(GatewayError::Upstream(_))));
        assert_eq!(adapter.calls(), 2);
    }

    #[tokio::test]
    async fn test_circuit_opens_and_fails_fast() {
        let adapter = Arc::new(ScriptedAdapter::failing("HTTP 503"));
        // Threshold 2: one invocation (initial + retry) trips the circuit
        let gateway = gateway_with(Arc::clone(&adapter), test_config());

        let _ = gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await;
        assert_eq!(gateway.circuit_state("enrichr"), CircuitState::Open);

        let calls_before = adapter.calls();
        let args = json!({"genes": "TP53"}).as_object().unwrap().clone();
        let result = gateway.invoke("get_pathway_for_gene_set", &args).await;

        assert!(matches!(result, Err(GatewayError::CircuitOpen(_))));
        assert_eq!(
            adapter.calls(),
            calls_before,
            "open circuit must not contact the adapter"
        );
    }

    #[tokio::test]
    async fn test_cached_value_served_while_circuit_open() {
        let adapter = Arc::new(ScriptedAdapter::failing("HTTP 503"));
        adapter.push(Ok(json!({"pathway": "MAPK"})));
        let gateway = gateway_with(Arc::clone(&adapter), test_config());

        // First call succeeds and caches
        gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await
            .unwrap();
        // Different args fail until the circuit opens
        let other = json!({"genes": "TP53"}).as_object().unwrap().clone();
        let _ = gateway.invoke("get_pathway_for_gene_set", &other).await;
        assert_eq!(gateway.circuit_state("enrichr"), CircuitState::Open);

        // Cache is consulted before the breaker
        let cached = gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await
            .unwrap();
        assert_eq!(cached["pathway"], "MAPK");
    }

    #[tokio::test]
    async fn test_adapter_timeout() {
        let adapter = Arc::new(ScriptedAdapter::slow(
            json!(null),
            Duration::from_millis(1500),
        ));
        let mut config = test_config();
        config.adapter_timeout_secs = 1;
        // keep the test fast: timeout is per attempt and there is one retry
        let gateway = gateway_with(Arc::clone(&adapter), config);

        let result = gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await;
        assert_eq!(
            result,
            Err(GatewayError::UpstreamTimeout("enrichr".to_string()))
        );
    }

    #[tokio::test]
    async fn test_rate_limit_exhaustion() {
        let adapter = Arc::new(ScriptedAdapter::ok(json!(null)));
        let mut config = test_config();
        config.default_bucket = BucketConfig {
            capacity: 1,
            refill_per_sec: 0.001,
        };
        config.rate_wait_ms = 20;
        let gateway = gateway_with(Arc::clone(&adapter), config);

        gateway
            .invoke("get_pathway_for_gene_set", &genes_args())
            .await
            .unwrap();

        // Second distinct query exhausts the single token
        let other = json!({"genes": "TP53"}).as_object().unwrap().clone();
        let result = gateway.invoke("get_pathway_for_gene_set", &other).await;
        assert_eq!(result, Err(GatewayError::RateLimited("enrichr".to_string())));
    }
}

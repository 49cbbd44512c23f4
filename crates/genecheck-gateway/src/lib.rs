//! GeneCheck Adapter Gateway
//!
//! Fronts every knowledge-source call made during claim verification with
//! caching, per-upstream rate limiting, circuit breaking, and timeout/retry
//! discipline, behind a single `invoke(tool_name, args)` entry point.
//!
//! # Architecture
//!
//! ```text
//! Verifier → AdapterGateway → TtlCache
//!                           → CircuitBreaker ─┐
//!                           → RateLimiter     ├─ per upstream
//!                           → ToolRegistry → KnowledgeAdapter (network)
//! ```
//!
//! Call sequence per invocation: cache lookup, circuit check (fail fast when
//! Open), token acquisition with bounded wait, adapter call under a timeout,
//! then cache population and breaker bookkeeping. Failures are reported to
//! the breaker and retried once with exponential backoff.
//!
//! Every part is internally synchronized; one claim's cancellation never
//! corrupts state shared with sibling claims.

#![warn(missing_docs)]

mod breaker;
mod cache;
mod config;
mod error;
mod gateway;
mod ratelimit;
mod registry;

pub use breaker::{CircuitBreaker, CircuitState};
pub use cache::{cache_key, TtlCache};
pub use config::{BucketConfig, GatewayConfig};
pub use error::GatewayError;
pub use gateway::AdapterGateway;
pub use ratelimit::RateLimiter;
pub use registry::{RegistryError, ToolRegistry};

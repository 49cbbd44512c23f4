//! Per-upstream circuit breaker

use crate::error::GatewayError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Observable state of one upstream's circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation
    Closed,
    /// Failing fast; no calls reach the network
    Open,
    /// One trial call allowed
    HalfOpen,
}

enum Inner {
    Closed { consecutive_failures: u32 },
    Open { reopen_at: Instant },
    HalfOpen { trial_admitted_at: Instant },
}

/// Failure-tracking state machine per upstream
///
/// Closed moves to Open after `threshold` consecutive failures. Open moves
/// to HalfOpen once the cooldown elapses, admitting a single trial call;
/// the trial's outcome decides between Closed and Open. A trial whose caller
/// never reports back (cancelled mid-call) goes stale after another cooldown
/// and a replacement trial is admitted. State is independent per upstream:
/// one outage never blocks another upstream.
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Duration,
    states: Mutex<HashMap<String, Inner>>,
}

impl CircuitBreaker {
    /// Create a breaker with the given failure threshold and cooldown
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Gate a call to the upstream
    ///
    /// Fails fast with [`GatewayError::CircuitOpen`] while Open or while a
    /// HalfOpen trial is already in flight. An in-flight trial older than
    /// the cooldown is treated as abandoned and replaced. Called before
    /// every execution.
    pub fn check(&self, upstream: &str) -> Result<(), GatewayError> {
        let now = Instant::now();
        let mut states = self.states.lock().unwrap();
        let state = states
            .entry(upstream.to_string())
            .or_insert(Inner::Closed {
                consecutive_failures: 0,
            });

        match state {
            Inner::Closed { .. } => Ok(()),
            Inner::Open { reopen_at } => {
                if now >= *reopen_at {
                    info!("circuit for '{}' half-open, admitting trial", upstream);
                    *state = Inner::HalfOpen {
                        trial_admitted_at: now,
                    };
                    Ok(())
                } else {
                    Err(GatewayError::CircuitOpen(upstream.to_string()))
                }
            }
            Inner::HalfOpen { trial_admitted_at } => {
                if now >= *trial_admitted_at + self.cooldown {
                    warn!(
                        "stale half-open trial for '{}', admitting replacement",
                        upstream
                    );
                    *trial_admitted_at = now;
                    Ok(())
                } else {
                    Err(GatewayError::CircuitOpen(upstream.to_string()))
                }
            }
        }
    }

    /// Record a successful execution; called after every execution
    pub fn record_success(&self, upstream: &str) {
        let mut states = self.states.lock().unwrap();
        let state = states
            .entry(upstream.to_string())
            .or_insert(Inner::Closed {
                consecutive_failures: 0,
            });

        match state {
            Inner::HalfOpen { .. } => {
                info!("circuit for '{}' closed after successful trial", upstream);
                *state = Inner::Closed {
                    consecutive_failures: 0,
                };
            }
            Inner::Closed {
                consecutive_failures,
            } => {
                *consecutive_failures = 0;
            }
            // A success while Open has no path here in practice; ignore
            Inner::Open { .. } => {}
        }
    }

    /// Record a failed execution; called after every execution
    pub fn record_failure(&self, upstream: &str) {
        let mut states = self.states.lock().unwrap();
        let state = states
            .entry(upstream.to_string())
            .or_insert(Inner::Closed {
                consecutive_failures: 0,
            });

        match state {
            Inner::Closed {
                consecutive_failures,
            } => {
                *consecutive_failures += 1;
                if *consecutive_failures >= self.threshold {
                    warn!(
                        "circuit for '{}' opened after {} consecutive failures",
                        upstream, consecutive_failures
                    );
                    *state = Inner::Open {
                        reopen_at: Instant::now() + self.cooldown,
                    };
                }
            }
            Inner::HalfOpen { .. } => {
                warn!("circuit for '{}' reopened after failed trial", upstream);
                *state = Inner::Open {
                    reopen_at: Instant::now() + self.cooldown,
                };
            }
            Inner::Open { .. } => {}
        }
    }

    /// Observable state for the upstream
    pub fn state(&self, upstream: &str) -> CircuitState {
        let states = self.states.lock().unwrap();
        match states.get(upstream) {
            None | Some(Inner::Closed { .. }) => CircuitState::Closed,
            Some(Inner::Open { reopen_at }) => {
                if Instant::now() >= *reopen_at {
                    CircuitState::HalfOpen
                } else {
                    CircuitState::Open
                }
            }
            Some(Inner::HalfOpen { .. }) => CircuitState::HalfOpen,
        }
    }
}

//! Concurrent fan-out of verification runs

use crate::config::VerifierConfig;
use crate::orchestrator::Verifier;
use genecheck_domain::traits::ReasoningModel;
use genecheck_domain::{Claim, ClaimId, Outcome, Verdict};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Emitted once per claim as its verification resolves
///
/// Events arrive in completion order, which may differ from claim order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// The claim that resolved
    pub claim_id: ClaimId,
    /// Its outcome
    pub outcome: Outcome,
}

/// Fans a batch of claims out over a bounded pool of verification tasks
///
/// Each claim runs in its own task under a wall-clock budget; a permit from a
/// shared semaphore bounds how many run at once. Timeouts, panics, and every
/// other per-claim failure are contained to that claim's verdict. Results come
/// back in claim order regardless of completion order, one verdict per claim.
pub struct BatchRunner<M: ReasoningModel + 'static> {
    verifier: Arc<Verifier<M>>,
    config: VerifierConfig,
}

impl<M: ReasoningModel + 'static> BatchRunner<M> {
    /// Create a runner over the shared verifier
    pub fn new(verifier: Arc<Verifier<M>>, config: VerifierConfig) -> Self {
        Self { verifier, config }
    }

    /// Verify a batch of claims, returning verdicts in claim order
    pub async fn run_batch(&self, claims: Vec<Claim>) -> Vec<Verdict> {
        self.run_inner(claims, None).await
    }

    /// Verify a batch, emitting a progress event as each claim resolves
    ///
    /// A dropped receiver is tolerated; verification proceeds regardless.
    pub async fn run_batch_with_progress(
        &self,
        claims: Vec<Claim>,
        progress: mpsc::Sender<ProgressEvent>,
    ) -> Vec<Verdict> {
        self.run_inner(claims, Some(progress)).await
    }

    async fn run_inner(
        &self,
        claims: Vec<Claim>,
        progress: Option<mpsc::Sender<ProgressEvent>>,
    ) -> Vec<Verdict> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_cap));
        let budget = self.config.per_claim_timeout();
        let ids: Vec<ClaimId> = claims.iter().map(|c| c.id).collect();

        info!(claims = claims.len(), cap = self.config.concurrency_cap, "batch started");

        let handles: Vec<JoinHandle<Verdict>> = claims
            .into_iter()
            .map(|claim| {
                let semaphore = Arc::clone(&semaphore);
                let verifier = Arc::clone(&self.verifier);
                let progress = progress.clone();
                tokio::spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            return Verdict::failed(claim.id, "internal fault: pool closed");
                        }
                    };

                    let verdict = match tokio::time::timeout(budget, verifier.verify(&claim)).await
                    {
                        Ok(verdict) => verdict,
                        Err(_) => {
                            warn!(claim_id = %claim.id, "per-claim budget exceeded");
                            Verdict::failed(claim.id, "timeout")
                        }
                    };

                    if let Some(sender) = progress {
                        let _ = sender
                            .send(ProgressEvent {
                                claim_id: verdict.claim_id,
                                outcome: verdict.outcome.clone(),
                            })
                            .await;
                    }
                    verdict
                })
            })
            .collect();

        // Await in spawn order so verdicts line up with claims
        let mut verdicts = Vec::with_capacity(handles.len());
        for (handle, id) in handles.into_iter().zip(ids) {
            match handle.await {
                Ok(verdict) => verdicts.push(verdict),
                Err(join_error) => {
                    let detail = if join_error.is_panic() {
                        "task panicked"
                    } else {
                        "task cancelled"
                    };
                    error!(claim_id = %id, detail, "verification task died");
                    verdicts.push(Verdict::failed(id, format!("internal fault: {}", detail)));
                }
            }
        }
        verdicts
    }
}

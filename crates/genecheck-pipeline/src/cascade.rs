//! The annotation cascade driver

use crate::error::PipelineError;
use crate::parser;
use crate::prompts;
use genecheck_domain::traits::ReasoningModel;
use genecheck_domain::{AnalysisResult, AnalysisStatus, AssistantTurn, Claim, Message, Verdict};
use genecheck_gateway::AdapterGateway;
use genecheck_verifier::{BatchRunner, Verifier, VerifierConfig};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs the full annotation cascade for one gene set
///
/// The narrative steps (baseline, modification, summarization) share one
/// accumulating conversation so later revisions see the earlier narrative.
/// The claim-generation steps each start a fresh conversation under the
/// fact-checker system instruction, and the generated claims are verified
/// through the shared batch runner before their report feeds the next
/// revision.
pub struct Cascade<M: ReasoningModel + 'static> {
    model: Arc<M>,
    runner: BatchRunner<M>,
}

impl<M: ReasoningModel + 'static> Cascade<M> {
    /// Create a cascade over the shared model and gateway
    pub fn new(model: Arc<M>, gateway: Arc<AdapterGateway>, config: VerifierConfig) -> Self {
        let verifier = Arc::new(Verifier::new(Arc::clone(&model), gateway, config.clone()));
        let runner = BatchRunner::new(verifier, config);
        Self { model, runner }
    }

    /// Annotate one gene set, verifying the narrative claim by claim
    pub async fn annotate(&self, genes: &[String]) -> Result<AnalysisResult, PipelineError> {
        let gene_list = genes.join(",");
        info!(genes = %gene_list, "annotation cascade started");

        let mut narrative = vec![
            Message::system(prompts::ANNOTATOR_SYSTEM),
            Message::user(prompts::baseline(&gene_list)),
        ];
        let summary = self.converse_content(&narrative).await?;
        narrative.push(Message::assistant(summary.clone()));
        let process = parser::extract_process_name(&summary)?;
        info!(%process, "baseline narrative produced");

        let topic_texts = self
            .generate_claims(&prompts::topic_claims(&gene_list, &process))
            .await?;
        let topic_verdicts = self.verify(genes, &topic_texts).await;
        let topic_report = verification_report(&topic_texts, &topic_verdicts);

        narrative.push(Message::user(prompts::modification(&topic_report)));
        let revised = self.converse_content(&narrative).await?;
        narrative.push(Message::assistant(revised.clone()));
        let updated_process = parser::extract_process_name(&revised)?;
        info!(process = %updated_process, "narrative revised after topic verification");

        let analysis_texts = self
            .generate_claims(&prompts::analysis_claims(&revised))
            .await?;
        let analysis_verdicts = self.verify(genes, &analysis_texts).await;
        let analysis_report = verification_report(&analysis_texts, &analysis_verdicts);

        narrative.push(Message::user(prompts::summarization(&analysis_report)));
        let final_narrative = self.converse_content(&narrative).await?;

        let mut verdicts = topic_verdicts;
        verdicts.extend(analysis_verdicts);
        let status = if verdicts.iter().any(|v| v.outcome.is_failed()) {
            AnalysisStatus::Partial
        } else {
            AnalysisStatus::Complete
        };
        info!(verdicts = verdicts.len(), status = status.as_str(), "cascade finished");

        Ok(AnalysisResult {
            genes: genes.to_vec(),
            process_name: updated_process,
            summary: final_narrative,
            verdicts,
            status,
        })
    }

    /// One no-tool model turn expected to yield content
    async fn converse_content(&self, messages: &[Message]) -> Result<String, PipelineError> {
        match self.model.converse(messages, &[]).await? {
            AssistantTurn::Content(content) => Ok(content),
            AssistantTurn::ToolCall(_) => Err(PipelineError::UnexpectedToolCall),
        }
    }

    /// Generate claim texts from a fresh fact-checker conversation
    async fn generate_claims(&self, prompt: &str) -> Result<Vec<String>, PipelineError> {
        let messages = vec![
            Message::system(prompts::CLAIM_SYSTEM),
            Message::user(prompt.to_string()),
        ];
        let response = self.converse_content(&messages).await?;
        let claims = parser::parse_claim_list(&response)?;
        debug!(count = claims.len(), "claims generated");
        Ok(claims)
    }

    /// Verify claim texts as claims about this gene set
    async fn verify(&self, genes: &[String], texts: &[String]) -> Vec<Verdict> {
        let claims = texts
            .iter()
            .map(|text| Claim::new(text.clone(), genes.to_vec()))
            .collect();
        self.runner.run_batch(claims).await
    }
}

/// Render verdicts into the report text fed to the revision prompts
fn verification_report(texts: &[String], verdicts: &[Verdict]) -> String {
    texts
        .iter()
        .zip(verdicts)
        .map(|(text, verdict)| {
            format!(
                "Original_claim: {}\nVerified_claim: [{}] {}\n",
                text, verdict.outcome, verdict.report_text
            )
        })
        .collect()
}

//! Per-claim verification loop

use crate::classify::{KeywordClassifier, ReportClassifier};
use crate::config::VerifierConfig;
use crate::prompt;
use genecheck_domain::traits::ReasoningModel;
use genecheck_domain::{
    AssistantTurn, Claim, EvidenceLog, Message, Outcome, ToolCallRequest, ToolCallResult, Verdict,
};
use genecheck_gateway::AdapterGateway;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Marker that identifies the model's terminal report
pub const REPORT_MARKER: &str = "Report:";

/// Drives one claim through the bounded reasoning-and-tool loop
///
/// Each round sends the accumulated conversation and the advertised tool
/// descriptors to the reasoning model. A tool call is executed through the
/// gateway and its result, success or failure, is appended as evidence and
/// fed back into the conversation. Content containing `Report:` ends the
/// run; content without the marker earns a reminder. The loop is bounded by
/// `max_rounds` and every exit path yields exactly one verdict.
pub struct Verifier<M: ReasoningModel> {
    model: Arc<M>,
    gateway: Arc<AdapterGateway>,
    classifier: Arc<dyn ReportClassifier>,
    config: VerifierConfig,
}

impl<M: ReasoningModel> Verifier<M> {
    /// Create a verifier with the default keyword classifier
    pub fn new(model: Arc<M>, gateway: Arc<AdapterGateway>, config: VerifierConfig) -> Self {
        Self::with_classifier(model, gateway, Arc::new(KeywordClassifier), config)
    }

    /// Create a verifier with a custom report classifier
    pub fn with_classifier(
        model: Arc<M>,
        gateway: Arc<AdapterGateway>,
        classifier: Arc<dyn ReportClassifier>,
        config: VerifierConfig,
    ) -> Self {
        Self {
            model,
            gateway,
            classifier,
            config,
        }
    }

    /// Verify one claim, always yielding a verdict
    pub async fn verify(&self, claim: &Claim) -> Verdict {
        let mut messages = prompt::initial_messages(claim);
        let mut evidence = EvidenceLog::new();
        let mut last_failure_kind: Option<&'static str> = None;
        let tools = self.gateway.specs();

        info!(claim_id = %claim.id, "verification started");

        for round in 1..=self.config.max_rounds {
            let turn = match self.converse_with_retry(&messages, &tools).await {
                Ok(turn) => turn,
                Err(error) => {
                    warn!(claim_id = %claim.id, %error, "reasoning model failed twice");
                    return Verdict::new(
                        claim.id,
                        Outcome::Failed(model_failure_reason(&error)),
                        "",
                        evidence,
                    );
                }
            };

            match turn {
                AssistantTurn::ToolCall(request) => {
                    debug!(claim_id = %claim.id, round, tool = %request.tool_name, "tool call");
                    let (result, feedback, kind) = self.execute_tool(&request).await;
                    if kind.is_some() {
                        last_failure_kind = kind;
                    }
                    evidence.record(result);
                    messages.push(Message::tool(request.tool_name, feedback));
                }
                AssistantTurn::Content(content) => {
                    if let Some(report) = extract_report(&content) {
                        let outcome = self.classifier.classify(report);
                        info!(claim_id = %claim.id, round, outcome = %outcome, "report received");
                        return Verdict::new(claim.id, outcome, report, evidence);
                    }
                    debug!(claim_id = %claim.id, round, "content without report marker");
                    messages.push(Message::assistant(content));
                    messages.push(Message::user(prompt::REMINDER));
                }
            }
        }

        // Round budget exhausted. If every tool invocation failed, the most
        // recent infrastructure failure is more informative than the generic
        // exhaustion reason.
        let reason = match last_failure_kind {
            Some(kind) if evidence.all_failed() => kind.to_string(),
            _ => "max iterations exceeded".to_string(),
        };
        warn!(claim_id = %claim.id, %reason, "round budget exhausted");
        Verdict::new(claim.id, Outcome::Failed(reason), "", evidence)
    }

    /// One model turn, retried once on failure
    async fn converse_with_retry(
        &self,
        messages: &[Message],
        tools: &[genecheck_domain::ToolSpec],
    ) -> Result<AssistantTurn, genecheck_domain::traits::ModelError> {
        match self.model.converse(messages, tools).await {
            Ok(turn) => Ok(turn),
            Err(error) => {
                warn!(%error, "model turn failed, retrying once");
                self.model.converse(messages, tools).await
            }
        }
    }

    /// Execute one tool call through the gateway
    ///
    /// Returns the evidence entry, the conversation feedback text, and the
    /// failure kind if the invocation failed.
    async fn execute_tool(
        &self,
        request: &ToolCallRequest,
    ) -> (ToolCallResult, String, Option<&'static str>) {
        let params = Value::Object(request.arguments.clone()).to_string();
        match self.gateway.invoke(&request.tool_name, &request.arguments).await {
            Ok(payload) => {
                let feedback = format!(
                    "Function has been called with params {}, and returns {}.",
                    params, payload
                );
                (ToolCallResult::ok(&request.tool_name, payload), feedback, None)
            }
            Err(error) => {
                let feedback = format!(
                    "Function has been called with params {}, but returned error: {}. \
                     Please try again with the correct parameter.",
                    params, error
                );
                let kind = error.kind();
                (
                    ToolCallResult::error(&request.tool_name, error.to_string()),
                    feedback,
                    Some(kind),
                )
            }
        }
    }
}

fn model_failure_reason(error: &genecheck_domain::traits::ModelError) -> String {
    use genecheck_domain::traits::ModelError;
    match error {
        ModelError::Timeout => "model timeout".to_string(),
        other => other.to_string(),
    }
}

/// Text following the terminal marker, trimmed; `None` when absent
///
/// The marker may appear anywhere in the turn; preceding prose is discarded
/// and the last occurrence wins.
fn extract_report(content: &str) -> Option<&str> {
    content
        .rfind(REPORT_MARKER)
        .map(|idx| content[idx + REPORT_MARKER.len()..].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use genecheck_domain::traits::{AdapterError, KnowledgeAdapter, ModelError};
    use genecheck_domain::{ParamType, ParameterSchema, ToolSpec};
    use genecheck_gateway::{CircuitState, GatewayConfig, ToolRegistry};
    use genecheck_llm::MockModel;
    use serde_json::{json, Map};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Adapter that replays a script of results, then a fixed fallback
    struct ScriptedAdapter {
        script: Mutex<VecDeque<Result<Value, AdapterError>>>,
        fallback: Result<Value, AdapterError>,
    }

    impl ScriptedAdapter {
        fn always_ok(payload: Value) -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                fallback: Ok(payload),
            }
        }

        fn always_err(detail: &str) -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                fallback: Err(AdapterError::new(detail)),
            }
        }
    }

    #[async_trait]
    impl KnowledgeAdapter for ScriptedAdapter {
        async fn fetch(&self, _query: &Map<String, Value>) -> Result<Value, AdapterError> {
            match self.script.lock().unwrap().pop_front() {
                Some(result) => result,
                None => self.fallback.clone(),
            }
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

    fn gateway_with(adapter: ScriptedAdapter) -> Arc<AdapterGateway> {
        let mut registry = ToolRegistry::new();
        registry
            .register(pathway_spec(), "enrichr", Arc::new(adapter))
            .unwrap();
        let config = GatewayConfig {
            circuit_threshold: 2,
            retry_backoff_base_ms: 1,
            rate_wait_ms: 50,
            ..Default::default()
        };
        Arc::new(AdapterGateway::new(Arc::new(registry), config))
    }

    fn test_config(max_rounds: u32) -> VerifierConfig {
        VerifierConfig {
            max_rounds,
            ..Default::default()
        }
    }

    fn erbb2_claim() -> Claim {
        Claim::new(
            "ERBB2 activates MAPK signaling",
            vec!["ERBB2".to_string(), "EGFR".to_string()],
        )
    }

    #[tokio::test]
    async fn test_tool_call_then_supported_report() {
        let model = Arc::new(MockModel::default());
        model.push_tool_call("get_pathway_for_gene_set", json!({"genes": "ERBB2,EGFR"}));
        model.push_content(
            "Report: the KEGG enrichment supports the claim that ERBB2 activates MAPK signaling.",
        );

        let gateway = gateway_with(ScriptedAdapter::always_ok(json!({"pathway": "MAPK"})));
        let verifier = Verifier::new(model.clone(), gateway, test_config(20));

        let claim = erbb2_claim();
        let verdict = verifier.verify(&claim).await;

        assert_eq!(verdict.claim_id, claim.id);
        assert_eq!(verdict.outcome, Outcome::Supported);
        assert!(verdict.report_text.starts_with("the KEGG enrichment"));
        assert_eq!(verdict.evidence.len(), 1);
        assert!(verdict.evidence.entries()[0].is_ok());
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_report_preceded_by_prose_still_terminates() {
        let model = Arc::new(MockModel::default());
        model.push_content(
            "I have finished checking. Report: the pathway data supports the claim.",
        );

        let gateway = gateway_with(ScriptedAdapter::always_ok(json!(null)));
        let verifier = Verifier::new(model.clone(), gateway, test_config(3));

        let verdict = verifier.verify(&erbb2_claim()).await;

        assert_eq!(verdict.outcome, Outcome::Supported);
        assert_eq!(
            verdict.report_text,
            "the pathway data supports the claim."
        );
        assert_eq!(model.call_count(), 1, "the marker must terminate the run");
    }

    #[tokio::test]
    async fn test_content_without_marker_earns_reminder() {
        let model = Arc::new(MockModel::default());
        model.push_content("I am still gathering evidence for the claim.");
        model.push_content("Report: the claim is supported by the pathway data.");

        let gateway = gateway_with(ScriptedAdapter::always_ok(json!(null)));
        let verifier = Verifier::new(model.clone(), gateway, test_config(20));

        let verdict = verifier.verify(&erbb2_claim()).await;

        assert_eq!(verdict.outcome, Outcome::Supported);
        // First content turn consumed a round; the reminder got the report
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_round_budget_exhaustion() {
        // Fallback content never carries the marker, so every round is spent
        let model = Arc::new(MockModel::new("still thinking about the claim"));
        let gateway = gateway_with(ScriptedAdapter::always_ok(json!(null)));
        let verifier = Verifier::new(model.clone(), gateway, test_config(3));

        let verdict = verifier.verify(&erbb2_claim()).await;

        assert_eq!(
            verdict.outcome,
            Outcome::Failed("max iterations exceeded".to_string())
        );
        assert!(verdict.report_text.is_empty());
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn test_unknown_tool_fed_back_and_loop_continues() {
        let model = Arc::new(MockModel::default());
        model.push_tool_call("get_nonexistent_tool", json!({}));
        model.push_content("Report: verification confirmed the claim.");

        let gateway = gateway_with(ScriptedAdapter::always_ok(json!(null)));
        let verifier = Verifier::new(model, gateway, test_config(20));

        let verdict = verifier.verify(&erbb2_claim()).await;

        assert_eq!(verdict.outcome, Outcome::Supported);
        assert_eq!(verdict.evidence.len(), 1);
        assert!(!verdict.evidence.entries()[0].is_ok());
        assert!(verdict.evidence.entries()[0]
            .error_detail
            .as_deref()
            .unwrap()
            .contains("unknown tool"));
    }

    #[tokio::test]
    async fn test_all_failed_reports_circuit_open() {
        // Threshold 2 with one internal retry trips the circuit on the first
        // invocation; every later round fails fast on the open circuit.
        let model = Arc::new(MockModel::default());
        for _ in 0..4 {
            model.push_tool_call("get_pathway_for_gene_set", json!({"genes": "ERBB2"}));
        }
        model.push_content("no marker here");

        let gateway = gateway_with(ScriptedAdapter::always_err("HTTP 503"));
        let verifier = Verifier::new(model, Arc::clone(&gateway), test_config(5));

        let verdict = verifier.verify(&erbb2_claim()).await;

        assert_eq!(gateway.circuit_state("enrichr"), CircuitState::Open);
        assert_eq!(verdict.outcome, Outcome::Failed("circuit open".to_string()));
        assert!(verdict.evidence.all_failed());
    }

    #[tokio::test]
    async fn test_mixed_evidence_keeps_exhaustion_reason() {
        let model = Arc::new(MockModel::new("still verifying"));
        model.push_tool_call("get_pathway_for_gene_set", json!({"genes": "ERBB2"}));
        model.push_tool_call("get_nonexistent_tool", json!({}));

        let gateway = gateway_with(ScriptedAdapter::always_ok(json!({"pathway": "MAPK"})));
        let verifier = Verifier::new(model, gateway, test_config(3));

        let verdict = verifier.verify(&erbb2_claim()).await;

        // One invocation succeeded, so exhaustion keeps its generic reason
        assert_eq!(
            verdict.outcome,
            Outcome::Failed("max iterations exceeded".to_string())
        );
    }

    #[tokio::test]
    async fn test_model_error_retried_once_then_succeeds() {
        let model = Arc::new(MockModel::default());
        model.push_error(ModelError::Timeout);
        model.push_content("Report: the claim is supported.");

        let gateway = gateway_with(ScriptedAdapter::always_ok(json!(null)));
        let verifier = Verifier::new(model.clone(), gateway, test_config(20));

        let verdict = verifier.verify(&erbb2_claim()).await;

        assert_eq!(verdict.outcome, Outcome::Supported);
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_model_error_twice_fails_run() {
        let model = Arc::new(MockModel::default());
        model.push_error(ModelError::Timeout);
        model.push_error(ModelError::Timeout);

        let gateway = gateway_with(ScriptedAdapter::always_ok(json!(null)));
        let verifier = Verifier::new(model, gateway, test_config(20));

        let verdict = verifier.verify(&erbb2_claim()).await;

        assert_eq!(verdict.outcome, Outcome::Failed("model timeout".to_string()));
    }

    #[test]
    fn test_extract_report() {
        assert_eq!(
            extract_report("Report: all evidence agrees."),
            Some("all evidence agrees.")
        );
        assert_eq!(
            extract_report("  Report:   padded  "),
            Some("padded")
        );
        assert_eq!(extract_report("No marker in sight"), None);
        // Preceding prose is discarded
        assert_eq!(
            extract_report("I have finished checking. Report: all good."),
            Some("all good.")
        );
        // The last marker wins
        assert_eq!(
            extract_report("Draft Report: ignored. Report: final text."),
            Some("final text.")
        );
    }
}

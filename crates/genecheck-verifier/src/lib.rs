//! GeneCheck Verification Engine
//!
//! Drives the iterative reasoning-and-tool loop that checks each generated
//! claim against external knowledge sources, and fans many such loops out
//! concurrently under a bounded pool with per-claim timeouts.
//!
//! # Architecture
//!
//! ```text
//! Claims → BatchRunner → Verifier (per claim) → ReasoningModel
//!                                             → AdapterGateway → upstreams
//!        → verdicts → aggregate → AnalysisResult
//! ```
//!
//! # Key Features
//!
//! - **Bounded verification loop**: at most 20 rounds per claim; terminal
//!   content is recognized by the `Report:` marker
//! - **Round-level recovery**: tool failures are fed back into the
//!   conversation as evidence rather than aborting the claim
//! - **Failure isolation**: per-claim timeouts and panic containment; one
//!   claim's failure never affects its siblings
//! - **Order preservation**: verdicts come back in claim order regardless of
//!   completion order
//!
//! # Example Usage
//!
//! ```no_run
//! use genecheck_verifier::{BatchRunner, Verifier, VerifierConfig};
//! use genecheck_gateway::{AdapterGateway, GatewayConfig, ToolRegistry};
//! use genecheck_llm::OpenAiCompatModel;
//! use genecheck_domain::Claim;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ToolRegistry::new(); // register adapters per upstream
//! let gateway = Arc::new(AdapterGateway::new(Arc::new(registry), GatewayConfig::default()));
//! let model = Arc::new(OpenAiCompatModel::new("https://api.openai.com/v1", "gpt-4o-mini")?);
//!
//! let verifier = Arc::new(Verifier::new(model, gateway, VerifierConfig::default()));
//! let runner = BatchRunner::new(verifier, VerifierConfig::default());
//!
//! let claims = vec![Claim::new(
//!     "ERBB2 activates MAPK signaling",
//!     vec!["ERBB2".to_string()],
//! )];
//! let verdicts = runner.run_batch(claims).await;
//! println!("{} verdicts", verdicts.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod aggregate;
mod batch;
mod classify;
mod config;
mod orchestrator;
mod prompt;

pub use batch::{BatchRunner, ProgressEvent};
pub use classify::{KeywordClassifier, ReportClassifier};
pub use config::VerifierConfig;
pub use orchestrator::{Verifier, REPORT_MARKER};

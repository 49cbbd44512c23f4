//! Prompt templates for the annotation cascade
//!
//! Each step of the cascade sends one of these prompts. The claim-generation
//! prompts ask for a bare JSON array of claim strings; [`crate::parser`]
//! handles the responses.

/// System instruction for the narrative steps
pub const ANNOTATOR_SYSTEM: &str =
    "You are an efficient and insightful assistant to a molecular biologist.";

/// System instruction for the claim-generation steps
pub const CLAIM_SYSTEM: &str =
    "You are a helpful and objective fact-checker to verify the summary of gene set.";

/// Header prefix the narrative must open with
pub const PROCESS_HEADER: &str = "Process:";

/// Baseline narrative prompt for a comma-separated gene set
pub fn baseline(genes: &str) -> String {
    format!(
        "Write a critical analysis of the biological processes performed by this system of \
         interacting proteins.\n\
         Propose a brief name for the most prominent biological process performed by the system.\n\
         Put the name at the top of the analysis as \"Process: <name>\".\n\
         Be concise, do not use unnecessary words.\n\
         Be textual, do not use any format symbols such as \"*\", \"-\" or other tokens.\n\
         Be specific, avoid overly general statements such as \"the proteins are involved in \
         various cellular processes\".\n\
         Be factual, do not editorialize.\n\
         For each important point, describe your reasoning and supporting information.\n\
         For each biological function name, show the corresponding gene names.\n\
         Here is the gene set: {genes}"
    )
}

/// Claim-generation prompt for the process name
pub fn topic_claims(genes: &str, process: &str) -> String {
    format!(
        "Here is the original process name for the gene set {genes}:\n{process}\n\
         However, the process name might be false. Please generate decontextualized claims for \
         the process name that need to be verified.\n\
         Only return a JSON array that contains all generated claim strings, for example, \
         [\"claim_1\", \"claim_2\"]\n\
         Only generate claims with affirmative sentences for the entire gene set.\n\
         The gene set should only be separated by comma, e.g., \"a,b,c\".\n\
         Don't generate claims for a single gene or an incomplete gene set.\n\
         Don't generate hypothesis claims over the previous analysis.\n\
         Please replace statements like 'these genes' or 'this system' with the core genes in \
         the given gene set."
    )
}

/// Claim-generation prompt for the revised narrative
pub fn analysis_claims(summary: &str) -> String {
    format!(
        "Here is the summary of the given gene set:\n{summary}\n\
         However, the gene analysis in the summary might not support the updated process name.\n\
         Please generate several decontextualized claims for the analytical narratives that need \
         to be verified.\n\
         Only return a JSON array that contains all generated claim strings, for example, \
         [\"claim_1\", \"claim_2\"]\n\
         Generate claims for genes and their biological functions around the updated process \
         name.\n\
         Don't generate claims for the entire gene set or 'this system'.\n\
         Don't generate unworthy claims such as summarization and reasoning over the previous \
         analysis.\n\
         Claims must contain the gene names and their biological process functions."
    )
}

/// Revision prompt applying the process-name verification report
pub fn modification(report: &str) -> String {
    format!(
        "I have finished the verification for the process name. Here is the verification \
         report:\n{report}\n\
         You should only consider the successfully verified claims.\n\
         If claims are supported, you should retain the original process name and only make a \
         minor grammar revision.\n\
         If claims are partially supported, you should discard the unsupported part.\n\
         If claims are refuted, you must replace the original process name with the most \
         significant biological function term summarized from the verification report.\n\
         Meanwhile, revise the original summary using the verified (or updated) process name. \
         Do not use sentences like \"There is no direct evidence to...\"\n\
         Put the updated process name at the top of the analysis as \"Process: <name>\".\n\
         Be concise, do not use unnecessary words.\n\
         Be textual, do not use any format symbols such as \"*\", \"-\" or other tokens.\n\
         Be specific, avoid overly general statements.\n\
         Be factual, do not editorialize.\n\
         You must retain the gene names of each updated biological function in the new summary."
    )
}

/// Final revision prompt applying the analysis verification report
pub fn summarization(report: &str) -> String {
    format!(
        "I have finished the verification for the revised summary. Here is the verification \
         report:\n{report}\n\
         Please modify the summary according to the verification report again.\n\
         If the analytical narratives of the genes cannot directly support or relate to the \
         updated process name, you must propose a new brief biological process name from the \
         analytical texts. Otherwise, you must retain the updated process name and only make a \
         grammar revision.\n\
         If a claim is supported, you must complement the narratives using the standard \
         evidence of gene set functions in the verification report but don't change the updated \
         process name.\n\
         If a claim is not supported, do not mention any statement like \"... was not directly \
         confirmed by...\"\n\
         Put the updated process name at the top of the analysis as \"Process: <name>\".\n\
         Be concise, only return the plain text."
    )
}

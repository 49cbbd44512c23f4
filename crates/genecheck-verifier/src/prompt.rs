//! Prompt templates for the verification conversation

use genecheck_domain::{Claim, Message};

/// System instruction opening every verification conversation
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful fact-checker. Your task is to verify \
the claim using the provided tools. If you have finished the verification, please start a \
message with \"Report:\" and summarize the verification process and the final conclusion.";

/// Reminder sent when the model produces content without the terminal marker
pub const REMINDER: &str = "Please continue the verification, or start your message with \
\"Report:\" if you have finished and summarize the verification process and the final \
conclusion.";

/// Opening message pair for one claim's verification run
pub fn initial_messages(claim: &Claim) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_INSTRUCTION),
        Message::user(format!(
            "Here is the claim:\n{}\n The verification for the biological function should be factual.",
            claim.text
        )),
    ]
}

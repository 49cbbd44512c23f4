//! Parse model output into claim texts and process names

use crate::error::PipelineError;
use crate::prompts::PROCESS_HEADER;
use serde_json::Value;
use tracing::warn;

/// Parse a claim-generation response into claim texts
///
/// Expects a JSON array of strings, possibly wrapped in a markdown code
/// fence. Non-string elements are skipped with a warning; an empty or
/// non-array payload is an error.
pub fn parse_claim_list(response: &str) -> Result<Vec<String>, PipelineError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| PipelineError::InvalidClaimList(format!("JSON parse error: {}", e)))?;

    let array = json
        .as_array()
        .ok_or_else(|| PipelineError::InvalidClaimList("expected a JSON array".to_string()))?;

    let mut claims = Vec::new();
    for (idx, element) in array.iter().enumerate() {
        match element.as_str() {
            Some(text) if !text.trim().is_empty() => claims.push(sanitize_claim(text)),
            _ => warn!("skipping non-string claim at index {}", idx),
        }
    }

    if claims.is_empty() {
        return Err(PipelineError::InvalidClaimList(
            "no usable claims in response".to_string(),
        ));
    }
    Ok(claims)
}

/// Strip a markdown code fence if present
fn extract_json(response: &str) -> Result<String, PipelineError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(PipelineError::InvalidClaimList(
                "empty code block".to_string(),
            ));
        }
        // Skip the opening fence line and the closing fence line
        Ok(lines[1..lines.len().saturating_sub(1)].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Replace characters outside the permitted claim alphabet with `_`
///
/// Permitted: alphanumerics, space, and `,.;?!*()_-`.
pub fn sanitize_claim(claim: &str) -> String {
    claim
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || " ,.;?!*()_-".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extract the process name from a narrative's `Process:` header
///
/// The header must appear on the first non-empty line.
pub fn extract_process_name(narrative: &str) -> Result<String, PipelineError> {
    let first_line = narrative
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(PipelineError::MissingProcessHeader)?;

    let name = first_line
        .trim()
        .strip_prefix(PROCESS_HEADER)
        .ok_or(PipelineError::MissingProcessHeader)?
        .trim();

    if name.is_empty() {
        return Err(PipelineError::MissingProcessHeader);
    }
    Ok(name.to_string())
}
